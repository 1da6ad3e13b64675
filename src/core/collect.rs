// LogRecon - core/collect.rs
//
// Builds one comparable collection from one source file's content, according
// to the extraction mode. Single pass, no I/O: the app layer reads the file.
//
// Malformed lines and duplicate keys are recorded as warnings (and logged at
// WARN) but never abort the build.

use crate::core::extract::{self, Marker};
use crate::core::model::{
    BlockFlush, Collection, Delimiter, ExtractionMode, KeyedMap, LineSet, LogLine,
};
use crate::core::split;
use crate::util::constants;
use crate::util::error::ExtractWarning;
use crate::util::logging::preview;
use regex::Regex;
use std::path::Path;

/// Per-side options for building a collection.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub mode: ExtractionMode,
    /// Key/value delimiter, used by `perft-divide`.
    pub delimiter: Delimiter,
    /// Treatment of the final block, used by `movelist-depth`.
    pub block_flush: BlockFlush,
    /// Lines matching any of these are dropped before extraction.
    pub ignore: Vec<Regex>,
    pub max_warnings: usize,
}

impl CollectOptions {
    pub fn new(mode: ExtractionMode) -> Self {
        Self {
            mode,
            delimiter: Delimiter::default(),
            block_flush: BlockFlush::default(),
            ignore: Vec::new(),
            max_warnings: constants::MAX_WARNINGS_PER_FILE,
        }
    }
}

/// Result of building a collection from one file.
#[derive(Debug)]
pub struct Extraction {
    pub collection: Collection,
    /// Non-fatal warnings (capped at `max_warnings`).
    pub warnings: Vec<ExtractWarning>,
    /// Warnings logged but not retained because the cap was reached.
    pub warnings_suppressed: usize,
    /// Total lines in the file.
    pub lines_scanned: u64,
    /// Lines (or blocks, in block mode) that fed the collection.
    pub records: u64,
}

/// Collects warnings up to a cap, logging every one.
struct WarningSink<'p> {
    file: &'p Path,
    max: usize,
    kept: Vec<ExtractWarning>,
    suppressed: usize,
}

impl<'p> WarningSink<'p> {
    fn new(file: &'p Path, max: usize) -> Self {
        Self {
            file,
            max,
            kept: Vec::new(),
            suppressed: 0,
        }
    }

    fn push(&mut self, warning: ExtractWarning) {
        tracing::warn!(warning = %warning, "Extraction warning");
        if self.kept.len() < self.max {
            self.kept.push(warning);
        } else {
            self.suppressed += 1;
        }
    }

    fn malformed(&mut self, line: &LogLine<'_>, delimiter: Delimiter) {
        self.push(ExtractWarning::MalformedLine {
            file: self.file.to_path_buf(),
            line_number: line.line_number,
            line: preview(line.raw).to_string(),
            delimiter: delimiter.label(),
        });
    }

    fn duplicate(&mut self, line_number: u64, key: &str, previous: String, latest: String) {
        self.push(ExtractWarning::DuplicateKey {
            file: self.file.to_path_buf(),
            line_number,
            key: preview(key).to_string(),
            previous,
            latest,
        });
    }
}

/// Build the collection for `options.mode` from `content`.
///
/// `source` is used for warnings and logging only.
pub fn build_collection(content: &str, source: &Path, options: &CollectOptions) -> Extraction {
    let ignore = options.ignore.as_slice();
    let visible = extract::lines(content)
        .filter(move |line| !ignore.iter().any(|re| re.is_match(line.raw)));

    let mut sink = WarningSink::new(source, options.max_warnings);
    let mut records: u64 = 0;

    let collection = match options.mode {
        ExtractionMode::DepthLines | ExtractionMode::NodeIncrSet => {
            let marker = line_marker(options.mode);
            let mut set = LineSet::new();
            for line in extract::matching(visible, &marker) {
                records += 1;
                set.insert(line.text());
            }
            Collection::Lines(set)
        }
        ExtractionMode::NodeIncrCount => {
            let marker = line_marker(options.mode);
            let mut counts = KeyedMap::new();
            for line in extract::matching(visible, &marker) {
                records += 1;
                counts.increment(line.text());
            }
            Collection::Counts(counts)
        }
        ExtractionMode::PerftDivide => {
            let marker = Marker::NonBlank;
            let mut values: KeyedMap<String> = KeyedMap::new();
            for line in extract::matching(visible, &marker) {
                let Some(split) = split::split_line(line, options.delimiter) else {
                    sink.malformed(&line, options.delimiter);
                    continue;
                };
                let (Some(key), Some(value)) = (split.key, split.value) else {
                    continue;
                };
                records += 1;
                if let Some(previous) = values.insert(key, value.to_string()) {
                    sink.duplicate(line.line_number, key, previous, value.to_string());
                }
            }
            Collection::Values(values)
        }
        ExtractionMode::MovelistDepth => {
            let header = Marker::contains(constants::MOVELIST_HEADER_MARKER);
            let section = Marker::contains(constants::MOVELIST_SECTION_MARKER);
            let mut counts: KeyedMap<u64> = KeyedMap::new();
            for block in extract::fold_blocks(visible, &header, &section, options.block_flush) {
                records += 1;
                let key = block.header.text();
                if let Some(previous) = counts.insert(key, block.count) {
                    sink.duplicate(
                        block.header.line_number,
                        key,
                        previous.to_string(),
                        block.count.to_string(),
                    );
                }
            }
            Collection::Counts(counts)
        }
    };

    let lines_scanned = content.lines().count() as u64;

    tracing::debug!(
        file = %source.display(),
        mode = %options.mode,
        kind = %collection.kind(),
        entries = collection.len(),
        records,
        lines_scanned,
        warnings = sink.kept.len() + sink.suppressed,
        "Collection built"
    );

    Extraction {
        collection,
        warnings: sink.kept,
        warnings_suppressed: sink.suppressed,
        lines_scanned,
        records,
    }
}

/// Marker for the modes that keep whole lines.
fn line_marker(mode: ExtractionMode) -> Marker {
    match mode {
        ExtractionMode::DepthLines => Marker::prefix(constants::DEPTH_LINE_PREFIX),
        _ => Marker::contains(constants::NODE_INCR_MARKER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn build(content: &str, options: &CollectOptions) -> Extraction {
        build_collection(content, &PathBuf::from("test.log"), options)
    }

    #[test]
    fn test_depth_lines_are_trimmed_and_unique() {
        let content = "depth 1: e4  \ninfo\ndepth 2: e5\ndepth 1: e4\n";
        let result = build(content, &CollectOptions::new(ExtractionMode::DepthLines));
        let Collection::Lines(set) = result.collection else {
            panic!("expected a line set");
        };
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["depth 1: e4", "depth 2: e5"]);
        assert_eq!(result.records, 3);
        assert_eq!(result.lines_scanned, 4);
    }

    #[test]
    fn test_node_incr_count_counts_repeats() {
        let content = "\
**** NODE INCR - mv = e4
**** NODE INCR - mv = e4
other
**** NODE INCR - mv = d4
**** NODE INCR - mv = e4
";
        let result = build(content, &CollectOptions::new(ExtractionMode::NodeIncrCount));
        let Collection::Counts(counts) = result.collection else {
            panic!("expected counts");
        };
        assert_eq!(counts.get("**** NODE INCR - mv = e4"), Some(&3));
        assert_eq!(counts.get("**** NODE INCR - mv = d4"), Some(&1));
    }

    #[test]
    fn test_node_incr_set_ignores_other_lines() {
        let content = "**** NODE INCR - mv = e4\nNODE other\n";
        let result = build(content, &CollectOptions::new(ExtractionMode::NodeIncrSet));
        assert_eq!(result.collection.len(), 1);
        assert_eq!(result.collection.kind(), crate::core::model::CollectionKind::Lines);
    }

    #[test]
    fn test_perft_divide_skips_malformed_lines_and_continues() {
        let content = "e2e4: 20\nbroken\n\nd2d4: 20\n";
        let mut options = CollectOptions::new(ExtractionMode::PerftDivide);
        options.delimiter = Delimiter::Colon;
        let result = build(content, &options);

        let Collection::Values(values) = &result.collection else {
            panic!("expected values");
        };
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("d2d4").map(String::as_str), Some("20"));
        assert_eq!(result.warnings.len(), 1);
        assert!(matches!(
            &result.warnings[0],
            ExtractWarning::MalformedLine { line_number: 2, delimiter: "colon", .. }
        ));
    }

    #[test]
    fn test_perft_divide_duplicate_key_keeps_latest() {
        let content = "e2e4 20\ne2e4 21\n";
        let mut options = CollectOptions::new(ExtractionMode::PerftDivide);
        options.delimiter = Delimiter::Whitespace;
        let result = build(content, &options);

        let Collection::Values(values) = &result.collection else {
            panic!("expected values");
        };
        assert_eq!(values.get("e2e4").map(String::as_str), Some("21"));
        assert_eq!(
            result.warnings,
            vec![ExtractWarning::DuplicateKey {
                file: PathBuf::from("test.log"),
                line_number: 2,
                key: "e2e4".to_string(),
                previous: "20".to_string(),
                latest: "21".to_string(),
            }]
        );
    }

    #[test]
    fn test_ignore_patterns_drop_lines_before_extraction() {
        let content = "e2e4 20\nNodes searched: 20\n";
        let mut options = CollectOptions::new(ExtractionMode::PerftDivide);
        options.ignore = vec![Regex::new("^Nodes searched").unwrap()];
        let result = build(content, &options);
        assert_eq!(result.collection.len(), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_movelist_depth_respects_block_flush() {
        let content = "\
+++++++++++++ moves generated for depth 1
MoveList:
Move:1
+++++++++++++ moves generated for depth 2
MoveList:
";
        let mut options = CollectOptions::new(ExtractionMode::MovelistDepth);
        let flushed = build(content, &options);
        assert_eq!(flushed.collection.len(), 2);

        options.block_flush = BlockFlush::DropLast;
        let dropped = build(content, &options);
        let Collection::Counts(counts) = dropped.collection else {
            panic!("expected counts");
        };
        assert_eq!(counts.len(), 1);
        assert_eq!(
            counts.get("+++++++++++++ moves generated for depth 1"),
            Some(&2)
        );
    }

    #[test]
    fn test_movelist_depth_repeated_header_warns() {
        let content = "\
+++++++++++++ moves generated for depth 1
MoveList:
+++++++++++++ moves generated for depth 1
MoveList:
Move:1
";
        let result = build(content, &CollectOptions::new(ExtractionMode::MovelistDepth));
        let Collection::Counts(counts) = &result.collection else {
            panic!("expected counts");
        };
        assert_eq!(counts.get("+++++++++++++ moves generated for depth 1"), Some(&2));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_warning_cap_suppresses_excess() {
        let content = "a\nb\nc\n";
        let mut options = CollectOptions::new(ExtractionMode::PerftDivide);
        options.max_warnings = 2;
        let result = build(content, &options);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.warnings_suppressed, 1);
    }
}
