// LogRecon - core/extract.rs
//
// Line extraction: lazy marker filtering and block folding over file content.
// Core layer: accepts content strings, never touches the filesystem.

use crate::core::model::{BlockFlush, LogLine};

/// Predicate deciding whether a line is relevant to a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// The untrimmed line starts with this text.
    Prefix(String),
    /// The line contains this text anywhere.
    Contains(String),
    /// The line has any non-whitespace content.
    NonBlank,
}

impl Marker {
    pub fn prefix(text: &str) -> Self {
        Marker::Prefix(text.to_string())
    }

    pub fn contains(text: &str) -> Self {
        Marker::Contains(text.to_string())
    }

    pub fn matches(&self, line: &str) -> bool {
        match self {
            Marker::Prefix(p) => line.starts_with(p.as_str()),
            Marker::Contains(c) => line.contains(c.as_str()),
            Marker::NonBlank => !line.trim().is_empty(),
        }
    }
}

/// Every line of `content` in file order, numbered from 1.
pub fn lines(content: &str) -> impl Iterator<Item = LogLine<'_>> {
    content
        .lines()
        .enumerate()
        .map(|(idx, raw)| LogLine::new(idx as u64 + 1, raw))
}

/// Lazily yield the lines of `content` that match `marker`, in file order.
pub fn extract<'a>(content: &'a str, marker: &'a Marker) -> impl Iterator<Item = LogLine<'a>> + 'a {
    matching(lines(content), marker)
}

/// Keep only the lines of an existing sequence that match `marker`.
pub fn matching<'a, I>(lines: I, marker: &'a Marker) -> impl Iterator<Item = LogLine<'a>> + 'a
where
    I: Iterator<Item = LogLine<'a>> + 'a,
{
    lines.filter(move |line| marker.matches(line.raw))
}

/// A closed block: its header line and the number of lines counted inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub header: LogLine<'a>,
    pub count: u64,
}

/// Fold state carried across lines while splitting a log into blocks.
#[derive(Default)]
struct BlockState<'a> {
    current: Option<LogLine<'a>>,
    count: u64,
    in_section: bool,
    closed: Vec<Block<'a>>,
}

impl<'a> BlockState<'a> {
    fn step(mut self, line: LogLine<'a>, header: &Marker, section: &Marker) -> Self {
        if header.matches(line.raw) {
            self.close();
            self.current = Some(line);
        }
        if section.matches(line.raw) {
            self.in_section = true;
        }
        if self.in_section && self.current.is_some() {
            self.count += 1;
        }
        self
    }

    /// Emit the current block (blocks with nothing counted are not emitted)
    /// and reset for the next one.
    fn close(&mut self) {
        if let Some(header) = self.current.take() {
            if self.count != 0 {
                self.closed.push(Block {
                    header,
                    count: self.count,
                });
            }
        }
        self.count = 0;
        self.in_section = false;
    }
}

/// Split a line sequence into header-delimited blocks and count, per block,
/// the lines from the first section marker up to the next header.
///
/// The section-marker line itself is counted. Lines before the first header
/// belong to no block. The block still open at end of input is handled per
/// `flush`.
pub fn fold_blocks<'a, I>(
    lines: I,
    header: &Marker,
    section: &Marker,
    flush: BlockFlush,
) -> Vec<Block<'a>>
where
    I: IntoIterator<Item = LogLine<'a>>,
{
    let mut state = lines
        .into_iter()
        .fold(BlockState::default(), |state, line| {
            state.step(line, header, section)
        });

    match flush {
        BlockFlush::FlushOnEof => state.close(),
        BlockFlush::DropLast => {
            if let Some(last) = state.current {
                tracing::debug!(
                    line = last.line_number,
                    count = state.count,
                    "Dropping final block not closed by a header"
                );
            }
        }
    }

    state.closed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants;

    const MOVELIST_LOG: &str = "\
preamble
+++++++++++++ moves generated for depth 1
MoveList:
Move:1 > e2e4
Move:2 > d2d4
+++++++++++++ moves generated for depth 2
noise
MoveList:
Move:1 > e7e5
+++++++++++++ moves generated for depth 3
MoveList:
Move:1 > g1f3
Move:2 > b1c3
Move:3 > f2f4
";

    fn movelist_markers() -> (Marker, Marker) {
        (
            Marker::contains(constants::MOVELIST_HEADER_MARKER),
            Marker::contains(constants::MOVELIST_SECTION_MARKER),
        )
    }

    #[test]
    fn test_prefix_marker_matches_untrimmed_start() {
        let m = Marker::prefix("depth");
        assert!(m.matches("depth 1: e4"));
        assert!(!m.matches("  depth 1: e4"));
        assert!(!m.matches("max depth 1"));
    }

    #[test]
    fn test_extract_preserves_order_and_line_numbers() {
        let content = "depth 1: e4\ninfo\ndepth 2: e5\n";
        let marker = Marker::prefix("depth");
        let got: Vec<_> = extract(content, &marker)
            .map(|l| (l.line_number, l.raw))
            .collect();
        assert_eq!(got, vec![(1, "depth 1: e4"), (3, "depth 2: e5")]);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let content = "**** NODE INCR - mv = e4\nx\n**** NODE INCR - mv = d4\n";
        let marker = Marker::contains("NODE INCR");
        let first: Vec<_> = extract(content, &marker).collect();
        let second: Vec<_> = extract(content, &marker).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_non_blank_marker_skips_blank_lines() {
        let content = "e2e4 20\n\n   \nd2d4 20\n";
        let got: Vec<_> = extract(content, &Marker::NonBlank).map(|l| l.raw).collect();
        assert_eq!(got, vec!["e2e4 20", "d2d4 20"]);
    }

    #[test]
    fn test_fold_blocks_flush_on_eof_keeps_last_block() {
        let (header, section) = movelist_markers();
        let blocks = fold_blocks(
            lines(MOVELIST_LOG),
            &header,
            &section,
            BlockFlush::FlushOnEof,
        );
        let counts: Vec<_> = blocks.iter().map(|b| (b.header.text(), b.count)).collect();
        assert_eq!(
            counts,
            vec![
                ("+++++++++++++ moves generated for depth 1", 3),
                ("+++++++++++++ moves generated for depth 2", 2),
                ("+++++++++++++ moves generated for depth 3", 4),
            ]
        );
    }

    #[test]
    fn test_fold_blocks_drop_last_discards_unclosed_block() {
        let (header, section) = movelist_markers();
        let blocks = fold_blocks(lines(MOVELIST_LOG), &header, &section, BlockFlush::DropLast);
        assert_eq!(blocks.len(), 2);
        assert!(blocks
            .iter()
            .all(|b| !b.header.raw.ends_with("depth 3")));
    }

    #[test]
    fn test_fold_blocks_skips_blocks_without_section() {
        let (header, section) = movelist_markers();
        let content = "\
+++++++++++++ moves generated for depth 1
no moves here
+++++++++++++ moves generated for depth 2
MoveList:
";
        let blocks = fold_blocks(lines(content), &header, &section, BlockFlush::FlushOnEof);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].header.line_number, 3);
        assert_eq!(blocks[0].count, 1);
    }

    #[test]
    fn test_fold_blocks_ignores_preamble_section() {
        let (header, section) = movelist_markers();
        let content = "MoveList:\nMove:1\n+++++++++++++ moves generated for depth 1\n";
        let blocks = fold_blocks(lines(content), &header, &section, BlockFlush::FlushOnEof);
        assert!(blocks.is_empty());
    }
}
