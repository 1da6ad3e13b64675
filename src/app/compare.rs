// LogRecon - app/compare.rs
//
// Orchestrates one comparison run: read both logs, build a collection from
// each, reconcile them, and write optional export files.
//
// Fully sequential. Each file's content is dropped as soon as its collection
// has been built.

use crate::core::collect::{self, CollectOptions, Extraction};
use crate::core::export::{self, ReportDocument, SideInfo};
use crate::core::model::{BlockFlush, Delimiter, ExtractionMode};
use crate::core::reconcile::{self, Report};
use crate::core::report::Labels;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::{ExportError, Result, SourceError};
use regex::Regex;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Everything a run needs besides the two file paths.
#[derive(Debug, Clone)]
pub struct CompareSettings {
    pub mode: ExtractionMode,
    pub labels: Labels,
    pub left_delimiter: Delimiter,
    pub right_delimiter: Delimiter,
    pub block_flush: BlockFlush,
    pub ignore: Vec<Regex>,
    pub mmap_threshold: u64,
}

impl CompareSettings {
    pub fn new(mode: ExtractionMode) -> Self {
        Self {
            mode,
            labels: Labels::default(),
            left_delimiter: Delimiter::default(),
            right_delimiter: Delimiter::default(),
            block_flush: BlockFlush::default(),
            ignore: Vec::new(),
            mmap_threshold: constants::DEFAULT_MMAP_THRESHOLD,
        }
    }
}

/// One side of a completed comparison.
#[derive(Debug)]
pub struct SideOutcome {
    pub path: PathBuf,
    pub extraction: Extraction,
}

impl SideOutcome {
    /// All warnings raised for this side, including suppressed ones.
    pub fn warning_count(&self) -> usize {
        self.extraction.warnings.len() + self.extraction.warnings_suppressed
    }
}

/// Result of a comparison run.
#[derive(Debug)]
pub struct CompareOutcome {
    pub mode: ExtractionMode,
    pub labels: Labels,
    pub left: SideOutcome,
    pub right: SideOutcome,
    pub report: Report,
}

impl CompareOutcome {
    /// JSON export document for this outcome.
    pub fn document(&self) -> ReportDocument<'_> {
        ReportDocument::new(
            self.mode,
            side_info(&self.labels.left, &self.left),
            side_info(&self.labels.right, &self.right),
            &self.report,
        )
    }
}

fn side_info<'a>(label: &'a str, side: &'a SideOutcome) -> SideInfo<'a> {
    SideInfo {
        label,
        path: &side.path,
        lines_scanned: side.extraction.lines_scanned,
        warnings: side.warning_count(),
    }
}

/// Compare `left` against `right` under `settings`.
///
/// Fails fast on the first unreadable file; extraction warnings never fail
/// the run.
pub fn run_compare(left: &Path, right: &Path, settings: &CompareSettings) -> Result<CompareOutcome> {
    tracing::info!(
        mode = %settings.mode,
        left = %left.display(),
        right = %right.display(),
        "Comparison started"
    );

    let left_side = load_side(left, settings.left_delimiter, settings)?;
    let right_side = load_side(right, settings.right_delimiter, settings)?;

    let report = reconcile::reconcile(
        &left_side.extraction.collection,
        &right_side.extraction.collection,
    )?;

    tracing::info!(
        left_entries = report.left_total,
        right_entries = report.right_total,
        differences = report.difference_count(),
        "Comparison complete"
    );

    Ok(CompareOutcome {
        mode: settings.mode,
        labels: settings.labels.clone(),
        left: left_side,
        right: right_side,
        report,
    })
}

fn load_side(
    path: &Path,
    delimiter: Delimiter,
    settings: &CompareSettings,
) -> std::result::Result<SideOutcome, SourceError> {
    let content = fs::read_log_file(path, settings.mmap_threshold)?;

    let options = CollectOptions {
        mode: settings.mode,
        delimiter,
        block_flush: settings.block_flush,
        ignore: settings.ignore.clone(),
        max_warnings: constants::MAX_WARNINGS_PER_FILE,
    };
    let extraction = collect::build_collection(&content, path, &options);

    tracing::info!(
        file = %path.display(),
        entries = extraction.collection.len(),
        lines = extraction.lines_scanned,
        warnings = extraction.warnings.len() + extraction.warnings_suppressed,
        "Collection built"
    );

    Ok(SideOutcome {
        path: path.to_path_buf(),
        extraction,
    })
}

/// Write the outcome as pretty JSON to `path`.
pub fn write_json_export(outcome: &CompareOutcome, path: &Path) -> Result<()> {
    let file = create_export_file(path)?;
    export::export_json(&outcome.document(), BufWriter::new(file), path)?;
    tracing::info!(path = %path.display(), "JSON export written");
    Ok(())
}

/// Write the outcome's findings as CSV to `path`. Returns the row count.
pub fn write_csv_export(outcome: &CompareOutcome, path: &Path) -> Result<usize> {
    let file = create_export_file(path)?;
    let rows = export::export_csv(&outcome.report, &outcome.labels, BufWriter::new(file), path)?;
    tracing::info!(path = %path.display(), rows, "CSV export written");
    Ok(rows)
}

fn create_export_file(path: &Path) -> std::result::Result<std::fs::File, ExportError> {
    std::fs::File::create(path).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
