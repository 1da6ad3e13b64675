// LogRecon - core/export.rs
//
// CSV and JSON export of a reconciliation report.
// Core layer: writes to any Write trait object.

use crate::core::model::ExtractionMode;
use crate::core::reconcile::Report;
use crate::core::report::Labels;
use crate::util::constants;
use crate::util::error::ExportError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One side of the comparison as recorded in the JSON export.
#[derive(Debug, Serialize)]
pub struct SideInfo<'a> {
    pub label: &'a str,
    pub path: &'a Path,
    pub lines_scanned: u64,
    pub warnings: usize,
}

/// Top-level JSON export document.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub mode: ExtractionMode,
    pub left: SideInfo<'a>,
    pub right: SideInfo<'a>,
    pub report: &'a Report,
}

impl<'a> ReportDocument<'a> {
    pub fn new(
        mode: ExtractionMode,
        left: SideInfo<'a>,
        right: SideInfo<'a>,
        report: &'a Report,
    ) -> Self {
        Self {
            tool: constants::APP_NAME,
            version: constants::APP_VERSION,
            generated_at: Utc::now(),
            mode,
            left,
            right,
            report,
        }
    }
}

/// Export the report as a pretty-printed JSON document.
///
/// The writer is flushed before returning so buffered write failures
/// surface as `ExportError::Io`.
pub fn export_json<W: Write>(
    document: &ReportDocument<'_>,
    mut writer: W,
    export_path: &Path,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, document).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })
}

/// Export the report to CSV, one row per finding.
///
/// Writes: finding, key, <left label>, <right label>, delta
/// Returns the number of data rows written.
pub fn export_csv<W: Write>(
    report: &Report,
    labels: &Labels,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    csv_writer
        .write_record(["finding", "key", labels.left.as_str(), labels.right.as_str(), "delta"])
        .map_err(csv_err)?;

    let mut count = 0;
    for finding in &report.left_only {
        let value = finding.value.as_deref().unwrap_or("");
        csv_writer
            .write_record(["left-only", finding.key.as_str(), value, "", ""])
            .map_err(csv_err)?;
        count += 1;
    }
    for finding in &report.right_only {
        let value = finding.value.as_deref().unwrap_or("");
        csv_writer
            .write_record(["right-only", finding.key.as_str(), "", value, ""])
            .map_err(csv_err)?;
        count += 1;
    }
    for mismatch in &report.mismatched {
        let delta = mismatch.delta.map(|d| d.to_string()).unwrap_or_default();
        csv_writer
            .write_record([
                "mismatch",
                mismatch.key.as_str(),
                mismatch.left.as_str(),
                mismatch.right.as_str(),
                delta.as_str(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::CollectionKind;
    use crate::core::reconcile::{Finding, Mismatch};
    use std::path::PathBuf;

    /// Accepts every write but fails on flush, like a full disk behind a
    /// buffered file.
    struct FullOnFlush;

    impl Write for FullOnFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("no space left on device"))
        }
    }

    fn sample_report() -> Report {
        Report {
            kind: CollectionKind::Values,
            left_total: 2,
            right_total: 2,
            left_only: vec![Finding {
                key: "a2a3".to_string(),
                value: Some("20".to_string()),
            }],
            right_only: vec![Finding {
                key: "h2h4".to_string(),
                value: Some("20".to_string()),
            }],
            mismatched: vec![Mismatch {
                key: "e2e4".to_string(),
                left: "20".to_string(),
                right: "21".to_string(),
                delta: Some(-1),
            }],
        }
    }

    #[test]
    fn test_csv_export() {
        let report = sample_report();
        let mut buf = Vec::new();
        let count = export_csv(
            &report,
            &Labels::default(),
            &mut buf,
            &PathBuf::from("out.csv"),
        )
        .unwrap();
        assert_eq!(count, 3);

        let output = String::from_utf8(buf).unwrap();
        let rows: Vec<_> = output.lines().collect();
        assert_eq!(rows[0], "finding,key,A,B,delta");
        assert_eq!(rows[1], "left-only,a2a3,20,,");
        assert_eq!(rows[2], "right-only,h2h4,,20,");
        assert_eq!(rows[3], "mismatch,e2e4,20,21,-1");
    }

    #[test]
    fn test_json_export() {
        let report = sample_report();
        let left = PathBuf::from("kkk.kkk");
        let right = PathBuf::from("rrr.rrr");
        let doc = ReportDocument::new(
            ExtractionMode::PerftDivide,
            SideInfo {
                label: "A",
                path: &left,
                lines_scanned: 3,
                warnings: 0,
            },
            SideInfo {
                label: "B",
                path: &right,
                lines_scanned: 3,
                warnings: 1,
            },
            &report,
        );
        let mut buf = Vec::new();
        export_json(&doc, &mut buf, &PathBuf::from("out.json")).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["mode"], "perft-divide");
        assert_eq!(value["report"]["kind"], "values");
        assert_eq!(value["report"]["mismatched"][0]["delta"], -1);
        assert_eq!(value["right"]["path"], "rrr.rrr");
    }

    #[test]
    fn test_json_export_reports_flush_failure() {
        let report = sample_report();
        let path = PathBuf::from("kkk.kkk");
        let side = |label: &'static str| SideInfo {
            label,
            path: &path,
            lines_scanned: 0,
            warnings: 0,
        };
        let doc = ReportDocument::new(ExtractionMode::PerftDivide, side("A"), side("B"), &report);

        let result = export_json(&doc, FullOnFlush, &PathBuf::from("out.json"));
        assert!(matches!(result, Err(ExportError::Io { .. })));
    }

    #[test]
    fn test_csv_export_reports_flush_failure() {
        let result = export_csv(
            &sample_report(),
            &Labels::default(),
            FullOnFlush,
            &PathBuf::from("out.csv"),
        );
        assert!(matches!(result, Err(ExportError::Io { .. })));
    }
}
