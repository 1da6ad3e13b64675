// LogRecon - core/report.rs
//
// Human-readable rendering of a reconciliation report.
// Core layer: writes to any Write trait object.

use crate::core::model::CollectionKind;
use crate::core::reconcile::{Finding, Mismatch, Report};
use crate::util::constants;
use serde::Serialize;
use std::io::{self, Write};

/// Display names for the two sides of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labels {
    pub left: String,
    pub right: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            left: constants::DEFAULT_LEFT_LABEL.to_string(),
            right: constants::DEFAULT_RIGHT_LABEL.to_string(),
        }
    }
}

/// Write `report` as one finding per line.
///
/// Layout: entry counts per side, left-only findings, right-only findings,
/// mismatches, then a one-line summary.
pub fn render_text<W: Write>(report: &Report, labels: &Labels, out: &mut W) -> io::Result<()> {
    writeln!(out, "# {} entries: {}", labels.left, report.left_total)?;
    writeln!(out, "# {} entries: {}", labels.right, report.right_total)?;

    for finding in &report.left_only {
        writeln!(out, "Not in {}: {}", labels.right, finding_text(finding))?;
    }
    for finding in &report.right_only {
        writeln!(out, "Not in {}: {}", labels.left, finding_text(finding))?;
    }
    for mismatch in &report.mismatched {
        writeln!(out, "{}", mismatch_line(mismatch, report.kind, labels))?;
    }

    if report.is_clean() {
        writeln!(out, "== No differences.")?;
    } else {
        writeln!(
            out,
            "== {} difference(s): {} not in {}, {} not in {}, {} mismatched",
            report.difference_count(),
            report.left_only.len(),
            labels.right,
            report.right_only.len(),
            labels.left,
            report.mismatched.len(),
        )?;
    }
    Ok(())
}

fn finding_text(finding: &Finding) -> String {
    match &finding.value {
        Some(value) => format!("{} ({value})", finding.key),
        None => finding.key.clone(),
    }
}

/// Format one mismatch, e.g. `Mismatch: e2e4: A=20 B=21 delta=-1`.
/// Count mismatches also name the side holding the surplus.
pub fn mismatch_line(mismatch: &Mismatch, kind: CollectionKind, labels: &Labels) -> String {
    let mut line = format!(
        "Mismatch: {}: {}={} {}={}",
        mismatch.key, labels.left, mismatch.left, labels.right, mismatch.right
    );
    if let Some(delta) = mismatch.delta {
        line.push_str(&format!(" delta={delta:+}"));
        if kind == CollectionKind::Counts && delta != 0 {
            let side = if delta > 0 { &labels.left } else { &labels.right };
            line.push_str(&format!(" (Extra {} in {side})", delta.unsigned_abs()));
        }
    }
    line
}
