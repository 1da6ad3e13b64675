// LogRecon - core/reconcile.rs
//
// Compares two collections of the same kind and returns a structured report.
// Pure, read-only: neither collection is modified and nothing is printed here;
// rendering lives in core::report and core::export.

use crate::core::model::{Collection, CollectionKind, KeyedMap};
use crate::util::error::ReconcileError;
use serde::Serialize;

/// An entry present on one side only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// The line (set-of-lines) or key (keyed kinds).
    pub key: String,
    /// The associated count or value, for keyed kinds.
    pub value: Option<String>,
}

/// A key present on both sides with different values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub key: String,
    pub left: String,
    pub right: String,
    /// `left - right` when both sides are integers. Positive means the left
    /// side has the surplus.
    pub delta: Option<i64>,
}

/// Structured result of reconciling two collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub kind: CollectionKind,
    /// Distinct entries in the left collection.
    pub left_total: usize,
    /// Distinct entries in the right collection.
    pub right_total: usize,
    /// In left, not in right (left's order).
    pub left_only: Vec<Finding>,
    /// In right, not in left (right's order).
    pub right_only: Vec<Finding>,
    /// In both with differing values (left's order).
    pub mismatched: Vec<Mismatch>,
}

impl Report {
    /// True when the two collections agree completely.
    pub fn is_clean(&self) -> bool {
        self.left_only.is_empty() && self.right_only.is_empty() && self.mismatched.is_empty()
    }

    /// Total number of findings across all three groups.
    pub fn difference_count(&self) -> usize {
        self.left_only.len() + self.right_only.len() + self.mismatched.len()
    }
}

/// Reconcile `left` against `right`.
///
/// Returns `KindMismatch` if the collections are of different kinds.
pub fn reconcile(left: &Collection, right: &Collection) -> Result<Report, ReconcileError> {
    let mut report = Report {
        kind: left.kind(),
        left_total: left.len(),
        right_total: right.len(),
        left_only: Vec::new(),
        right_only: Vec::new(),
        mismatched: Vec::new(),
    };

    match (left, right) {
        (Collection::Lines(a), Collection::Lines(b)) => {
            report.left_only = a
                .iter()
                .filter(|line| !b.contains(line))
                .map(line_finding)
                .collect();
            report.right_only = b
                .iter()
                .filter(|line| !a.contains(line))
                .map(line_finding)
                .collect();
        }
        (Collection::Counts(a), Collection::Counts(b)) => {
            reconcile_keyed(a, b, &mut report, |l, r| {
                let l = i64::try_from(*l).ok()?;
                let r = i64::try_from(*r).ok()?;
                l.checked_sub(r)
            });
        }
        (Collection::Values(a), Collection::Values(b)) => {
            reconcile_keyed(a, b, &mut report, |l, r| {
                let l = l.trim().parse::<i64>().ok()?;
                let r = r.trim().parse::<i64>().ok()?;
                l.checked_sub(r)
            });
        }
        _ => {
            return Err(ReconcileError::KindMismatch {
                left: left.kind().label(),
                right: right.kind().label(),
            })
        }
    }

    tracing::debug!(
        kind = %report.kind,
        left_only = report.left_only.len(),
        right_only = report.right_only.len(),
        mismatched = report.mismatched.len(),
        "Reconciliation complete"
    );

    Ok(report)
}

fn line_finding(line: &str) -> Finding {
    Finding {
        key: line.to_string(),
        value: None,
    }
}

/// Shared keyed comparison; `delta` computes `left - right` where meaningful.
/// A zero delta (`20` vs `020`) is not recorded.
fn reconcile_keyed<V, F>(a: &KeyedMap<V>, b: &KeyedMap<V>, report: &mut Report, delta: F)
where
    V: PartialEq + ToString,
    F: Fn(&V, &V) -> Option<i64>,
{
    for (key, left_value) in a.iter() {
        match b.get(key) {
            None => report.left_only.push(Finding {
                key: key.to_string(),
                value: Some(left_value.to_string()),
            }),
            Some(right_value) if right_value != left_value => {
                report.mismatched.push(Mismatch {
                    key: key.to_string(),
                    left: left_value.to_string(),
                    right: right_value.to_string(),
                    delta: delta(left_value, right_value).filter(|d| *d != 0),
                })
            }
            Some(_) => {}
        }
    }

    report.right_only = b
        .iter()
        .filter(|(key, _)| !a.contains_key(key))
        .map(|(key, value)| Finding {
            key: key.to_string(),
            value: Some(value.to_string()),
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::LineSet;

    fn lines(items: &[&str]) -> Collection {
        Collection::Lines(items.iter().copied().collect::<LineSet>())
    }

    fn counts(items: &[(&str, u64)]) -> Collection {
        let mut m = KeyedMap::new();
        for (k, v) in items {
            m.insert(k, *v);
        }
        Collection::Counts(m)
    }

    fn values(items: &[(&str, &str)]) -> Collection {
        let mut m = KeyedMap::new();
        for (k, v) in items {
            m.insert(k, v.to_string());
        }
        Collection::Values(m)
    }

    fn keys(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.key.as_str()).collect()
    }

    #[test]
    fn test_line_set_left_only() {
        let a = lines(&["depth 1: e4", "depth 2: e5"]);
        let b = lines(&["depth 1: e4"]);
        let report = reconcile(&a, &b).unwrap();
        assert_eq!(keys(&report.left_only), vec!["depth 2: e5"]);
        assert!(report.right_only.is_empty());
        assert!(report.mismatched.is_empty());
        assert_eq!(report.difference_count(), 1);
    }

    #[test]
    fn test_swapping_sides_swaps_groups() {
        let a = lines(&["x", "y", "shared"]);
        let b = lines(&["shared", "z"]);
        let forward = reconcile(&a, &b).unwrap();
        let backward = reconcile(&b, &a).unwrap();
        assert_eq!(forward.left_only, backward.right_only);
        assert_eq!(forward.right_only, backward.left_only);
    }

    #[test]
    fn test_identical_sets_are_clean() {
        let a = lines(&["**** NODE INCR - mv = e4"]);
        let b = lines(&["**** NODE INCR - mv = e4"]);
        let report = reconcile(&a, &b).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_value_mismatch_has_signed_delta() {
        let a = values(&[("e4", "20")]);
        let b = values(&[("e4", "21")]);
        let report = reconcile(&a, &b).unwrap();
        assert_eq!(
            report.mismatched,
            vec![Mismatch {
                key: "e4".to_string(),
                left: "20".to_string(),
                right: "21".to_string(),
                delta: Some(-1),
            }]
        );
    }

    #[test]
    fn test_non_numeric_value_mismatch_has_no_delta() {
        let a = values(&[("e4", "twenty")]);
        let b = values(&[("e4", "21")]);
        let report = reconcile(&a, &b).unwrap();
        assert_eq!(report.mismatched.len(), 1);
        assert_eq!(report.mismatched[0].delta, None);
    }

    #[test]
    fn test_numerically_equal_values_have_no_delta() {
        let a = values(&[("e4", "20")]);
        let b = values(&[("e4", "020")]);
        let report = reconcile(&a, &b).unwrap();
        assert_eq!(report.mismatched.len(), 1);
        assert_eq!(report.mismatched[0].delta, None);
        assert_eq!(
            crate::core::report::mismatch_line(
                &report.mismatched[0],
                report.kind,
                &crate::core::report::Labels::default()
            ),
            "Mismatch: e4: A=20 B=020"
        );
    }

    #[test]
    fn test_count_delta_is_left_minus_right() {
        let a = counts(&[("e4", 3), ("d4", 1), ("c4", 5)]);
        let b = counts(&[("e4", 2), ("d4", 4), ("c4", 5)]);
        let report = reconcile(&a, &b).unwrap();
        let deltas: Vec<_> = report
            .mismatched
            .iter()
            .map(|m| (m.key.as_str(), m.delta))
            .collect();
        assert_eq!(deltas, vec![("e4", Some(1)), ("d4", Some(-3))]);
    }

    #[test]
    fn test_keyed_one_sided_entries_carry_values() {
        let a = values(&[("e2e4", "20"), ("a2a3", "20")]);
        let b = values(&[("e2e4", "20"), ("h2h4", "20")]);
        let report = reconcile(&a, &b).unwrap();
        assert_eq!(
            report.left_only,
            vec![Finding {
                key: "a2a3".to_string(),
                value: Some("20".to_string())
            }]
        );
        assert_eq!(keys(&report.right_only), vec!["h2h4"]);
        assert_eq!(report.left_total, 2);
        assert_eq!(report.right_total, 2);
    }

    #[test]
    fn test_kind_mismatch_is_an_error() {
        let a = lines(&["x"]);
        let b = counts(&[("x", 1)]);
        let err = reconcile(&a, &b).unwrap_err();
        assert!(matches!(err, ReconcileError::KindMismatch { .. }));
    }
}
