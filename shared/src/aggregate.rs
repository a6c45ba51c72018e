//! Group and subgroup totals over a value column
//!
//! Groups and subgroups are discovered from the data on every call; there is
//! no category catalog. Group order depends on a [`SortDirection`] chosen by
//! the caller (see [`SortPolicy`]); subgroups are always largest first.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::format::format_currency;
use crate::table::{SortDirection, Table};

/// Relative tolerance for total consistency checks
pub const CONSISTENCY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 10);

/// Explicit event-code -> group ordering table
#[derive(Debug, Clone, PartialEq)]
pub struct SortPolicy {
    rules: Vec<(i64, SortDirection)>,
    fallback: SortDirection,
}

impl SortPolicy {
    pub fn new(rules: impl IntoIterator<Item = (i64, SortDirection)>, fallback: SortDirection) -> Self {
        Self {
            rules: rules.into_iter().collect(),
            fallback,
        }
    }

    pub fn direction_for(&self, code: i64) -> SortDirection {
        self.rules
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, dir)| *dir)
            .unwrap_or(self.fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubgroupTotal {
    pub label: String,
    pub total: Decimal,
    pub formatted_total: String,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub label: String,
    pub total: Decimal,
    pub formatted_total: String,
    pub row_count: usize,
    pub subgroups: Vec<SubgroupTotal>,
}

/// Ordered groups with their subgroups, plus the grand total
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct AggregateReport {
    pub groups: Vec<GroupTotal>,
    pub grand_total: Decimal,
    pub formatted_grand_total: String,
}

impl AggregateReport {
    pub fn empty() -> Self {
        Self {
            groups: Vec::new(),
            grand_total: Decimal::ZERO,
            formatted_grand_total: format_currency(Decimal::ZERO),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, label: &str) -> Option<&GroupTotal> {
        self.groups.iter().find(|g| g.label == label)
    }
}

/// A total that disagrees with the sum of its parts
#[derive(Debug, Clone, PartialEq)]
pub struct Discrepancy {
    /// Group label, or `None` for the grand total
    pub group: Option<String>,
    pub expected: Decimal,
    pub actual: Decimal,
}

#[derive(Default)]
struct Bucket {
    total: Decimal,
    rows: usize,
}

/// Sum `value_col` per `group_col` and per `subgroup_col` within each group.
///
/// Missing columns give an empty report. Null labels group under the empty
/// string. Ties in either ordering fall back to the label so output is stable.
pub fn aggregate(
    table: &Table,
    group_col: &str,
    subgroup_col: &str,
    value_col: &str,
    direction: SortDirection,
) -> AggregateReport {
    let (Some(g_idx), Some(s_idx), Some(v_idx)) = (
        table.column_index(group_col),
        table.column_index(subgroup_col),
        table.column_index(value_col),
    ) else {
        return AggregateReport::empty();
    };

    let mut groups: HashMap<String, (Bucket, HashMap<String, Bucket>)> = HashMap::new();
    let mut grand_total = Decimal::ZERO;

    for row in table.rows() {
        let value = row.at(v_idx).to_decimal();
        let group = row.at(g_idx).as_text().into_owned();
        let subgroup = row.at(s_idx).as_text().into_owned();

        let (bucket, subgroups) = groups.entry(group).or_default();
        bucket.total += value;
        bucket.rows += 1;
        let sub = subgroups.entry(subgroup).or_default();
        sub.total += value;
        sub.rows += 1;
        grand_total += value;
    }

    let mut ordered: Vec<GroupTotal> = groups
        .into_iter()
        .map(|(label, (bucket, subgroups))| {
            let mut subs: Vec<SubgroupTotal> = subgroups
                .into_iter()
                .map(|(label, sub)| SubgroupTotal {
                    label,
                    total: sub.total,
                    formatted_total: format_currency(sub.total),
                    row_count: sub.rows,
                })
                .collect();
            subs.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.label.cmp(&b.label)));

            GroupTotal {
                label,
                total: bucket.total,
                formatted_total: format_currency(bucket.total),
                row_count: bucket.rows,
                subgroups: subs,
            }
        })
        .collect();

    ordered.sort_by(|a, b| {
        let by_total = match direction {
            SortDirection::Ascending => a.total.cmp(&b.total),
            SortDirection::Descending => b.total.cmp(&a.total),
        };
        by_total.then_with(|| a.label.cmp(&b.label))
    });

    let report = AggregateReport {
        groups: ordered,
        grand_total,
        formatted_grand_total: format_currency(grand_total),
    };

    for issue in check_consistency(&report) {
        tracing::warn!(
            group = issue.group.as_deref().unwrap_or("<grand total>"),
            expected = %issue.expected,
            actual = %issue.actual,
            "aggregate totals disagree"
        );
    }
    report
}

fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= scale * CONSISTENCY_TOLERANCE
}

/// Check that subgroup totals add up to each group total and group totals add
/// up to the grand total
pub fn check_consistency(report: &AggregateReport) -> Vec<Discrepancy> {
    let mut issues = Vec::new();

    for group in &report.groups {
        let parts: Decimal = group.subgroups.iter().map(|s| s.total).sum();
        if !within_tolerance(parts, group.total) {
            issues.push(Discrepancy {
                group: Some(group.label.clone()),
                expected: group.total,
                actual: parts,
            });
        }
    }

    let parts: Decimal = report.groups.iter().map(|g| g.total).sum();
    if !within_tolerance(parts, report.grand_total) {
        issues.push(Discrepancy {
            group: None,
            expected: report.grand_total,
            actual: parts,
        });
    }
    issues
}
