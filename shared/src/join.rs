//! Key-based join of two snapshot tables
//!
//! Output order is left-table order followed by right-only rows. At most one
//! row survives per non-empty key: the first occurrence wins and later rows
//! with the same key are dropped, not merged. Rows with an empty key are all
//! kept, each unmatched. [`enrich`] is the lookup variant that keeps
//! every left row.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::table::{Table, Value};

/// Suffix for right-table columns whose names clash with the left table
pub const RIGHT_SUFFIX: &str = "_right";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinHow {
    /// Keep every left row; right rows only when matched
    Left,
    /// Keep every key from either side
    Outer,
}

/// Where an output row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    LeftOnly,
    RightOnly,
    Matched,
}

/// Match/no-match counts for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    pub matched: usize,
    pub left_only: usize,
    pub right_only: usize,
}

/// Joined table plus the provenance of each of its rows
#[derive(Debug, Clone, Default)]
pub struct JoinResult {
    pub table: Table,
    pub provenance: Vec<Provenance>,
}

impl JoinResult {
    pub fn stats(&self) -> JoinStats {
        self.provenance
            .iter()
            .fold(JoinStats::default(), |mut stats, p| {
                match p {
                    Provenance::Matched => stats.matched += 1,
                    Provenance::LeftOnly => stats.left_only += 1,
                    Provenance::RightOnly => stats.right_only += 1,
                }
                stats
            })
    }

    pub fn into_table(self) -> Table {
        self.table
    }
}

/// Output column layout shared by [`join`] and [`enrich`]
struct Layout {
    columns: Vec<String>,
    left_key: Option<usize>,
    right_key: Option<usize>,
    out_key: usize,
    /// (right column index, output column index) for every non-key right column
    right_slots: Vec<(usize, usize)>,
}

impl Layout {
    /// Left columns, the key if the left lacked it, then the remaining right
    /// columns (suffixed on clashes)
    fn new(left: &Table, right: &Table, key_col: &str) -> Self {
        let left_key = left.column_index(key_col);
        let right_key = right.column_index(key_col);

        let mut columns: Vec<String> = left.columns().to_vec();
        let out_key = match left_key {
            Some(idx) => idx,
            None => {
                columns.push(key_col.to_string());
                columns.len() - 1
            }
        };
        let right_slots = right
            .columns()
            .iter()
            .enumerate()
            .filter(|(idx, _)| Some(*idx) != right_key)
            .map(|(idx, name)| {
                let name = if columns.contains(name) {
                    format!("{}{}", name, RIGHT_SUFFIX)
                } else {
                    name.clone()
                };
                columns.push(name);
                (idx, columns.len() - 1)
            })
            .collect();

        Self {
            columns,
            left_key,
            right_key,
            out_key,
            right_slots,
        }
    }

    fn width(&self) -> usize {
        self.columns.len()
    }

    /// Position of the first right row per non-empty key
    fn first_right(&self, right: &Table) -> HashMap<String, usize> {
        let mut first = HashMap::new();
        for (pos, values) in right.raw_rows().iter().enumerate() {
            let key = key_of(values, self.right_key);
            if !key.is_empty() {
                first.entry(key).or_insert(pos);
            }
        }
        first
    }

    fn left_row(&self, values: &[Value], right_match: Option<&[Value]>) -> Vec<Value> {
        let mut row = values.to_vec();
        row.resize(self.width(), Value::Null);
        if let Some(right_values) = right_match {
            for (from, to) in &self.right_slots {
                row[*to] = right_values[*from].clone();
            }
        }
        row
    }
}

fn key_of(values: &[Value], idx: Option<usize>) -> String {
    idx.map(|i| values[i].as_text().into_owned()).unwrap_or_default()
}

/// Join `left` and `right` on the already-normalized `key_col`.
///
/// Unmatched rows keep their own columns and get nulls for the other side.
/// Empty keys never match anything. A side without `key_col` contributes only
/// unmatched rows.
pub fn join(left: &Table, right: &Table, key_col: &str, how: JoinHow) -> JoinResult {
    let layout = Layout::new(left, right, key_col);
    let first_right = layout.first_right(right);

    let mut table = Table::new(layout.columns.clone());
    let mut provenance = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for values in left.raw_rows() {
        let key = key_of(values, layout.left_key);
        if !key.is_empty() && !seen.insert(key.clone()) {
            continue;
        }

        let matched = first_right.get(&key).map(|&pos| right.raw_rows()[pos].as_slice());
        provenance.push(if matched.is_some() {
            Provenance::Matched
        } else {
            Provenance::LeftOnly
        });
        table.push_row(layout.left_row(values, matched));
    }

    if how == JoinHow::Outer {
        for values in right.raw_rows() {
            let key = key_of(values, layout.right_key);
            if !key.is_empty() && !seen.insert(key) {
                continue;
            }

            let mut row = vec![Value::Null; layout.width()];
            if let Some(idx) = layout.right_key {
                row[layout.out_key] = values[idx].clone();
            }
            for (from, to) in &layout.right_slots {
                row[*to] = values[*from].clone();
            }
            provenance.push(Provenance::RightOnly);
            table.push_row(row);
        }
    }

    let result = JoinResult { table, provenance };
    let stats = result.stats();
    tracing::debug!(
        key = key_col,
        matched = stats.matched,
        left_only = stats.left_only,
        right_only = stats.right_only,
        "joined tables"
    );
    result
}

/// Attach the columns of the first matching `right` row to every `left` row.
///
/// Unlike [`join`], left rows sharing a key are all kept (an expiry list has
/// one row per lot, not per product). Right duplicates still resolve to the
/// first occurrence, so the row count always equals the left row count.
pub fn enrich(left: &Table, right: &Table, key_col: &str) -> Table {
    let layout = Layout::new(left, right, key_col);
    let first_right = layout.first_right(right);

    let mut table = Table::new(layout.columns.clone());
    let mut matched = 0usize;
    for values in left.raw_rows() {
        let key = key_of(values, layout.left_key);
        let right_match = first_right.get(&key).map(|&pos| right.raw_rows()[pos].as_slice());
        matched += usize::from(right_match.is_some());
        table.push_row(layout.left_row(values, right_match));
    }

    tracing::debug!(key = key_col, rows = table.len(), matched, "enriched table");
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{normalize_column, SourceKind};

    fn supplier() -> Table {
        Table::from_rows(
            ["CODIGO", "FORNECEDOR"],
            vec![
                vec!["11111".into(), "ACME".into()],
                vec!["22222".into(), "BETA".into()],
                vec!["11111".into(), "DUPLICATE".into()],
            ],
        )
    }

    fn ledger() -> Table {
        Table::from_rows(
            ["CODIGO", "DESCRICAO"],
            vec![
                vec!["22222".into(), "ARROZ".into()],
                vec!["33333".into(), "FEIJAO".into()],
            ],
        )
    }

    #[test]
    fn test_outer_join_keeps_both_sides_in_order() {
        let result = join(&supplier(), &ledger(), "CODIGO", JoinHow::Outer);
        assert_eq!(result.table.columns(), &["CODIGO", "FORNECEDOR", "DESCRICAO"]);
        assert_eq!(
            result.provenance,
            vec![Provenance::LeftOnly, Provenance::Matched, Provenance::RightOnly]
        );

        let right_only = result.table.row(2).unwrap();
        assert_eq!(right_only.get("CODIGO"), Some(&Value::text("33333")));
        assert!(right_only.get("FORNECEDOR").unwrap().is_null());
    }

    #[test]
    fn test_first_occurrence_wins_on_duplicate_keys() {
        let result = join(&supplier(), &ledger(), "CODIGO", JoinHow::Outer);
        let acme = result.table.row(0).unwrap();
        assert_eq!(acme.get("FORNECEDOR"), Some(&Value::text("ACME")));
        assert_eq!(result.table.len(), 3);
    }

    #[test]
    fn test_left_join_drops_right_only_rows() {
        let result = join(&supplier(), &ledger(), "CODIGO", JoinHow::Left);
        assert_eq!(result.table.len(), 2);
        assert_eq!(result.stats(), JoinStats { matched: 1, left_only: 1, right_only: 0 });
    }

    #[test]
    fn test_empty_side_yields_the_other_side_null_filled() {
        let empty = Table::new(["CODIGO", "FORNECEDOR"]);
        let result = join(&empty, &ledger(), "CODIGO", JoinHow::Outer);
        assert_eq!(result.table.len(), 2);
        assert!(result
            .table
            .rows()
            .all(|row| row.get("FORNECEDOR").unwrap().is_null()));
    }

    #[test]
    fn test_left_without_key_column_keeps_every_row() {
        let left = Table::from_rows(
            ["DESCRICAO"],
            vec![vec!["A".into()], vec!["B".into()], vec!["C".into()]],
        );
        let right = Table::from_rows(["CODIGO"], vec![vec!["11111".into()]]);
        let result = join(&left, &right, "CODIGO", JoinHow::Outer);

        assert_eq!(result.table.len(), 4);
        assert_eq!(
            result.stats(),
            JoinStats { matched: 0, left_only: 3, right_only: 1 }
        );
    }

    #[test]
    fn test_malformed_codes_stay_unmatched_rows() {
        let left = Table::from_rows(
            ["CODIGO", "DESCRICAO"],
            vec![
                vec!["ABC".into(), "A".into()],
                vec!["".into(), "B".into()],
                vec!["22222".into(), "C".into()],
            ],
        );
        let right = Table::from_rows(
            ["CODIGO", "FORNECEDOR"],
            vec![
                vec!["X1".into(), "ACME".into()],
                vec!["X2".into(), "BETA".into()],
            ],
        );
        let left = normalize_column(left, "CODIGO", SourceKind::SupplierList);
        let right = normalize_column(right, "CODIGO", SourceKind::SupplierList);
        let result = join(&left, &right, "CODIGO", JoinHow::Outer);

        assert_eq!(
            result.provenance,
            vec![
                Provenance::LeftOnly,
                Provenance::LeftOnly,
                Provenance::LeftOnly,
                Provenance::RightOnly,
                Provenance::RightOnly,
            ]
        );
    }

    #[test]
    fn test_clashing_columns_are_suffixed() {
        let left = Table::from_rows(["CODIGO", "DESCRICAO"], vec![vec!["1".into(), "A".into()]]);
        let right = Table::from_rows(["CODIGO", "DESCRICAO"], vec![vec!["1".into(), "B".into()]]);
        let result = join(&left, &right, "CODIGO", JoinHow::Outer);
        assert_eq!(result.table.columns(), &["CODIGO", "DESCRICAO", "DESCRICAO_right"]);
    }

    #[test]
    fn test_enrich_keeps_every_left_row() {
        let lots = Table::from_rows(
            ["CODIGO", "VENCIMENTO"],
            vec![
                vec!["22222".into(), "2024-01-10".into()],
                vec!["22222".into(), "2024-02-10".into()],
                vec![Value::Null, "2024-03-10".into()],
            ],
        );
        let enriched = enrich(&lots, &supplier(), "CODIGO");
        assert_eq!(enriched.len(), 3);
        assert_eq!(enriched.columns(), &["CODIGO", "VENCIMENTO", "FORNECEDOR"]);
        assert_eq!(enriched.row(1).unwrap().get("FORNECEDOR"), Some(&Value::text("BETA")));
        assert!(enriched.row(2).unwrap().get("FORNECEDOR").unwrap().is_null());
    }

    #[test]
    fn test_normalized_codes_from_both_sources_merge_into_one_row() {
        let ledger = Table::from_rows(["CODIGO", "val"], vec![vec!["0012345".into(), Value::Int(10)]]);
        let suppliers = Table::from_rows(["CODIGO", "name"], vec![vec!["12345".into(), "X".into()]]);

        let ledger = normalize_column(ledger, "CODIGO", SourceKind::StockLedger);
        let suppliers = normalize_column(suppliers, "CODIGO", SourceKind::SupplierList);
        let result = join(&ledger, &suppliers, "CODIGO", JoinHow::Outer);

        assert_eq!(result.table.len(), 1);
        assert_eq!(result.provenance, vec![Provenance::Matched]);
        let row = result.table.row(0).unwrap();
        assert_eq!(row.get("val"), Some(&Value::Int(10)));
        assert_eq!(row.get("name"), Some(&Value::text("X")));
    }
}
