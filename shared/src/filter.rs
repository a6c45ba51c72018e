//! Declarative row filters
//!
//! A chain of [`FilterSpec`]s narrows a table one filter at a time. Every
//! predicate is a pure function of a single row, so the surviving row set does
//! not depend on the order of the chain. Cheap, selective filters first is
//! still the faster order.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::table::{Row, Table, Value};

/// A predicate over one row
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Cell equals the value. Numeric values compare numerically after
    /// coercion, text compares exactly.
    Equals { column: String, value: Value },
    /// Cell equals any of the values
    OneOf { column: String, values: Vec<Value> },
    /// Numeric cell `>=` threshold; malformed cells count as 0
    AtLeast { column: String, threshold: Decimal },
    /// Numeric cell `<=` threshold; malformed cells count as 0
    AtMost { column: String, threshold: Decimal },
    /// Text starts with any prefix, case-insensitively
    StartsWith { column: String, prefixes: Vec<String> },
    /// Any of the columns contains the term, case-insensitively
    Search { columns: Vec<String>, term: String },
    /// Date cell falls on the given day; unparseable dates never match
    OnDate { column: String, date: NaiveDate },
}

impl Predicate {
    fn columns(&self) -> Vec<&str> {
        match self {
            Predicate::Equals { column, .. }
            | Predicate::OneOf { column, .. }
            | Predicate::AtLeast { column, .. }
            | Predicate::AtMost { column, .. }
            | Predicate::StartsWith { column, .. }
            | Predicate::OnDate { column, .. } => vec![column.as_str()],
            Predicate::Search { columns, .. } => columns.iter().map(String::as_str).collect(),
        }
    }

    fn matches(&self, row: Row<'_>, at: &[usize]) -> bool {
        match self {
            Predicate::Equals { value, .. } => cell_equals(row.at(at[0]), value),
            Predicate::OneOf { values, .. } => {
                let cell = row.at(at[0]);
                values.iter().any(|v| cell_equals(cell, v))
            }
            Predicate::AtLeast { threshold, .. } => row.at(at[0]).to_decimal() >= *threshold,
            Predicate::AtMost { threshold, .. } => row.at(at[0]).to_decimal() <= *threshold,
            Predicate::StartsWith { prefixes, .. } => {
                let text = row.at(at[0]).as_text().to_lowercase();
                !text.is_empty()
                    && prefixes
                        .iter()
                        .any(|p| text.starts_with(p.to_lowercase().as_str()))
            }
            Predicate::Search { term, .. } => {
                let term = term.to_lowercase();
                at.iter()
                    .any(|idx| row.at(*idx).as_text().to_lowercase().contains(term.as_str()))
            }
            Predicate::OnDate { date, .. } => row.at(at[0]).to_date() == Some(*date),
        }
    }
}

fn cell_equals(cell: &Value, expected: &Value) -> bool {
    match expected {
        Value::Int(_) | Value::Decimal(_) => cell.to_decimal() == expected.to_decimal(),
        Value::Date(d) => cell.to_date() == Some(*d),
        Value::Null => cell.is_null(),
        Value::Text(s) => !cell.is_null() && cell.as_text() == s.as_str(),
    }
}

/// A named predicate with an optional negation
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub name: String,
    pub predicate: Predicate,
    pub negate: bool,
}

impl FilterSpec {
    pub fn new(name: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            name: name.into(),
            predicate,
            negate: false,
        }
    }

    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    pub fn equals(column: &str, value: impl Into<Value>) -> Self {
        Self::new(
            format!("{column} equals"),
            Predicate::Equals {
                column: column.to_string(),
                value: value.into(),
            },
        )
    }

    pub fn one_of(column: &str, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::new(
            format!("{column} one of"),
            Predicate::OneOf {
                column: column.to_string(),
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn at_least(column: &str, threshold: impl Into<Decimal>) -> Self {
        Self::new(
            format!("{column} at least"),
            Predicate::AtLeast {
                column: column.to_string(),
                threshold: threshold.into(),
            },
        )
    }

    pub fn at_most(column: &str, threshold: impl Into<Decimal>) -> Self {
        Self::new(
            format!("{column} at most"),
            Predicate::AtMost {
                column: column.to_string(),
                threshold: threshold.into(),
            },
        )
    }

    pub fn starts_with(column: &str, prefixes: &[&str]) -> Self {
        Self::new(
            format!("{column} prefix"),
            Predicate::StartsWith {
                column: column.to_string(),
                prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            },
        )
    }

    pub fn search(columns: &[&str], term: &str) -> Self {
        Self::new(
            "search",
            Predicate::Search {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                term: term.to_string(),
            },
        )
    }

    pub fn on_date(column: &str, date: NaiveDate) -> Self {
        Self::new(
            format!("{column} on date"),
            Predicate::OnDate {
                column: column.to_string(),
                date,
            },
        )
    }
}

/// Apply `filters` in order, each to the table the previous one left.
///
/// A filter naming a column the table does not have empties the result. The
/// input table is never modified.
pub fn apply(table: &Table, filters: &[FilterSpec]) -> Table {
    let mut current: Option<Table> = None;

    for spec in filters {
        let source = current.as_ref().unwrap_or(table);
        let resolved: Option<Vec<usize>> = spec
            .predicate
            .columns()
            .iter()
            .map(|name| source.column_index(name))
            .collect();

        let Some(at) = resolved else {
            tracing::debug!(filter = %spec.name, "filter column missing, result is empty");
            return table.empty_like();
        };

        let narrowed = source.filter(|row| spec.predicate.matches(row, &at) != spec.negate);
        current = Some(narrowed);
    }

    current.unwrap_or_else(|| table.clone())
}

/// Cap a result for interactive display. Export paths skip this.
pub fn cap_for_display(table: Table, max_rows: usize) -> Table {
    table.truncate(max_rows)
}

/// How a category label was matched by [`lookup_category`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    CaseInsensitive,
    Substring,
}

/// Find the rows of one category, trying exact, then case-insensitive, then
/// substring matching, and stopping at the first strategy that finds rows.
///
/// The substring stage can match several distinct categories at once (a
/// label `CARNE` also hits `CARNE BOVINA` and `CARNE SUINA`). Callers get the
/// strategy back so they can surface that.
pub fn lookup_category(table: &Table, column: &str, label: &str) -> (Table, Option<MatchStrategy>) {
    let Some(idx) = table.column_index(column) else {
        return (table.empty_like(), None);
    };
    let wanted = label.trim();
    if wanted.is_empty() {
        return (table.empty_like(), None);
    }
    let wanted_lower = wanted.to_lowercase();

    let strategies = [
        MatchStrategy::Exact,
        MatchStrategy::CaseInsensitive,
        MatchStrategy::Substring,
    ];

    for strategy in strategies {
        let found = table.filter(|row| {
            let cell = row.at(idx);
            if cell.is_null() {
                return false;
            }
            let text = cell.as_text();
            let text = text.trim();
            match strategy {
                MatchStrategy::Exact => text == wanted,
                MatchStrategy::CaseInsensitive => text.to_lowercase() == wanted_lower,
                MatchStrategy::Substring => text.to_lowercase().contains(wanted_lower.as_str()),
            }
        });
        if !found.is_empty() {
            if strategy != MatchStrategy::Exact {
                tracing::debug!(column, label, ?strategy, rows = found.len(), "category matched loosely");
            }
            return (found, Some(strategy));
        }
    }
    (table.empty_like(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn losses() -> Table {
        Table::from_rows(
            ["EVENTO", "DESCRICAO", "VLR.TOTAL"],
            vec![
                vec![Value::text("6004"), "RF PRESUNTO".into(), Value::text("10")],
                vec![Value::text("6504"), "HF ALFACE".into(), Value::text("4")],
                vec![Value::text("6504"), "rf mortadela".into(), Value::text("7")],
                vec![Value::text("1500"), "RF QUEIJO".into(), Value::text("2")],
                vec![Value::text("x"), Value::Null, Value::text("n/a")],
            ],
        )
    }

    fn descriptions(table: &Table) -> Vec<String> {
        table
            .column_values("DESCRICAO")
            .unwrap()
            .map(|v| v.as_text().into_owned())
            .collect()
    }

    #[test]
    fn test_event_and_prefix_chain_keeps_relative_order() {
        let filters = [
            FilterSpec::one_of("EVENTO", [6004i64, 6504]),
            FilterSpec::starts_with("DESCRICAO", &["RF"]),
        ];
        let result = apply(&losses(), &filters);
        assert_eq!(descriptions(&result), vec!["RF PRESUNTO", "rf mortadela"]);
    }

    #[test]
    fn test_negated_prefix_keeps_missing_text() {
        let result = apply(&losses(), &[FilterSpec::starts_with("DESCRICAO", &["HF", "RF"]).negated()]);
        assert_eq!(result.len(), 1);
        assert!(result.row(0).unwrap().get("DESCRICAO").unwrap().is_null());
    }

    #[test]
    fn test_numeric_threshold_treats_garbage_as_zero() {
        let result = apply(&losses(), &[FilterSpec::at_least("VLR.TOTAL", 0i64)]);
        assert_eq!(result.len(), 5);
        let result = apply(&losses(), &[FilterSpec::at_least("VLR.TOTAL", 5i64)]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_missing_column_yields_empty_table() {
        let result = apply(&losses(), &[FilterSpec::equals("OPERACAO", "AVARIAS")]);
        assert!(result.is_empty());
        assert_eq!(result.columns(), losses().columns());
    }

    #[test]
    fn test_search_any_column_case_insensitive() {
        let result = apply(&losses(), &[FilterSpec::search(&["EVENTO", "DESCRICAO"], "MORTA")]);
        assert_eq!(descriptions(&result), vec!["rf mortadela"]);
    }

    #[test]
    fn test_empty_chain_returns_copy() {
        assert_eq!(apply(&losses(), &[]), losses());
    }

    #[test]
    fn test_cap_for_display() {
        assert_eq!(cap_for_display(losses(), 2).len(), 2);
        assert_eq!(cap_for_display(losses(), 100).len(), 5);
    }

    #[test]
    fn test_lookup_category_falls_back_in_order() {
        let table = Table::from_rows(
            ["SUB-GRUPO"],
            vec![
                vec!["CARNE BOVINA".into()],
                vec!["Carne".into()],
                vec!["CARNE SUINA".into()],
            ],
        );

        let (rows, strategy) = lookup_category(&table, "SUB-GRUPO", "Carne");
        assert_eq!((rows.len(), strategy), (1, Some(MatchStrategy::Exact)));

        let (rows, strategy) = lookup_category(&table, "SUB-GRUPO", "CARNE");
        assert_eq!((rows.len(), strategy), (1, Some(MatchStrategy::CaseInsensitive)));

        let (rows, strategy) = lookup_category(&table, "SUB-GRUPO", "suina");
        assert_eq!((rows.len(), strategy), (1, Some(MatchStrategy::Substring)));

        let (rows, strategy) = lookup_category(&table, "SUB-GRUPO", "PEIXE");
        assert_eq!((rows.len(), strategy), (0, None));
    }
}
