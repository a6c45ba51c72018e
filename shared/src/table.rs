//! In-memory tables for report snapshots
//!
//! A [`Table`] is an ordered sequence of rows sharing one column set. Missing
//! cells are stored as [`Value::Null`], never omitted, so every row has exactly
//! one value per column.
//!
//! Transforms that change a table take `self` by value. Shared base tables are
//! held behind `Arc`, so a request has to clone its own copy before calling any
//! of them and the shared original is never touched.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::coerce;

/// A single heterogeneous cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Int(i64),
    Decimal(Decimal),
    Date(NaiveDate),
}

impl Value {
    /// Build a cell from raw snapshot text; blank text becomes `Null`
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Value::Null
        } else {
            Value::Text(trimmed.to_string())
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text view of the cell. `Null` reads as the empty string.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            Value::Int(i) => Cow::Owned(i.to_string()),
            Value::Decimal(d) => Cow::Owned(d.normalize().to_string()),
            Value::Date(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Numeric view of the cell. Anything unparseable reads as zero.
    pub fn to_decimal(&self) -> Decimal {
        self.try_decimal().unwrap_or(Decimal::ZERO)
    }

    pub fn try_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int(i) => Some(Decimal::from(*i)),
            Value::Decimal(d) => Some(*d),
            Value::Text(s) => coerce::parse_decimal(s),
            Value::Null | Value::Date(_) => None,
        }
    }

    /// Integer view of the cell, truncating toward zero. Unparseable reads as zero.
    pub fn to_int(&self) -> i64 {
        match self {
            Value::Int(i) => *i,
            other => other.try_decimal().and_then(|d| d.trunc().to_i64()).unwrap_or(0),
        }
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => coerce::parse_date(s),
            _ => None,
        }
    }

    /// Ordering used by column sorts: numbers (including numeric text such as
    /// product codes) numerically, then dates chronologically, then the rest as
    /// text. Nulls compare greater than any value.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self.sort_key(), other.sort_key()) {
            (SortKey::Number(a), SortKey::Number(b)) => a.cmp(&b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(&b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn sort_key(&self) -> SortKey<'_> {
        match self {
            Value::Null => SortKey::Null,
            Value::Int(i) => SortKey::Number(Decimal::from(*i)),
            Value::Decimal(d) => SortKey::Number(*d),
            Value::Date(d) => SortKey::Date(*d),
            Value::Text(s) => match coerce::parse_decimal(s) {
                Some(d) => SortKey::Number(d),
                None => SortKey::Text(s),
            },
        }
    }
}

/// Comparable form of a cell; variants are listed in sort order
enum SortKey<'a> {
    Number(Decimal),
    Date(NaiveDate),
    Text(&'a str),
    Null,
}

impl SortKey<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Date(_) => 1,
            SortKey::Text(_) => 2,
            SortKey::Null => 3,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Decimal(d) => match d.to_f64() {
                Some(f) => serializer.serialize_f64(f),
                None => serializer.serialize_str(&d.to_string()),
            },
            Value::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Sort direction for column and group ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Borrowed view of one row: a mapping from column name to value
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    /// Cell at a known column position
    pub fn at(&self, index: usize) -> &'a Value {
        &self.values[index]
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Ordered rows over one column set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: impl IntoIterator<Item = Vec<Value>>,
    ) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Append a row, padding short rows with `Null` and dropping surplus cells
    pub fn push_row(&mut self, mut values: Vec<Value>) {
        values.resize(self.columns.len(), Value::Null);
        self.rows.push(values);
    }

    /// Same columns, no rows
    pub fn empty_like(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Values of one column, or `None` when the column is absent
    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Rename columns; names not present are ignored
    pub fn rename_columns(mut self, mapping: &[(&str, &str)]) -> Self {
        for column in &mut self.columns {
            if let Some((_, to)) = mapping.iter().find(|(from, _)| from == column) {
                *column = (*to).to_string();
            }
        }
        self
    }

    /// Project onto the listed columns that exist, in the listed order
    pub fn select(&self, names: &[&str]) -> Self {
        let picked: Vec<(usize, &str)> = names
            .iter()
            .filter_map(|name| self.column_index(name).map(|idx| (idx, *name)))
            .collect();

        Self {
            columns: picked.iter().map(|(_, name)| name.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| picked.iter().map(|(idx, _)| row[*idx].clone()).collect())
                .collect(),
        }
    }

    /// Rows matching `predicate`, cloned into a new table
    pub fn filter(&self, mut predicate: impl FnMut(Row<'_>) -> bool) -> Self {
        let rows = self
            .rows
            .iter()
            .filter(|values| {
                predicate(Row {
                    columns: &self.columns,
                    values,
                })
            })
            .cloned()
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Rewrite every cell of one column. Absent columns leave the table unchanged.
    pub fn map_column(mut self, name: &str, f: impl Fn(&Value) -> Value) -> Self {
        if let Some(idx) = self.column_index(name) {
            for row in &mut self.rows {
                row[idx] = f(&row[idx]);
            }
        }
        self
    }

    /// Add (or replace) a column computed from each row
    pub fn with_column(mut self, name: &str, f: impl Fn(Row<'_>) -> Value) -> Self {
        let computed: Vec<Value> = self.rows().map(&f).collect();
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(computed) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(computed) {
                    row.push(value);
                }
            }
        }
        self
    }

    /// Ensure a column exists, filling it with `default` when it has to be added
    pub fn ensure_column(self, name: &str, default: Value) -> Self {
        if self.has_column(name) {
            self
        } else {
            self.with_column(name, |_| default.clone())
        }
    }

    /// Drop rows whose cell in `name` is null. Absent columns drop nothing.
    pub fn drop_nulls(mut self, name: &str) -> Self {
        if let Some(idx) = self.column_index(name) {
            self.rows.retain(|row| !row[idx].is_null());
        }
        self
    }

    pub fn fill_nulls(self, name: &str, fill: Value) -> Self {
        self.map_column(name, |v| if v.is_null() { fill.clone() } else { v.clone() })
    }

    /// Stable sort by the listed columns; absent columns are skipped
    pub fn sort_by(mut self, keys: &[(&str, SortDirection)]) -> Self {
        let resolved: Vec<(usize, SortDirection)> = keys
            .iter()
            .filter_map(|(name, dir)| self.column_index(name).map(|idx| (idx, *dir)))
            .collect();
        if resolved.is_empty() {
            return self;
        }

        self.rows.sort_by(|a, b| {
            for (idx, dir) in &resolved {
                let ord = match (&a[*idx], &b[*idx]) {
                    // Nulls stay last in both directions
                    (Value::Null, _) | (_, Value::Null) => a[*idx].sort_cmp(&b[*idx]),
                    (x, y) => match dir {
                        SortDirection::Ascending => x.sort_cmp(y),
                        SortDirection::Descending => y.sort_cmp(x),
                    },
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        self
    }

    /// Rows `[start, end)`, clamped to the table
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.rows.len());
        let start = start.min(end);
        Self {
            columns: self.columns.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }

    pub fn head(&self, n: usize) -> Self {
        self.slice(0, n)
    }

    /// Keep only the first `n` rows in place
    pub fn truncate(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Sum of a column; unparseable cells count as zero, absent columns sum to zero
    pub fn sum(&self, name: &str) -> Decimal {
        self.column_values(name)
            .map(|values| values.map(Value::to_decimal).sum())
            .unwrap_or(Decimal::ZERO)
    }

    /// Sorted distinct non-null text values of a column
    pub fn distinct_text(&self, name: &str) -> Vec<String> {
        self.column_values(name)
            .map(|values| {
                values
                    .filter(|v| !v.is_null())
                    .map(|v| v.as_text().into_owned())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Row positions keyed by the text of one column, in first-seen order
    pub fn index_by(&self, name: &str) -> Vec<(String, Vec<usize>)> {
        let Some(idx) = self.column_index(name) else {
            return Vec::new();
        };
        let mut order: Vec<(String, Vec<usize>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (row_idx, row) in self.rows.iter().enumerate() {
            let key = row[idx].as_text().into_owned();
            match positions.get(&key) {
                Some(slot) => order[*slot].1.push(row_idx),
                None => {
                    positions.insert(key.clone(), order.len());
                    order.push((key, vec![row_idx]));
                }
            }
        }
        order
    }

    pub(crate) fn raw_rows(&self) -> &[Vec<Value>] {
        &self.rows
    }
}

/// Serializes as a list of `{column: value}` records in column order
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows() {
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}
