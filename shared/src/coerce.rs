//! Input-quality coercions for snapshot cells
//!
//! Snapshot exports are hand-maintained spreadsheets, so numbers arrive with
//! Brazilian separators (`1.234,56`), spreadsheet floats (`12345.0`) or stray
//! blanks. Nothing here fails: unparseable input is `None` and callers decide
//! the substitute.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::table::{Table, Value};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse a number written either with `.` decimals or Brazilian `,` decimals
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Parse an integer the way spreadsheet columns are cast: truncate toward zero
pub fn parse_int(raw: &str) -> Option<i64> {
    use rust_decimal::prelude::ToPrimitive;
    parse_decimal(raw).and_then(|d| d.trunc().to_i64())
}

/// Parse a calendar date, accepting ISO and `DD/MM/YYYY` forms with or without time
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Cast a column to integers; missing or malformed cells become 0
pub fn int_column(table: Table, column: &str) -> Table {
    table.map_column(column, |v| Value::Int(v.to_int()))
}

/// Cast a column to decimals; missing or malformed cells become 0
pub fn decimal_column(table: Table, column: &str) -> Table {
    table.map_column(column, |v| Value::Decimal(v.to_decimal()))
}

/// Cast a column to dates; unparseable cells become null
pub fn date_column(table: Table, column: &str) -> Table {
    table.map_column(column, |v| Value::from(v.to_date()))
}

/// Strip a trailing spreadsheet float suffix such as `.0` from code-like text
pub fn strip_decimal_suffix(raw: &str) -> &str {
    raw.trim().split('.').next().unwrap_or("")
}
