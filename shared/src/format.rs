//! Brazilian-locale display formatting
//!
//! Currency rounds to two places with round-half-to-even (banker's rounding),
//! then renders as `R$ 1.234,50`.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::table::{Table, Value};

/// Placeholder for dates that are absent or unparseable
pub const DATE_PLACEHOLDER: &str = "N/A";

/// Round to cents and fix the scale at two places
fn to_cents(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(2);
    rounded
}

/// Format a value as Brazilian currency, e.g. `1234.5` -> `R$ 1.234,50`
pub fn format_currency(value: Decimal) -> String {
    let cents = to_cents(value);
    let text = cents.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if cents.is_sign_negative() && !cents.is_zero() { "-" } else { "" };
    format!("R$ {sign}{grouped},{frac_part}")
}

/// Two-decimal plain number (`1234.50`), used by detail popups
pub fn format_plain(value: Decimal) -> String {
    to_cents(value).to_string()
}

/// `DD/MM/YYYY`, or [`DATE_PLACEHOLDER`] when absent
pub fn format_date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| DATE_PLACEHOLDER.to_string())
}

/// Replace a numeric column with currency strings
pub fn currency_column(table: Table, column: &str) -> Table {
    table.map_column(column, |v| Value::Text(format_currency(v.to_decimal())))
}

/// Replace a numeric column with plain two-decimal strings
pub fn plain_column(table: Table, column: &str) -> Table {
    table.map_column(column, |v| Value::Text(format_plain(v.to_decimal())))
}

/// Replace a date column with display strings
pub fn date_column(table: Table, column: &str) -> Table {
    table.map_column(column, |v| Value::Text(format_date(v.to_date())))
}
