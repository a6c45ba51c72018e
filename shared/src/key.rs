//! Product key normalization
//!
//! The supplier list and the stock ledger encode the same product code at
//! different widths. Both are mapped into one 5-digit [`ProductKey`] domain so
//! the two tables can be joined.

use std::fmt;

use serde::Serialize;

use crate::coerce::strip_decimal_suffix;
use crate::table::{Table, Value};

/// Width of a normalized product key
pub const KEY_WIDTH: usize = 5;

/// Width the stock ledger pads to before dropping its two-digit catalog prefix
const STOCK_LEDGER_WIDTH: usize = 7;

/// Which export a raw code came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Supplier assignment list: codes may carry a spreadsheet `.0` suffix
    SupplierList,
    /// Stock ledger: 7-digit codes whose first two digits are a catalog prefix
    StockLedger,
}

/// Canonical product identifier: exactly [`KEY_WIDTH`] digits, or empty for
/// codes that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(transparent)]
pub struct ProductKey(String);

impl ProductKey {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a raw code from `source` into the shared key domain.
///
/// Malformed codes (blank, non-numeric) map to the empty key. Codes wider than
/// their source format keep their rightmost digits. Normalizing an already
/// normalized key returns it unchanged for both sources.
pub fn normalize(raw_code: &str, source: SourceKind) -> ProductKey {
    // Both exports can carry the spreadsheet float artifact
    let digits = strip_decimal_suffix(raw_code);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return ProductKey::empty();
    }

    let key = match source {
        SourceKind::SupplierList => right_align(digits, KEY_WIDTH),
        SourceKind::StockLedger => {
            let padded = right_align(digits, STOCK_LEDGER_WIDTH);
            padded[STOCK_LEDGER_WIDTH - KEY_WIDTH..].to_string()
        }
    };
    ProductKey(key)
}

/// Left-pad with zeros to `width`, keeping the rightmost `width` digits of
/// longer input
fn right_align(digits: &str, width: usize) -> String {
    if digits.len() >= width {
        digits[digits.len() - width..].to_string()
    } else {
        format!("{:0>width$}", digits, width = width)
    }
}

/// Replace a code column with normalized keys
pub fn normalize_column(table: Table, column: &str, source: SourceKind) -> Table {
    table.map_column(column, |value| {
        let key = normalize(&value.as_text(), source);
        if key.is_empty() {
            Value::Null
        } else {
            Value::Text(key.0)
        }
    })
}
