//! HTTP handlers for the report endpoints

pub mod admin;
pub mod expiry;
pub mod health;
pub mod isv;
pub mod loss;
pub mod stockout;

pub use admin::*;
pub use expiry::*;
pub use health::*;
pub use isv::*;
pub use loss::*;
pub use stockout::*;

use chrono::{Local, NaiveDate};

/// Report date for day-relative filters
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// 1-based page number; anything unparseable is the first page
pub(crate) fn page_number(raw: Option<&str>) -> i64 {
    raw.and_then(|p| p.trim().parse().ok()).unwrap_or(1)
}
