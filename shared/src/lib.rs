//! Report pipeline for the inventory dashboards
//!
//! Snapshot tables flow through key normalization, joins, filter chains,
//! aggregation, formatting and pagination. Everything here is pure: data
//! quality problems are substituted (0, empty text, `N/A`, empty tables)
//! rather than reported as errors.

pub mod aggregate;
pub mod coerce;
pub mod filter;
pub mod format;
pub mod join;
pub mod key;
pub mod models;
pub mod paginate;
pub mod table;
pub mod types;

pub use aggregate::{aggregate, AggregateReport, SortPolicy};
pub use filter::{FilterSpec, MatchStrategy};
pub use join::{enrich, join, JoinHow};
pub use key::{normalize, ProductKey, SourceKind};
pub use paginate::{paginate, Page};
pub use table::{Row, SortDirection, Table, Value};
pub use types::*;
