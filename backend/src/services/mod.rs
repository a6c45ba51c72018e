//! Report services over the snapshot base tables

pub mod expiry;
pub mod export;
pub mod isv;
pub mod loss;
pub mod snapshot;
pub mod stockout;

pub use expiry::ExpiryService;
pub use export::CsvExport;
pub use isv::IsvService;
pub use loss::LossService;
pub use snapshot::{RawSnapshots, SnapshotStore, Snapshots};
pub use stockout::StockoutService;
