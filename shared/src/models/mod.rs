//! Column layouts, event codes and response shapes of each report

pub mod expiry;
pub mod isv;
pub mod loss;
pub mod stockout;
