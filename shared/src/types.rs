//! Common types used across the reports

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Result contract of the tabular report queries.
///
/// On failure `data` is empty, `total` is 0 and `error` carries the message;
/// errors never escape a query any other way.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub data: Table,
    pub total: usize,
}

impl ReportEnvelope {
    pub fn ok(data: Table) -> Self {
        Self {
            success: true,
            error: None,
            total: data.len(),
            data,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data: Table::default(),
            total: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_shape() {
        let json = serde_json::to_value(ReportEnvelope::failure("boom")).unwrap();
        assert_eq!(
            json,
            json!({"success": false, "error": "boom", "data": [], "total": 0})
        );
    }

    #[test]
    fn test_ok_counts_rows() {
        let table = Table::from_rows(["A"], vec![vec!["x".into()], vec!["y".into()]]);
        let json = serde_json::to_value(ReportEnvelope::ok(table)).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
    }
}
