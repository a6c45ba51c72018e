//! Error handling for the inventory dashboards
//!
//! Every failure leaves the service in the report failure shape
//! `{success: false, error, data: [], total: 0}`.

use std::any::Any;

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shared::ReportEnvelope;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Nothing to export for the requested filters
    #[error("{0}")]
    NoData(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Export error: {0}")]
    Export(String),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NoData(_) => StatusCode::BAD_REQUEST,
            AppError::Snapshot(_)
            | AppError::Export(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Rejected: {}", self);
        }

        (status, Json(ReportEnvelope::failure(self.to_string()))).into_response()
    }
}

/// Render a handler panic in the same failure shape
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(%detail, "handler panicked");

    let body = serde_json::to_string(&ReportEnvelope::failure("Internal server error"))
        .unwrap_or_else(|_| r#"{"success":false,"data":[],"total":0}"#.to_string());

    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
