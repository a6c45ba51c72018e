//! Delimited-text export of report tables
//!
//! Exports are never truncated or paginated. Values are written unformatted
//! (plain decimals, ISO dates) in the table's column order, and the file name
//! carries a digest of the content so identical exports get identical names.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use shared::Table;

use crate::error::{AppError, AppResult};

/// Field delimiter of exported files
pub const EXPORT_DELIMITER: u8 = b';';

/// Hex characters of the content digest kept in file names
const DIGEST_CHARS: usize = 8;

/// A finished export, ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl CsvExport {
    /// Serialize `table` and name the file `{stem}_{digest}.csv`
    pub fn from_table(stem: &str, table: &Table) -> AppResult<Self> {
        let content = to_delimited(table, EXPORT_DELIMITER)?;
        let file_name = format!("{}_{}.csv", sanitize_stem(stem), content_digest(&content));
        tracing::info!(file = %file_name, rows = table.len(), "export ready");
        Ok(Self { file_name, content })
    }
}

impl IntoResponse for CsvExport {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.file_name),
                ),
            ],
            self.content,
        )
            .into_response()
    }
}

/// Write a header line plus one line per row
pub fn to_delimited(table: &Table, delimiter: u8) -> AppResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(vec![]);

    wtr.write_record(table.columns())
        .map_err(|e| AppError::Export(format!("CSV header error: {}", e)))?;
    for row in table.rows() {
        wtr.write_record(row.values().iter().map(|v| v.as_text().into_owned()))
            .map_err(|e| AppError::Export(format!("CSV serialization error: {}", e)))?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Export(format!("CSV writer error: {}", e)))
}

/// First characters of the SHA-256 of `content`
pub fn content_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let hex = format!("{:x}", hasher.finalize());
    hex[..DIGEST_CHARS].to_string()
}

/// Keep file-name-safe characters; everything else becomes `_`
fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
