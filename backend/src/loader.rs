//! Delimited snapshot reader
//!
//! The upstream systems export `;`-separated text, usually Latin-1. The first
//! record is the header. Every cell is loaded as text (or null when blank);
//! the reports coerce the columns they need.

use std::collections::HashMap;
use std::path::Path;

use encoding_rs::Encoding;
use shared::{Table, Value};

use crate::config::{DataConfig, SnapshotEncoding};
use crate::error::{AppError, AppResult};

const DEFAULT_DELIMITER: u8 = b';';

/// Reads snapshot exports into [`Table`]s
#[derive(Debug, Clone, Copy)]
pub struct SnapshotReader {
    delimiter: u8,
    encoding: &'static Encoding,
}

impl SnapshotReader {
    pub fn new(delimiter: char, encoding: SnapshotEncoding) -> Self {
        let delimiter = u8::try_from(delimiter).unwrap_or_else(|_| {
            tracing::warn!(%delimiter, "non-ASCII delimiter, falling back to ';'");
            DEFAULT_DELIMITER
        });
        Self {
            delimiter,
            encoding: encoding.encoding(),
        }
    }

    pub fn from_config(data: &DataConfig) -> Self {
        Self::new(data.delimiter, data.encoding)
    }

    /// Read a snapshot file. An unreadable file degrades to an empty table.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Table {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "snapshot unreadable, using empty table");
                return Table::default();
            }
        };

        match self.read_bytes(&bytes) {
            Ok(table) => {
                tracing::info!(
                    path = %path.display(),
                    rows = table.len(),
                    columns = table.columns().len(),
                    "snapshot loaded"
                );
                table
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "snapshot malformed, using empty table");
                Table::default()
            }
        }
    }

    /// Parse snapshot bytes
    pub fn read_bytes(&self, bytes: &[u8]) -> AppResult<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.byte_records();
        let header = match records.next() {
            Some(record) => record.map_err(|e| AppError::Snapshot(format!("header: {}", e)))?,
            None => return Ok(Table::default()),
        };

        let mut table = Table::new(header_names(
            header.iter().map(|field| self.decode(field)),
        ));
        for record in records {
            let record = record.map_err(|e| AppError::Snapshot(format!("record: {}", e)))?;
            table.push_row(
                record
                    .iter()
                    .map(|field| Value::from_raw(&self.decode(field)))
                    .collect(),
            );
        }
        Ok(table)
    }

    fn decode(&self, field: &[u8]) -> String {
        let (text, _, had_errors) = self.encoding.decode(field);
        if had_errors {
            tracing::debug!(encoding = self.encoding.name(), "replaced undecodable bytes");
        }
        text.into_owned()
    }
}

/// Clean header names: blank cells become `Unnamed: {index}` and repeated
/// names get a `.{n}` suffix
fn header_names(raw: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.enumerate()
        .map(|(idx, name)| {
            let name = name.trim_start_matches('\u{feff}').trim().to_string();
            let name = if name.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                name
            };
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                name
            } else {
                format!("{}.{}", name, *count - 1)
            }
        })
        .collect()
}
