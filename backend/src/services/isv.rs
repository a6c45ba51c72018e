//! Stale inventory (ISV) report
//!
//! Base table: the supplier list outer-joined with the stock ledger on the
//! normalized product code, one row per code.

use std::sync::Arc;

use shared::coerce::int_column;
use shared::filter::{apply, cap_for_display, FilterSpec};
use shared::join::{join, JoinHow};
use shared::key::{normalize_column, SourceKind};
use shared::models::isv::{self, ledger, supplier};
use shared::{ReportEnvelope, Table, Value};

use crate::config::ReportsConfig;
use crate::error::AppResult;
use crate::services::export::CsvExport;

/// Build the report base from the raw supplier list and stock ledger
pub fn build_base(suppliers: &Table, stock_ledger: &Table) -> Table {
    let suppliers = suppliers
        .clone()
        .rename_columns(&[
            (supplier::ITEM, isv::CODE),
            (supplier::CURRENT_SUPPLIER, supplier::TAX_ID),
            (supplier::UNNAMED_NAME, supplier::NAME),
        ])
        .drop_nulls(isv::SUPPLIER);
    let suppliers = normalize_column(suppliers, isv::CODE, SourceKind::SupplierList);

    let stock = stock_ledger.clone().rename_columns(&[
        (ledger::MERC, isv::CODE),
        (ledger::STOCK_EMB1, isv::STOCK_EMB1),
        (ledger::STOCK_EMB9, isv::STOCK_EMB9),
    ]);
    let stock = stock.select(&[
        isv::CODE,
        isv::DESCRIPTION,
        isv::PACKAGING,
        isv::DAYS_WITHOUT_SALE,
        isv::AGE,
        isv::STOCK_EMB1,
        isv::STOCK_EMB9,
    ]);
    let stock = normalize_column(stock, isv::CODE, SourceKind::StockLedger);

    let joined = join(&suppliers, &stock, isv::CODE, JoinHow::Outer).into_table();

    let mut base = joined.select(&isv::REPORT_COLUMNS);
    for column in isv::REPORT_COLUMNS {
        if isv::INTEGER_COLUMNS.contains(&column) {
            base = int_column(base.ensure_column(column, Value::Int(0)), column);
        } else {
            base = base
                .ensure_column(column, Value::text(""))
                .fill_nulls(column, Value::text(""));
        }
    }
    // select() may have dropped absent columns; restore the fixed layout
    base.select(&isv::REPORT_COLUMNS)
}

/// Stale inventory queries over one snapshot
pub struct IsvService {
    base: Arc<Table>,
    display_cap: usize,
}

impl IsvService {
    pub fn new(base: Arc<Table>, reports: &ReportsConfig) -> Self {
        Self {
            base,
            display_cap: reports.display_cap,
        }
    }

    /// Rows with at least `min_days` without sale, matching `search`.
    ///
    /// An unparseable `min_days` is ignored rather than rejected.
    pub fn filtered(&self, search: &str, min_days: &str) -> Table {
        let mut filters = Vec::new();
        if let Ok(days) = min_days.trim().parse::<i64>() {
            filters.push(FilterSpec::at_least(isv::DAYS_WITHOUT_SALE, days));
        } else if !min_days.trim().is_empty() {
            tracing::debug!(min_days, "ignoring unparseable minimum days");
        }
        let search = search.trim();
        if !search.is_empty() {
            filters.push(FilterSpec::search(&isv::SEARCH_COLUMNS, search));
        }
        apply(&self.base, &filters)
    }

    /// Interactive query, capped for display
    pub fn query(&self, search: &str, min_days: &str) -> ReportEnvelope {
        let rows = cap_for_display(self.filtered(search, min_days), self.display_cap);
        ReportEnvelope::ok(rows)
    }

    /// Same filters as [`IsvService::query`], untruncated
    pub fn export(&self, search: &str, min_days: &str) -> AppResult<CsvExport> {
        CsvExport::from_table("controle_isv", &self.filtered(search, min_days))
    }
}
