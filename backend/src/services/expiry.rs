//! Expiration (vencimento) report
//!
//! Base table: every lot of the expiry list, enriched with its supplier. Days
//! to expiry depend on the request date, so they are computed per request and
//! never stored in the snapshot.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::coerce::{date_column, decimal_column, int_column};
use shared::filter::{apply, FilterSpec};
use shared::format;
use shared::key::{normalize_column, SourceKind};
use shared::models::expiry::{self, ExpiryPage, ExpiryPrint};
use shared::{enrich, paginate, Page, SortDirection, Table, Value};

use crate::config::ReportsConfig;
use crate::error::AppResult;
use crate::services::export::CsvExport;

/// Supplier export column holding the supplier name when its header is blank
const UNNAMED_SUPPLIER: &str = "Unnamed: 2";

/// Build the report base from the raw expiry list and supplier list
pub fn build_base(expiry_list: &Table, suppliers: &Table) -> Table {
    let lots = expiry_list
        .clone()
        .rename_columns(&expiry::RENAMES)
        .with_column(expiry::JOIN_KEY, |row| {
            row.get(expiry::CODE).cloned().unwrap_or_default()
        });
    let lots = normalize_column(lots, expiry::JOIN_KEY, SourceKind::SupplierList);

    let mut suppliers = suppliers.clone().rename_columns(&expiry::SUPPLIER_RENAMES);
    if !suppliers.has_column(expiry::SUPPLIER) {
        suppliers = suppliers.rename_columns(&[(UNNAMED_SUPPLIER, expiry::SUPPLIER)]);
    }
    let suppliers = suppliers
        .select(&expiry::SUPPLIER_COLUMNS)
        .drop_nulls(expiry::SUPPLIER);
    let suppliers = normalize_column(suppliers, expiry::JOIN_KEY, SourceKind::SupplierList);

    let base = enrich(&lots, &suppliers, expiry::JOIN_KEY);
    let base = date_column(base, expiry::EXPIRES_ON);
    let base = int_column(base, expiry::STOCK_EMB1);
    let base = int_column(base, expiry::STOCK_EMB9);
    decimal_column(base, expiry::VALUE_AT_RISK)
}

/// Parse the optional day limit; blank or malformed means no limit
pub fn parse_max_days(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(days) => Some(days),
        Err(_) => {
            if !raw.is_empty() {
                tracing::debug!(max_days = raw, "ignoring unparseable day limit");
            }
            None
        }
    }
}

/// Visible columns with display formatting
fn display(rows: Table) -> Table {
    let rows = rows.select(&expiry::VISIBLE_COLUMNS);
    let rows = format::currency_column(rows, expiry::VALUE_AT_RISK);
    format::date_column(rows, expiry::EXPIRES_ON)
}

/// Expiration queries over one snapshot
pub struct ExpiryService {
    base: Arc<Table>,
    page_size: usize,
    window_days: i64,
}

impl ExpiryService {
    pub fn new(base: Arc<Table>, reports: &ReportsConfig) -> Self {
        Self {
            base,
            page_size: reports.page_size,
            window_days: reports.expiry_window_days,
        }
    }

    /// Lots not yet expired as of `today`, with their day count.
    ///
    /// Days are whole calendar days, so a lot expiring today counts as day 0
    /// and is still listed.
    pub fn with_days(&self, today: NaiveDate) -> Table {
        let dated = self
            .base
            .as_ref()
            .clone()
            .with_column(expiry::DAYS_TO_EXPIRE, |row| {
                row.get(expiry::EXPIRES_ON)
                    .and_then(Value::to_date)
                    .map(|date| Value::Int((date - today).num_days()))
                    .unwrap_or(Value::Null)
            })
            .drop_nulls(expiry::DAYS_TO_EXPIRE);
        apply(&dated, &[FilterSpec::at_least(expiry::DAYS_TO_EXPIRE, 0i64)])
    }

    /// Search and day-limit filters, soonest first
    pub fn listing(&self, today: NaiveDate, search: &str, max_days: Option<i64>) -> Table {
        let mut filters = Vec::new();
        let search = search.trim();
        if !search.is_empty() {
            filters.push(FilterSpec::search(&expiry::SEARCH_COLUMNS, search));
        }
        if let Some(days) = max_days {
            filters.push(FilterSpec::at_most(expiry::DAYS_TO_EXPIRE, days));
        }
        apply(&self.with_days(today), &filters)
            .sort_by(&[(expiry::EXPIRES_ON, SortDirection::Ascending)])
    }

    fn value_at_risk_listing(&self, today: NaiveDate) -> Table {
        self.with_days(today)
            .sort_by(&[(expiry::VALUE_AT_RISK, SortDirection::Descending)])
    }

    fn expiring_soon_listing(&self, today: NaiveDate) -> Table {
        apply(
            &self.with_days(today),
            &[FilterSpec::at_most(expiry::DAYS_TO_EXPIRE, self.window_days)],
        )
        .sort_by(&[(expiry::DAYS_TO_EXPIRE, SortDirection::Ascending)])
    }

    /// Paginate first, then format only the rows shown
    fn page_of(&self, rows: &Table, page: i64) -> Page {
        let mut page = paginate(rows, page, self.page_size);
        page.rows = display(page.rows);
        page
    }

    pub fn index(&self, today: NaiveDate, search: &str, max_days: Option<i64>, page: i64) -> ExpiryPage {
        ExpiryPage {
            page: self.page_of(&self.listing(today, search, max_days), page),
            filter: search.trim().to_string(),
            max_days,
        }
    }

    /// Lots ordered by value at risk, largest first
    pub fn value_at_risk(&self, today: NaiveDate, page: i64) -> ExpiryPage {
        ExpiryPage {
            page: self.page_of(&self.value_at_risk_listing(today), page),
            filter: String::new(),
            max_days: None,
        }
    }

    /// Lots expiring within the configured window, soonest first
    pub fn expiring_soon(&self, today: NaiveDate, page: i64) -> ExpiryPage {
        ExpiryPage {
            page: self.page_of(&self.expiring_soon_listing(today), page),
            filter: String::new(),
            max_days: Some(self.window_days),
        }
    }

    pub fn print(&self, today: NaiveDate, search: &str, max_days: Option<i64>) -> ExpiryPrint {
        let rows = display(self.listing(today, search, max_days));
        ExpiryPrint {
            total_items: rows.len(),
            rows,
            filter: search.trim().to_string(),
            max_days,
        }
    }

    pub fn export_filtered(&self, today: NaiveDate, search: &str, max_days: Option<i64>) -> AppResult<CsvExport> {
        let rows = self.listing(today, search, max_days).select(&expiry::EXPORT_COLUMNS);
        CsvExport::from_table("vencimentos_filtrados", &rows)
    }

    pub fn export_value_at_risk(&self, today: NaiveDate) -> AppResult<CsvExport> {
        CsvExport::from_table("valor_a_vencer", &self.value_at_risk_listing(today))
    }

    pub fn export_expiring_soon(&self, today: NaiveDate) -> AppResult<CsvExport> {
        let stem = format!("vencendo_{}_dias", self.window_days);
        CsvExport::from_table(&stem, &self.expiring_soon_listing(today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn lots() -> Table {
        let row = |code: &str, desc: &str, date: &str, value: &str| {
            vec![
                Value::from_raw(code),
                Value::from_raw(desc),
                Value::from_raw("LOTE"),
                Value::from_raw("UN"),
                Value::from_raw(date),
                Value::from_raw("10"),
                Value::from_raw("1"),
                Value::from_raw(value),
            ]
        };
        Table::from_rows(
            [
                "CÓDIGO",
                "DESCRIÇÃO MERCADORIA",
                "COMPLEMENTO",
                "EMBALAGEM",
                "DATA VENCIMENTO",
                "EST. LÍQ. EMB1",
                "EST. LÍQ. EMB9",
                "VALOR VENCIMENTO",
            ],
            vec![
                row("12345", "LEITE", "15/05/2024", "1.234,50"),
                row("12345", "LEITE", "10/05/2024", "20,00"),
                row("54321", "IOGURTE", "2024-08-01", "300"),
                row("99999", "PAO", "01/05/2024", "50"),
                row("11111", "QUEIJO", "", "10"),
            ],
        )
    }

    fn suppliers() -> Table {
        Table::from_rows(
            ["Item Produto", "Fornecedor Atual", "Unnamed: 2"],
            vec![
                vec!["12345.0".into(), "111".into(), "ACME".into()],
                vec!["54321".into(), "222".into(), "BETA".into()],
                vec!["12345".into(), "333".into(), "DUPLICADO".into()],
            ],
        )
    }

    fn service() -> ExpiryService {
        ExpiryService::new(Arc::new(build_base(&lots(), &suppliers())), &ReportsConfig::default())
    }

    fn column(table: &Table, name: &str) -> Vec<String> {
        table
            .column_values(name)
            .unwrap()
            .map(|v| v.as_text().into_owned())
            .collect()
    }

    #[test]
    fn test_base_keeps_every_lot() {
        let base = build_base(&lots(), &suppliers());
        assert_eq!(base.len(), 5);
        assert_eq!(column(&base, "FORNECEDOR")[..3], ["ACME", "ACME", "BETA"]);
        assert!(base.row(3).unwrap().get("FORNECEDOR").unwrap().is_null());
    }

    #[test]
    fn test_codes_keep_their_exported_form() {
        let lots = Table::from_rows(
            ["CÓDIGO", "DATA VENCIMENTO"],
            vec![vec!["777".into(), "2024-06-01".into()]],
        );
        let suppliers = Table::from_rows(
            ["Item Produto", "Fornecedor Atual", "Unnamed: 2"],
            vec![vec!["00777".into(), "444".into(), "GAMA".into()]],
        );
        let base = build_base(&lots, &suppliers);
        let lot = base.row(0).unwrap();
        assert_eq!(lot.get("CODIGO"), Some(&Value::text("777")));
        assert_eq!(lot.get("FORNECEDOR"), Some(&Value::text("GAMA")));
        assert!(!display(base.clone()).has_column(expiry::JOIN_KEY));
    }

    #[test]
    fn test_days_keep_today_and_drop_past() {
        let dated = service().with_days(today());
        assert_eq!(column(&dated, "DIAS_PARA_VENCER"), vec!["5", "0", "83"]);
    }

    #[test]
    fn test_index_sorted_and_formatted() {
        let page = service().index(today(), "", None, 1);
        assert_eq!(page.page.meta.total_items, 3);
        assert_eq!(page.page.rows.columns(), &expiry::VISIBLE_COLUMNS);
        assert_eq!(
            column(&page.page.rows, "VENCIMENTO"),
            vec!["10/05/2024", "15/05/2024", "01/08/2024"]
        );
        assert_eq!(
            column(&page.page.rows, "VALOR A VENCER"),
            vec!["R$ 20,00", "R$ 1.234,50", "R$ 300,00"]
        );
    }

    #[test]
    fn test_index_filters() {
        assert_eq!(service().index(today(), "acme", None, 1).page.meta.total_items, 2);
        assert_eq!(service().index(today(), "", Some(10), 1).page.meta.total_items, 2);
        assert_eq!(parse_max_days("abc"), None);
        assert_eq!(parse_max_days(" 30 "), Some(30));
    }

    #[test]
    fn test_value_at_risk_descending() {
        let page = service().value_at_risk(today(), 1);
        assert_eq!(column(&page.page.rows, "DESCRICAO"), vec!["LEITE", "IOGURTE", "LEITE"]);
    }

    #[test]
    fn test_expiring_soon_window() {
        let page = service().expiring_soon(today(), 1);
        assert_eq!(page.max_days, Some(45));
        assert_eq!(
            column(&page.page.rows, "VENCIMENTO"),
            vec!["10/05/2024", "15/05/2024"]
        );
    }

    #[test]
    fn test_print_is_unpaginated() {
        let reports = ReportsConfig {
            page_size: 1,
            ..ReportsConfig::default()
        };
        let service = ExpiryService::new(Arc::new(build_base(&lots(), &suppliers())), &reports);
        assert_eq!(service.index(today(), "", None, 1).page.rows.len(), 1);
        assert_eq!(service.print(today(), "", None).total_items, 3);
    }

    #[test]
    fn test_exports_are_unformatted() {
        let export = service().export_filtered(today(), "", None).unwrap();
        assert!(export.file_name.starts_with("vencimentos_filtrados_"));
        let text = String::from_utf8(export.content).unwrap();
        assert_eq!(text.lines().next().unwrap(), expiry::EXPORT_COLUMNS.join(";"));
        assert!(text.lines().nth(1).unwrap().starts_with("12345;LEITE;2024-05-10;"));
        assert!(text.contains("1234.5"));

        let export = service().export_expiring_soon(today()).unwrap();
        assert!(export.file_name.starts_with("vencendo_45_dias_"));
    }
}
