//! Stock-out (ruptura) report
//!
//! Base table: the stock ledger rows that carry a rupture day count, ordered by
//! group then code.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use shared::coerce::int_column;
use shared::filter::{apply, FilterSpec};
use shared::models::stockout::{self, GroupStats, StockoutPage, StockoutPrint};
use shared::{paginate, SortDirection, Table, Value};

use crate::config::ReportsConfig;
use crate::error::{AppError, AppResult};
use crate::services::export::CsvExport;

/// Label reported when no group filter is active
const ALL_GROUPS_LABEL: &str = "all";

/// Build the report base from the raw stock ledger
pub fn build_base(stock_ledger: &Table) -> Table {
    let ledger = stock_ledger.clone().rename_columns(&stockout::RENAMES);
    if !ledger.has_column(stockout::RUPTURE_DAYS) {
        tracing::warn!(
            column = stockout::RUPTURE_DAYS,
            "stock ledger has no rupture column, stock-out report is empty"
        );
        return Table::new(stockout::BASE_COLUMNS);
    }

    let mut base = ledger
        .select(&stockout::BASE_COLUMNS)
        .drop_nulls(stockout::RUPTURE_DAYS)
        .fill_nulls(stockout::STOCK_EMB1, Value::Int(0))
        .fill_nulls(stockout::STOCK_EMB9, Value::Int(0));
    for column in stockout::INTEGER_COLUMNS {
        base = int_column(base, column);
    }
    if base.has_column(stockout::GROUP) {
        base = base.sort_by(&[
            (stockout::GROUP, SortDirection::Ascending),
            (stockout::CODE, SortDirection::Ascending),
        ]);
    }
    base.fill_nulls(stockout::LAST_ENTRY, Value::text(stockout::NO_ENTRY))
}

/// The group filter, or `None` for "every group"
fn selected_group(group: &str) -> Option<&str> {
    let group = group.trim();
    let everything = group.is_empty()
        || stockout::ALL_GROUPS
            .iter()
            .any(|all| all.eq_ignore_ascii_case(group));
    (!everything).then_some(group)
}

/// Stock-out queries over one snapshot
pub struct StockoutService {
    base: Arc<Table>,
    page_size: usize,
}

impl StockoutService {
    pub fn new(base: Arc<Table>, reports: &ReportsConfig) -> Self {
        Self {
            base,
            page_size: reports.page_size,
        }
    }

    /// Distinct non-empty groups, sorted
    pub fn groups(&self) -> Vec<String> {
        self.base
            .distinct_text(stockout::GROUP)
            .into_iter()
            .filter(|g| !g.trim().is_empty())
            .collect()
    }

    fn restrict(&self, group: Option<&str>) -> Table {
        match group {
            Some(group) => apply(&self.base, &[FilterSpec::equals(stockout::GROUP, group)]),
            None => self.base.as_ref().clone(),
        }
    }

    /// On-screen listing: one group is ordered by stock, largest first
    fn listing(&self, group: Option<&str>) -> Table {
        let rows = self.restrict(group);
        let rows = match group {
            Some(_) => rows.sort_by(&[(stockout::STOCK_EMB1, SortDirection::Descending)]),
            None => rows,
        };
        rows.select(&stockout::DISPLAY_COLUMNS)
    }

    pub fn index(&self, group: &str, page: i64) -> StockoutPage {
        let group = selected_group(group);
        StockoutPage {
            page: paginate(&self.listing(group), page, self.page_size),
            groups: self.groups(),
            selected_group: group.unwrap_or(ALL_GROUPS_LABEL).to_string(),
        }
    }

    /// Whole listing, unpaginated
    pub fn print(&self, group: &str) -> StockoutPrint {
        let group = selected_group(group);
        let rows = self.listing(group);
        StockoutPrint {
            total_items: rows.len(),
            rows,
            selected_group: group.unwrap_or(ALL_GROUPS_LABEL).to_string(),
        }
    }

    /// Export in base order, optionally with the group column
    pub fn export(&self, group: &str, include_group: bool) -> AppResult<CsvExport> {
        if self.base.is_empty() {
            return Err(AppError::NoData("Não há dados para exportar".to_string()));
        }

        let group = selected_group(group);
        let rows = self.restrict(group);
        if rows.is_empty() {
            return Err(AppError::NoData(
                "Nenhum dado encontrado para o grupo selecionado".to_string(),
            ));
        }

        let mut columns = stockout::DISPLAY_COLUMNS.to_vec();
        if include_group {
            columns.push(stockout::GROUP);
        }
        let stem = format!("controle_ruptura_{}", group.unwrap_or("todos_grupos"));
        CsvExport::from_table(&stem, &rows.select(&columns))
    }

    /// Per-group item count, mean rupture days and stock totals
    pub fn group_stats(&self) -> BTreeMap<String, GroupStats> {
        let mut stats = BTreeMap::new();
        for (label, positions) in self.base.index_by(stockout::GROUP) {
            if label.trim().is_empty() {
                continue;
            }
            let rows: Vec<_> = positions.iter().filter_map(|&pos| self.base.row(pos)).collect();
            let sum_of = |column: &str| -> Decimal {
                rows.iter()
                    .map(|row| row.get(column).map(Value::to_decimal).unwrap_or_default())
                    .sum()
            };

            let total_items = rows.len();
            let avg_rupture_days = if total_items == 0 {
                Decimal::ZERO
            } else {
                (sum_of(stockout::RUPTURE_DAYS) / Decimal::from(total_items))
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
            };

            stats.insert(
                label,
                GroupStats {
                    total_items,
                    avg_rupture_days,
                    total_stock_emb1: sum_of(stockout::STOCK_EMB1).trunc().try_into().unwrap_or(0),
                    total_stock_emb9: sum_of(stockout::STOCK_EMB9).trunc().try_into().unwrap_or(0),
                },
            );
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ledger() -> Table {
        let row = |code: &str, rupt: &str, entry: &str, emb1: &str, group: &str| {
            vec![
                Value::from_raw(code),
                Value::from_raw(&format!("ITEM {code}")),
                Value::from_raw("UN"),
                Value::from_raw(entry),
                Value::from_raw(rupt),
                Value::from_raw("12"),
                Value::from_raw(emb1),
                Value::from_raw("1"),
                Value::from_raw("2024-05-01"),
                Value::from_raw("30"),
                Value::from_raw("5"),
                Value::from_raw(group),
            ]
        };
        Table::from_rows(
            [
                "MERC",
                "DESCRICAO",
                "EMBALAGEM",
                "DT ULT ENT",
                "NAO VENDE (RUPT.)",
                "QTD ULT ENT",
                "ESTOQ EMB1",
                "ESTOQ EMB9",
                "DT ULT VND",
                "IDADE",
                "DIAS S/VND",
                "GRUPO",
            ],
            vec![
                row("30", "4", "2024-04-01", "2", "MERCEARIA"),
                row("10", "7", "", "9", "MERCEARIA"),
                row("20", "", "2024-04-02", "5", "MERCEARIA"),
                row("40", "3", "2024-04-03", "", "BEBIDAS"),
                row("50", "2", "2024-04-04", "1", ""),
            ],
        )
    }

    fn service() -> StockoutService {
        StockoutService::new(Arc::new(build_base(&ledger())), &ReportsConfig::default())
    }

    fn codes(table: &Table) -> Vec<String> {
        table
            .column_values("CODIGO")
            .unwrap()
            .map(|v| v.as_text().into_owned())
            .collect()
    }

    #[test]
    fn test_base_drops_rows_without_rupture_and_sorts() {
        let base = build_base(&ledger());
        // Blank group sorts last (nulls stay last)
        assert_eq!(codes(&base), vec!["40", "10", "30", "50"]);

        let bebidas = base.row(0).unwrap();
        assert_eq!(bebidas.get("ESTOQ EMB1"), Some(&Value::Int(0)));
        let no_entry = base.row(1).unwrap();
        assert_eq!(no_entry.get("DT ULT ENTRADA"), Some(&Value::text("SEM ENTRADA")));
        assert_eq!(no_entry.get("DIA S/VND (RUPT.)"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_base_sorts_codes_numerically() {
        let ledger = Table::from_rows(
            ["MERC", "NAO VENDE (RUPT.)", "GRUPO"],
            vec![
                vec!["100".into(), "1".into(), "MERCEARIA".into()],
                vec!["99".into(), "1".into(), "MERCEARIA".into()],
                vec!["1000".into(), "1".into(), "MERCEARIA".into()],
            ],
        );
        assert_eq!(codes(&build_base(&ledger)), vec!["99", "100", "1000"]);
    }

    #[test]
    fn test_base_without_rupture_column_is_empty() {
        let ledger = Table::from_rows(["MERC"], vec![vec!["1".into()]]);
        let base = build_base(&ledger);
        assert!(base.is_empty());
        assert_eq!(base.columns(), &stockout::BASE_COLUMNS);
    }

    #[test]
    fn test_groups_skip_blank() {
        assert_eq!(service().groups(), vec!["BEBIDAS", "MERCEARIA"]);
    }

    #[test]
    fn test_index_group_sorted_by_stock_desc() {
        let page = service().index("MERCEARIA", 1);
        assert_eq!(codes(&page.page.rows), vec!["10", "30"]);
        assert_eq!(page.selected_group, "MERCEARIA");
        assert_eq!(page.page.rows.columns(), &stockout::DISPLAY_COLUMNS);
    }

    #[test]
    fn test_index_all_keeps_base_order() {
        for all in ["", "all", "TODOS"] {
            let page = service().index(all, 1);
            assert_eq!(page.page.meta.total_items, 4);
            assert_eq!(page.selected_group, "all");
        }
    }

    #[test]
    fn test_export_errors() {
        let err = service().export("HORTI", false).unwrap_err();
        assert_eq!(err.to_string(), "Nenhum dado encontrado para o grupo selecionado");

        let empty = StockoutService::new(Arc::new(Table::default()), &ReportsConfig::default());
        let err = empty.export("all", false).unwrap_err();
        assert_eq!(err.to_string(), "Não há dados para exportar");
    }

    #[test]
    fn test_export_names_and_group_column() {
        let export = service().export("MERCEARIA", true).unwrap();
        assert!(export.file_name.starts_with("controle_ruptura_MERCEARIA_"));
        let text = String::from_utf8(export.content).unwrap();
        assert!(text.lines().next().unwrap().ends_with(";GRUPO"));
        // base order, not stock order
        assert!(text.lines().nth(1).unwrap().starts_with("10;"));

        let export = service().export("todos", false).unwrap();
        assert!(export.file_name.starts_with("controle_ruptura_todos_grupos_"));
        assert_eq!(String::from_utf8(export.content).unwrap().lines().count(), 5);
    }

    #[test]
    fn test_group_stats() {
        let stats = service().group_stats();
        assert_eq!(stats.len(), 2);
        let mercearia = &stats["MERCEARIA"];
        assert_eq!(mercearia.total_items, 2);
        assert_eq!(mercearia.avg_rupture_days, dec("5.5"));
        assert_eq!(mercearia.total_stock_emb1, 11);
        assert_eq!(mercearia.total_stock_emb9, 2);
    }
}
