//! Stock-out (ruptura) columns and report shapes

use rust_decimal::Decimal;
use serde::Serialize;

use crate::paginate::Page;
use crate::table::Table;

/// Ledger column -> report column
pub const RENAMES: [(&str, &str); 4] = [
    ("MERC", CODE),
    ("NAO VENDE (RUPT.)", RUPTURE_DAYS),
    ("DT ULT ENT", LAST_ENTRY),
    ("QTD ULT ENT", ENTRY_EMB1),
];

pub const CODE: &str = "CODIGO";
pub const DESCRIPTION: &str = "DESCRICAO";
pub const PACKAGING: &str = "EMBALAGEM";
pub const LAST_ENTRY: &str = "DT ULT ENTRADA";
pub const RUPTURE_DAYS: &str = "DIA S/VND (RUPT.)";
pub const ENTRY_EMB1: &str = "ENTRADA EMB1";
pub const STOCK_EMB1: &str = "ESTOQ EMB1";
pub const STOCK_EMB9: &str = "ESTOQ EMB9";
pub const LAST_SALE: &str = "DT ULT VND";
pub const AGE: &str = "IDADE";
pub const DAYS_WITHOUT_SALE: &str = "DIAS S/VND";
pub const GROUP: &str = "GRUPO";

/// Shown in place of a missing last entry date
pub const NO_ENTRY: &str = "SEM ENTRADA";

/// Columns kept from the ledger
pub const BASE_COLUMNS: [&str; 12] = [
    CODE,
    DESCRIPTION,
    PACKAGING,
    LAST_ENTRY,
    RUPTURE_DAYS,
    ENTRY_EMB1,
    STOCK_EMB1,
    STOCK_EMB9,
    LAST_SALE,
    AGE,
    DAYS_WITHOUT_SALE,
    GROUP,
];

pub const INTEGER_COLUMNS: [&str; 5] = [STOCK_EMB1, STOCK_EMB9, ENTRY_EMB1, RUPTURE_DAYS, AGE];

/// Columns shown on screen and in print; the group is only a filter
pub const DISPLAY_COLUMNS: [&str; 10] = [
    CODE,
    DESCRIPTION,
    PACKAGING,
    LAST_ENTRY,
    ENTRY_EMB1,
    RUPTURE_DAYS,
    STOCK_EMB1,
    STOCK_EMB9,
    LAST_SALE,
    AGE,
];

/// Group values that mean "no group filter"
pub const ALL_GROUPS: [&str; 2] = ["all", "todos"];

#[derive(Debug, Clone, Serialize)]
pub struct StockoutPage {
    #[serde(flatten)]
    pub page: Page,
    pub groups: Vec<String>,
    pub selected_group: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockoutPrint {
    pub rows: Table,
    pub total_items: usize,
    pub selected_group: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub total_items: usize,
    pub avg_rupture_days: Decimal,
    pub total_stock_emb1: i64,
    pub total_stock_emb9: i64,
}
