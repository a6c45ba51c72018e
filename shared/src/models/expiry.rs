//! Expiration (vencimento) columns and report shapes

use serde::Serialize;

use crate::paginate::Page;
use crate::table::Table;

/// Expiry list column -> report column
pub const RENAMES: [(&str, &str); 6] = [
    ("CÓDIGO", CODE),
    ("DESCRIÇÃO MERCADORIA", DESCRIPTION),
    ("DATA VENCIMENTO", EXPIRES_ON),
    ("EST. LÍQ. EMB1", STOCK_EMB1),
    ("EST. LÍQ. EMB9", STOCK_EMB9),
    ("VALOR VENCIMENTO", VALUE_AT_RISK),
];

/// Supplier list column -> report column
pub const SUPPLIER_RENAMES: [(&str, &str); 2] =
    [("Item Produto", JOIN_KEY), ("Fornecedor Atual", TAX_ID)];

pub const CODE: &str = "CODIGO";
pub const DESCRIPTION: &str = "DESCRICAO";
pub const COMPLEMENT: &str = "COMPLEMENTO";
pub const PACKAGING: &str = "EMBALAGEM";
pub const SUPPLIER: &str = "FORNECEDOR";
pub const TAX_ID: &str = "CPF/CNPJ";
pub const STOCK_EMB1: &str = "ESTOQ.EMB1";
pub const STOCK_EMB9: &str = "ESTOQ.EMB9";
pub const VALUE_AT_RISK: &str = "VALOR A VENCER";
pub const EXPIRES_ON: &str = "VENCIMENTO";
pub const DAYS_TO_EXPIRE: &str = "DIAS_PARA_VENCER";

/// Normalized product key; the lot keeps its code as exported
pub const JOIN_KEY: &str = "CHAVE";

/// Columns kept from the supplier list before the join
pub const SUPPLIER_COLUMNS: [&str; 3] = [JOIN_KEY, TAX_ID, SUPPLIER];

pub const SEARCH_COLUMNS: [&str; 3] = [CODE, DESCRIPTION, SUPPLIER];

/// Columns of the on-screen and print listings
pub const VISIBLE_COLUMNS: [&str; 9] = [
    CODE,
    DESCRIPTION,
    COMPLEMENT,
    PACKAGING,
    SUPPLIER,
    STOCK_EMB1,
    STOCK_EMB9,
    VALUE_AT_RISK,
    EXPIRES_ON,
];

/// Columns of the filtered export
pub const EXPORT_COLUMNS: [&str; 7] = [
    CODE,
    DESCRIPTION,
    EXPIRES_ON,
    STOCK_EMB1,
    STOCK_EMB9,
    VALUE_AT_RISK,
    SUPPLIER,
];

#[derive(Debug, Clone, Serialize)]
pub struct ExpiryPage {
    #[serde(flatten)]
    pub page: Page,
    pub filter: String,
    pub max_days: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiryPrint {
    pub rows: Table,
    pub total_items: usize,
    pub filter: String,
    pub max_days: Option<i64>,
}
