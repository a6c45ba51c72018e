//! Stale inventory (ISV) columns

/// Supplier list export columns
pub mod supplier {
    pub const ITEM: &str = "Item Produto";
    pub const CURRENT_SUPPLIER: &str = "Fornecedor Atual";
    /// The supplier name column ships without a header
    pub const UNNAMED_NAME: &str = "Unnamed: 2";
    pub const NAME: &str = "FORNECEDOR";
    pub const TAX_ID: &str = "CNPJ/CPF";
}

/// Stock ledger export columns
pub mod ledger {
    pub const MERC: &str = "MERC";
    pub const STOCK_EMB1: &str = "ESTOQ EMB1";
    pub const STOCK_EMB9: &str = "ESTOQ EMB9";
}

pub const CODE: &str = "CODIGO";
pub const DESCRIPTION: &str = "DESCRICAO";
pub const PACKAGING: &str = "EMBALAGEM";
pub const SUPPLIER: &str = "FORNECEDOR";
pub const STOCK_EMB1: &str = "ESTOQUE EMB1";
pub const STOCK_EMB9: &str = "ESTOQUE EMB9";
pub const AGE: &str = "IDADE";
pub const DAYS_WITHOUT_SALE: &str = "DIAS S/VND";

/// Column layout of the stale-inventory report
pub const REPORT_COLUMNS: [&str; 8] = [
    CODE,
    DESCRIPTION,
    PACKAGING,
    SUPPLIER,
    STOCK_EMB1,
    STOCK_EMB9,
    AGE,
    DAYS_WITHOUT_SALE,
];

/// Columns coerced to integers, missing or malformed cells reading as 0
pub const INTEGER_COLUMNS: [&str; 4] = [STOCK_EMB1, STOCK_EMB9, AGE, DAYS_WITHOUT_SALE];

/// Columns the free-text search looks at
pub const SEARCH_COLUMNS: [&str; 3] = [CODE, DESCRIPTION, SUPPLIER];
