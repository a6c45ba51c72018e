//! Loss tracking (perdas) columns, event codes and report shapes

use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{AggregateReport, SortPolicy};
use crate::filter::MatchStrategy;
use crate::table::{SortDirection, Table};

pub const EVENT: &str = "EVENTO";
pub const ITEM: &str = "MERCADORIA";
pub const DESCRIPTION: &str = "DESCRICAO";
pub const OPERATION: &str = "OPERACAO";
pub const GROUP: &str = "GRUPO";
pub const SUBGROUP: &str = "SUB-GRUPO";
pub const VALUE: &str = "VLR.TOTAL";
pub const UNITS: &str = "EMB1";
pub const EVENT_DATE: &str = "DT.ULT.EV.";

/// Columns of the per-item loss listings
pub const DETAIL_COLUMNS: [&str; 4] = [ITEM, DESCRIPTION, VALUE, UNITS];

/// Columns of the total-loss boxes
pub const TOTAL_BOX_COLUMNS: [&str; 5] = [EVENT, ITEM, DESCRIPTION, VALUE, UNITS];

/// Preventive adjustment events
pub const PREVENTIVE_ADJUSTMENT_EVENTS: [i64; 2] = [6004, 6504];
pub const NEGATIVE_STOCK_EVENT: i64 = 6521;
pub const BREAKAGE_EVENT: i64 = 1500;
pub const ADJUSTMENT_EVENTS: [i64; 6] = [6004, 6001, 6504, 6021, 8000, 6501];
/// Subtracted from the loss totals
pub const REVERSAL_EVENT: i64 = 6501;

pub const PRODUCE_PREFIX: &str = "HF";
pub const COLD_CUTS_PREFIX: &str = "RF";

pub const PRODUCE_DAMAGE_OPERATION: &str = "AVARIAS / HORTIFRUT";
pub const EXPIRATION_OPERATION: &str = "MERCADORIAS AVARIADAS POR VENCIMENTO";

/// Subgroup labels go into URL paths, so `/` is swapped for this on display
pub const PATH_SAFE_SEPARATOR: char = '|';

/// Group ordering per preventive adjustment event
pub fn event_sort_policy() -> SortPolicy {
    SortPolicy::new(
        [(6004, SortDirection::Ascending), (6504, SortDirection::Descending)],
        SortDirection::Ascending,
    )
}

/// Oldest and newest event dates of the loss table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossMenu {
    pub oldest_event: String,
    pub newest_event: String,
}

/// Group totals of one preventive adjustment event
#[derive(Debug, Clone, Serialize)]
pub struct EventBreakdown {
    pub event: i64,
    pub direction: SortDirection,
    pub report: AggregateReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreventiveAdjustment {
    pub events: Vec<EventBreakdown>,
}

/// Items of one subgroup
#[derive(Debug, Clone, Serialize)]
pub struct SubgroupDetail {
    pub subgroup: String,
    pub matched_by: Option<MatchStrategy>,
    pub rows: Table,
}

/// A listing of loss rows with its totals
#[derive(Debug, Clone, Serialize)]
pub struct LossBox {
    pub rows: Table,
    pub row_count: usize,
    pub total_value: Decimal,
    pub formatted_total: String,
    pub total_units: Decimal,
}

/// Produce (HF) losses: damage operation vs everything else
#[derive(Debug, Clone, Serialize)]
pub struct ProduceLosses {
    pub damaged: LossBox,
    pub other: LossBox,
    pub formatted_total: String,
}

/// Overall and same-day losses split into breakage and adjustments
#[derive(Debug, Clone, Serialize)]
pub struct TotalLosses {
    pub breakage: LossBox,
    pub adjustments: LossBox,
    pub breakage_today: LossBox,
    pub adjustments_today: LossBox,
    pub today_value: Decimal,
    pub today_units: Decimal,
    pub formatted_loss_total: String,
    pub formatted_loss_total_today: String,
}

/// Cold cuts (RF) losses
#[derive(Debug, Clone, Serialize)]
pub struct ColdCutsLosses {
    pub adjustments: LossBox,
    pub breakage: LossBox,
    pub expiration: LossBox,
    pub formatted_total: String,
}
