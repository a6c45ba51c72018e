//! Loss tracking (perdas) reports
//!
//! Every view starts from the loss-event table and narrows it with a filter
//! chain. Value totals are computed before currency formatting is applied.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::aggregate::{aggregate, AggregateReport};
use shared::coerce::{date_column, decimal_column, int_column};
use shared::filter::{apply, lookup_category, FilterSpec};
use shared::format::{currency_column, format_currency, format_date, plain_column};
use shared::models::loss::{self, *};
use shared::{SortDirection, Table, Value};

use crate::config::ReportsConfig;

/// Coerce the loss-event columns once, at snapshot build time
pub fn build_base(events: &Table) -> Table {
    let base = int_column(events.clone(), loss::EVENT);
    let base = decimal_column(base, loss::VALUE);
    let base = decimal_column(base, loss::UNITS);
    date_column(base, loss::EVENT_DATE)
}

/// Loss views over one snapshot
pub struct LossService {
    base: Arc<Table>,
    detail_row_limit: usize,
}

impl LossService {
    pub fn new(base: Arc<Table>, reports: &ReportsConfig) -> Self {
        Self {
            base,
            detail_row_limit: reports.detail_row_limit,
        }
    }

    /// Oldest and newest event dates
    pub fn menu(&self) -> LossMenu {
        let dates: Vec<NaiveDate> = self
            .base
            .column_values(loss::EVENT_DATE)
            .map(|values| values.filter_map(Value::to_date).collect())
            .unwrap_or_default();

        LossMenu {
            oldest_event: format_date(dates.iter().min().copied()),
            newest_event: format_date(dates.iter().max().copied()),
        }
    }

    /// Group totals of each preventive adjustment event, ordered by the
    /// event's sort policy
    pub fn preventive_adjustment(&self) -> PreventiveAdjustment {
        let policy = event_sort_policy();
        let events = PREVENTIVE_ADJUSTMENT_EVENTS
            .iter()
            .map(|&event| {
                let rows = apply(&self.base, &[FilterSpec::equals(loss::EVENT, event)]);
                let direction = policy.direction_for(event);
                EventBreakdown {
                    event,
                    direction,
                    report: aggregate(&rows, loss::GROUP, loss::SUBGROUP, loss::VALUE, direction),
                }
            })
            .collect();
        PreventiveAdjustment { events }
    }

    /// Items of one subgroup, cheapest first, values as plain decimals.
    ///
    /// Labels arrive path-safe (`|` for `/`) and are mapped back first.
    pub fn subgroup_detail(&self, label: &str) -> SubgroupDetail {
        let subgroup = label.replace(PATH_SAFE_SEPARATOR, "/");
        let (rows, matched_by) = lookup_category(&self.base, loss::SUBGROUP, &subgroup);
        let rows = rows
            .select(&DETAIL_COLUMNS)
            .sort_by(&[(loss::VALUE, SortDirection::Ascending)]);

        SubgroupDetail {
            subgroup,
            matched_by,
            rows: plain_column(rows, loss::VALUE),
        }
    }

    /// Group and subgroup totals over every event
    pub fn loss_by_group(&self) -> AggregateReport {
        let path_safe = self.base.as_ref().clone().map_column(loss::SUBGROUP, |v| match v {
            Value::Text(s) => Value::Text(s.replace('/', &PATH_SAFE_SEPARATOR.to_string())),
            other => other.clone(),
        });
        let direction = event_sort_policy().direction_for(0);
        aggregate(&path_safe, loss::GROUP, loss::SUBGROUP, loss::VALUE, direction)
    }

    /// Negative stock events, largest value first
    pub fn negative_stock(&self) -> LossBox {
        let rows = apply(&self.base, &[FilterSpec::equals(loss::EVENT, NEGATIVE_STOCK_EVENT)]);
        loss_box(rows.select(&DETAIL_COLUMNS), SortDirection::Descending, None)
    }

    /// Produce (HF) losses: the damage operation vs. everything else except
    /// negative stock
    pub fn produce(&self) -> ProduceLosses {
        let produce = FilterSpec::starts_with(loss::DESCRIPTION, &[PRODUCE_PREFIX]);
        let damage = FilterSpec::equals(loss::OPERATION, PRODUCE_DAMAGE_OPERATION);

        let damaged = apply(&self.base, &[produce.clone(), damage.clone()]);
        let other = apply(
            &self.base,
            &[
                produce,
                damage.negated(),
                FilterSpec::equals(loss::EVENT, NEGATIVE_STOCK_EVENT).negated(),
            ],
        );

        let damaged = loss_box(damaged.select(&DETAIL_COLUMNS), SortDirection::Ascending, None);
        let other = loss_box(other.select(&DETAIL_COLUMNS), SortDirection::Ascending, None);
        ProduceLosses {
            formatted_total: format_currency(damaged.total_value + other.total_value),
            damaged,
            other,
        }
    }

    /// Breakage and adjustment losses, overall and for `today`.
    ///
    /// Row values are rounded to cents before summing; reversal events are
    /// subtracted from both loss totals.
    pub fn total_losses(&self, today: NaiveDate) -> TotalLosses {
        let breakage = FilterSpec::equals(loss::EVENT, BREAKAGE_EVENT);
        let adjustments = FilterSpec::one_of(loss::EVENT, ADJUSTMENT_EVENTS);
        let on_today = FilterSpec::on_date(loss::EVENT_DATE, today);
        let limit = Some(self.detail_row_limit);

        let boxed = |filters: &[FilterSpec]| {
            let rows = apply(&self.base, filters).select(&TOTAL_BOX_COLUMNS);
            let rows = rows.map_column(loss::VALUE, |v| Value::Decimal(round_cents(v.to_decimal())));
            loss_box(rows, SortDirection::Ascending, limit)
        };

        let breakage_all = boxed(&[breakage.clone()]);
        let adjustments_all = boxed(&[adjustments.clone()]);
        let breakage_today = boxed(&[breakage, on_today.clone()]);
        let adjustments_today = boxed(&[adjustments, on_today.clone()]);

        let reversal = FilterSpec::equals(loss::EVENT, REVERSAL_EVENT);
        let reversed = apply(&self.base, &[reversal.clone()]).sum(loss::VALUE);
        let reversed_today = apply(&self.base, &[reversal, on_today]).sum(loss::VALUE);

        let today_value = breakage_today.total_value + adjustments_today.total_value;
        let loss_total = breakage_all.total_value + adjustments_all.total_value - reversed;

        TotalLosses {
            today_units: breakage_today.total_units + adjustments_today.total_units,
            formatted_loss_total: format_currency(loss_total),
            formatted_loss_total_today: format_currency(today_value - reversed_today),
            today_value,
            breakage: breakage_all,
            adjustments: adjustments_all,
            breakage_today,
            adjustments_today,
        }
    }

    /// Expiration losses outside produce and cold cuts
    pub fn expiration(&self) -> LossBox {
        let rows = apply(
            &self.base,
            &[
                FilterSpec::equals(loss::OPERATION, EXPIRATION_OPERATION),
                FilterSpec::starts_with(loss::DESCRIPTION, &[PRODUCE_PREFIX, COLD_CUTS_PREFIX]).negated(),
            ],
        );
        loss_box(rows.select(&DETAIL_COLUMNS), SortDirection::Ascending, None)
    }

    /// Cold cuts (RF) losses: adjustments, breakage and expiration
    pub fn cold_cuts(&self) -> ColdCutsLosses {
        let cold_cuts = FilterSpec::starts_with(loss::DESCRIPTION, &[COLD_CUTS_PREFIX]);

        let listing = |filter: FilterSpec| {
            let rows = apply(&self.base, &[cold_cuts.clone(), filter]);
            loss_box(rows.select(&DETAIL_COLUMNS), SortDirection::Ascending, None)
        };

        let adjustments = listing(FilterSpec::one_of(loss::EVENT, ADJUSTMENT_EVENTS));
        let breakage = listing(FilterSpec::equals(loss::EVENT, BREAKAGE_EVENT));
        let expiration = listing(FilterSpec::equals(loss::OPERATION, EXPIRATION_OPERATION));

        ColdCutsLosses {
            formatted_total: format_currency(
                adjustments.total_value + breakage.total_value + expiration.total_value,
            ),
            adjustments,
            breakage,
            expiration,
        }
    }
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Sort by value, total it, then format and cap the listing
fn loss_box(rows: Table, direction: SortDirection, limit: Option<usize>) -> LossBox {
    let rows = rows.sort_by(&[(loss::VALUE, direction)]);
    let total_value = rows.sum(loss::VALUE);
    let total_units = rows.sum(loss::UNITS);
    let row_count = rows.len();

    let rows = currency_column(rows, loss::VALUE);
    LossBox {
        rows: match limit {
            Some(n) => rows.truncate(n),
            None => rows,
        },
        row_count,
        total_value,
        formatted_total: format_currency(total_value),
        total_units,
    }
}
