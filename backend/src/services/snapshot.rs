//! Report base tables and their reloadable store
//!
//! Raw snapshots are read once and turned into immutable per-report base
//! tables. A reload builds a complete new set and swaps it in; requests already
//! holding the previous set keep using it.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use shared::Table;

use crate::config::DataConfig;
use crate::loader::SnapshotReader;
use crate::services::{expiry, isv, loss, stockout};

/// The four upstream exports, as read
#[derive(Debug, Clone, Default)]
pub struct RawSnapshots {
    pub supplier: Table,
    pub stock_ledger: Table,
    pub loss_events: Table,
    pub expiry: Table,
}

impl RawSnapshots {
    /// Read every configured snapshot; unreadable files come back empty
    pub fn load(data: &DataConfig) -> Self {
        let reader = SnapshotReader::from_config(data);
        Self {
            supplier: reader.read_path(&data.supplier_path),
            stock_ledger: reader.read_path(&data.stock_ledger_path),
            loss_events: reader.read_path(&data.loss_events_path),
            expiry: reader.read_path(&data.expiry_path),
        }
    }
}

/// Per-report base tables built from one set of raw snapshots
#[derive(Debug)]
pub struct Snapshots {
    pub isv: Arc<Table>,
    pub stockout: Arc<Table>,
    pub losses: Arc<Table>,
    pub expiry: Arc<Table>,
    pub loaded_at: DateTime<Utc>,
}

impl Snapshots {
    pub fn build(raw: &RawSnapshots) -> Self {
        let snapshots = Self {
            isv: Arc::new(isv::build_base(&raw.supplier, &raw.stock_ledger)),
            stockout: Arc::new(stockout::build_base(&raw.stock_ledger)),
            losses: Arc::new(loss::build_base(&raw.loss_events)),
            expiry: Arc::new(expiry::build_base(&raw.expiry, &raw.supplier)),
            loaded_at: Utc::now(),
        };
        tracing::info!(
            isv = snapshots.isv.len(),
            stockout = snapshots.stockout.len(),
            losses = snapshots.losses.len(),
            expiry = snapshots.expiry.len(),
            "report bases built"
        );
        snapshots
    }

    pub fn load(data: &DataConfig) -> Self {
        Self::build(&RawSnapshots::load(data))
    }
}

/// Shared handle to the current [`Snapshots`]
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    current: Arc<RwLock<Arc<Snapshots>>>,
}

impl SnapshotStore {
    pub fn new(snapshots: Snapshots) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshots))),
        }
    }

    pub fn current(&self) -> Arc<Snapshots> {
        // The guarded value is a plain Arc swap, so a poisoned lock still holds
        // a complete snapshot set
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, snapshots: Snapshots) {
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(snapshots);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Value;

    fn raw() -> RawSnapshots {
        RawSnapshots {
            supplier: Table::from_rows(
                ["Item Produto", "Fornecedor Atual", "Unnamed: 2"],
                vec![vec!["12345".into(), "111".into(), "ACME".into()]],
            ),
            stock_ledger: Table::from_rows(
                ["MERC", "DESCRICAO", "NAO VENDE (RUPT.)"],
                vec![vec!["0012345".into(), "ARROZ".into(), Value::from_raw("3")]],
            ),
            ..RawSnapshots::default()
        }
    }

    #[test]
    fn test_build_from_partial_snapshots() {
        let snapshots = Snapshots::build(&raw());
        assert_eq!(snapshots.isv.len(), 1);
        assert_eq!(snapshots.stockout.len(), 1);
        assert!(snapshots.losses.is_empty());
        assert!(snapshots.expiry.is_empty());
    }

    #[test]
    fn test_replace_swaps_for_new_readers_only() {
        let store = SnapshotStore::new(Snapshots::build(&RawSnapshots::default()));
        let before = store.current();

        store.replace(Snapshots::build(&raw()));

        assert!(before.isv.is_empty());
        assert_eq!(store.current().isv.len(), 1);
    }
}
