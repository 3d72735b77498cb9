use std::sync::{Arc, PoisonError, RwLock};

use super::RiskDataset;

/// Holder for the current dataset snapshot.
///
/// Readers clone the `Arc` and keep scoring against it even if a refresh lands
/// mid-computation; `replace` swaps the reference and never touches the tables
/// a reader holds.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<RiskDataset>>,
}

impl SnapshotStore {
    pub fn new(dataset: RiskDataset) -> Self {
        Self {
            current: RwLock::new(Arc::new(dataset)),
        }
    }

    pub fn current(&self) -> Arc<RiskDataset> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs a new snapshot and returns the one it replaced.
    pub fn replace(&self, dataset: RiskDataset) -> Arc<RiskDataset> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(dataset))
    }
}
