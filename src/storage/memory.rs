use std::sync::{Mutex, MutexGuard};

use crate::{
    config::Preferences,
    errors::LedgerError,
    ledger::{GoalStore, TransactionLedger},
};

use super::{LoadReport, Result, Snapshot, StorageBackend};

/// Volatile backend for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<(Snapshot, Preferences)>,
    saves: Mutex<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: Mutex::new((snapshot, Preferences::default())),
            saves: Mutex::new(0),
        }
    }

    /// Copy of the data as last persisted.
    pub fn persisted(&self) -> Result<Snapshot> {
        Ok(self.lock_state()?.0.clone())
    }

    /// Number of collection writes performed so far.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|count| *count).unwrap_or(0)
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, (Snapshot, Preferences)>> {
        self.state
            .lock()
            .map_err(|_| LedgerError::InvalidRef("memory storage lock poisoned".into()))
    }

    fn record_save(&self) {
        if let Ok(mut count) = self.saves.lock() {
            *count += 1;
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> Result<LoadReport> {
        Ok(LoadReport {
            snapshot: self.lock_state()?.0.clone(),
            warnings: Vec::new(),
        })
    }

    fn save_transactions(&self, ledger: &TransactionLedger) -> Result<()> {
        self.lock_state()?.0.transactions = ledger.clone();
        self.record_save();
        Ok(())
    }

    fn save_goals(&self, goals: &GoalStore) -> Result<()> {
        self.lock_state()?.0.goals = goals.clone();
        self.record_save();
        Ok(())
    }

    fn load_preferences(&self) -> Preferences {
        self.lock_state()
            .map(|state| state.1.clone())
            .unwrap_or_default()
    }

    fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        self.lock_state()?.1 = preferences.clone();
        Ok(())
    }
}
