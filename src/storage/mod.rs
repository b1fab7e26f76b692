pub mod json_backend;
pub mod memory;

use crate::{
    config::Preferences,
    errors::LedgerError,
    ledger::{GoalStore, TransactionLedger},
};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Everything the workspace keeps on disk apart from preferences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub transactions: TransactionLedger,
    pub goals: GoalStore,
}

/// Outcome of a load: the usable data plus any records that were dropped.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub snapshot: Snapshot,
    pub warnings: Vec<String>,
}

/// Abstraction over persistence backends. Each save writes one whole
/// collection as a single unit.
pub trait StorageBackend: Send + Sync {
    fn load(&self) -> Result<LoadReport>;
    fn save_transactions(&self, ledger: &TransactionLedger) -> Result<()>;
    fn save_goals(&self, goals: &GoalStore) -> Result<()>;
    /// Never fails; unreadable preferences yield defaults.
    fn load_preferences(&self) -> Preferences;
    fn save_preferences(&self, preferences: &Preferences) -> Result<()>;

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.save_transactions(&snapshot.transactions)?;
        self.save_goals(&snapshot.goals)
    }
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
