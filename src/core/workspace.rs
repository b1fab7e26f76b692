//! Top-level coordinator that owns the ledger, goals and preferences and
//! writes each mutation through the injected storage backend.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::{theme_name, Preferences};
use crate::core::services::{
    CategoryService, FinancialSummary, GoalService, GoalStatus, ProjectionService, RateProjection,
    ServiceError, ServiceResult, SummaryService, TransactionService,
};
use crate::domain::{Goal, OperatingMode, Transaction};
use crate::ledger::{GoalStore, TransactionLedger};
use crate::storage::StorageBackend;

pub struct FinanceWorkspace {
    transactions: TransactionLedger,
    goals: GoalStore,
    preferences: Preferences,
    load_warnings: Vec<String>,
    storage: Box<dyn StorageBackend>,
}

impl FinanceWorkspace {
    /// Loads the persisted state. Unreadable data degrades to empty
    /// collections; the reasons are kept in [`Self::load_warnings`].
    pub fn open(storage: Box<dyn StorageBackend>) -> Self {
        let (snapshot, load_warnings) = match storage.load() {
            Ok(report) => (report.snapshot, report.warnings),
            Err(err) => {
                tracing::error!(error = %err, "failed to load workspace, starting empty");
                (Default::default(), vec![format!("failed to load data: {err}")])
            }
        };
        let preferences = storage.load_preferences();
        Self {
            transactions: snapshot.transactions,
            goals: snapshot.goals,
            preferences,
            load_warnings,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn transactions(&self) -> &TransactionLedger {
        &self.transactions
    }

    pub fn goals(&self) -> &GoalStore {
        &self.goals
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn mode(&self) -> OperatingMode {
        self.preferences.mode
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    /// Records a transaction. A category the user has not seen before is
    /// added to the category list as well. Once the ledger is saved the add
    /// has succeeded; failing to register the category only logs a warning.
    pub fn add_transaction(&mut self, transaction: Transaction) -> ServiceResult<Uuid> {
        let category = transaction.category.clone();
        let mut updated = self.transactions.clone();
        let id = TransactionService::add(&mut updated, transaction)?;
        self.storage.save_transactions(&updated)?;
        self.transactions = updated;
        if !category.trim().is_empty() {
            if let Err(err) = self.add_category(&category) {
                tracing::warn!(%id, category = %category, error = %err, "category not registered");
            }
        }
        tracing::info!(%id, "transaction added");
        Ok(id)
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> ServiceResult<Transaction> {
        let mut updated = self.transactions.clone();
        let removed = TransactionService::remove(&mut updated, id)?;
        self.storage.save_transactions(&updated)?;
        self.transactions = updated;
        tracing::info!(%id, "transaction removed");
        Ok(removed)
    }

    pub fn add_goal(&mut self, goal: Goal) -> ServiceResult<Uuid> {
        let mut updated = self.goals.clone();
        let id = GoalService::add(&mut updated, goal)?;
        self.storage.save_goals(&updated)?;
        self.goals = updated;
        tracing::info!(%id, "goal added");
        Ok(id)
    }

    pub fn remove_goal(&mut self, id: Uuid) -> ServiceResult<Goal> {
        let mut updated = self.goals.clone();
        let removed = GoalService::remove(&mut updated, id)?;
        self.storage.save_goals(&updated)?;
        self.goals = updated;
        tracing::info!(%id, "goal removed");
        Ok(removed)
    }

    pub fn add_category(&mut self, name: &str) -> ServiceResult<bool> {
        let mut updated = self.preferences.clone();
        if !CategoryService::add(&mut updated.categories, name)? {
            return Ok(false);
        }
        self.commit_preferences(updated)?;
        Ok(true)
    }

    pub fn set_mode(&mut self, mode: OperatingMode) -> ServiceResult<()> {
        let mut updated = self.preferences.clone();
        updated.mode = mode;
        self.commit_preferences(updated)
    }

    pub fn set_theme(&mut self, theme_id: &str) -> ServiceResult<()> {
        let theme_id = theme_id.trim().to_ascii_lowercase();
        if theme_name(&theme_id).is_none() {
            return Err(ServiceError::Invalid(format!("unknown theme `{theme_id}`")));
        }
        let mut updated = self.preferences.clone();
        updated.theme = theme_id;
        self.commit_preferences(updated)
    }

    pub fn summary(&self) -> FinancialSummary {
        SummaryService::summarize(self.transactions.as_slice())
    }

    pub fn projection(&self) -> RateProjection {
        ProjectionService::project(self.transactions.as_slice())
    }

    /// Goals of the active mode with their verdicts as of `now`.
    pub fn goal_overview(&self, now: DateTime<Utc>) -> Vec<GoalStatus<'_>> {
        GoalService::overview(&self.goals, &self.transactions, self.mode(), now)
    }

    fn commit_preferences(&mut self, updated: Preferences) -> ServiceResult<()> {
        self.storage.save_preferences(&updated)?;
        self.preferences = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GoalKind;
    use crate::errors::LedgerError;
    use crate::storage::{LoadReport, MemoryStorage, Result as StorageResult};
    use chrono::{NaiveDate, TimeZone};

    fn workspace() -> FinanceWorkspace {
        FinanceWorkspace::open(Box::new(MemoryStorage::new()))
    }

    /// Memory backend whose preference writes always fail.
    struct LockedPreferences(MemoryStorage);

    impl StorageBackend for LockedPreferences {
        fn load(&self) -> StorageResult<LoadReport> {
            self.0.load()
        }

        fn save_transactions(&self, ledger: &TransactionLedger) -> StorageResult<()> {
            self.0.save_transactions(ledger)
        }

        fn save_goals(&self, goals: &GoalStore) -> StorageResult<()> {
            self.0.save_goals(goals)
        }

        fn load_preferences(&self) -> Preferences {
            self.0.load_preferences()
        }

        fn save_preferences(&self, _preferences: &Preferences) -> StorageResult<()> {
            Err(LedgerError::InvalidRef("preferences are read-only".into()))
        }
    }

    #[test]
    fn saved_transaction_survives_category_write_failure() {
        let mut ws = FinanceWorkspace::open(Box::new(LockedPreferences(MemoryStorage::new())));
        let date = Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap();
        let id = ws
            .add_transaction(Transaction::expense(12.0, "Pets", date))
            .expect("ledger save succeeded");
        assert_eq!(ws.transactions().len(), 1);
        assert!(ws.transactions().get(id).is_some());
        let persisted = ws.storage().load().unwrap().snapshot;
        assert_eq!(persisted.transactions.len(), 1);
        assert!(!ws.preferences().categories.iter().any(|c| c == "Pets"));
    }

    #[test]
    fn new_category_from_transaction_is_registered() {
        let mut ws = workspace();
        let date = Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap();
        ws.add_transaction(Transaction::expense(12.0, "Pets", date))
            .unwrap();
        assert!(ws.preferences().categories.iter().any(|c| c == "Pets"));
        assert_eq!(ws.storage().load_preferences(), *ws.preferences());
    }

    #[test]
    fn failed_validation_leaves_state_untouched() {
        let mut ws = workspace();
        let goal = Goal::new(
            OperatingMode::Personal,
            GoalKind::Save,
            "Bad",
            -10.0,
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        );
        assert!(ws.add_goal(goal).is_err());
        assert!(ws.goals().is_empty());
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let mut ws = workspace();
        assert!(ws.set_theme("neon").is_err());
        ws.set_theme("Hustler").unwrap();
        assert_eq!(ws.preferences().theme, "hustler");
    }
}
