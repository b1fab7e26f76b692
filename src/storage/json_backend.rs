use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use uuid::Uuid;

use crate::{
    config::{ConfigManager, Preferences},
    core::utils::{ensure_dir, write_atomic, PathResolver},
    domain::{Goal, Identifiable, Transaction},
    ledger::{GoalStore, TransactionLedger},
};

use super::{LoadReport, Result, Snapshot, StorageBackend};

/// Stores each collection as a pretty-printed JSON array under one directory.
pub struct JsonStorage {
    root: PathBuf,
    transactions_file: PathBuf,
    goals_file: PathBuf,
    config: ConfigManager,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        ensure_dir(&root)?;
        Ok(Self {
            transactions_file: PathResolver::transactions_file_in(&root),
            goals_file: PathResolver::goals_file_in(&root),
            config: ConfigManager::with_base_dir(root.clone())?,
            root,
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn transactions_path(&self) -> &Path {
        &self.transactions_file
    }

    pub fn goals_path(&self) -> &Path {
        &self.goals_file
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<LoadReport> {
        let mut warnings = Vec::new();
        let transactions = load_records(
            &self.transactions_file,
            "transaction",
            Transaction::validate,
            &mut warnings,
        );
        let goals = load_records(&self.goals_file, "goal", Goal::validate, &mut warnings);
        tracing::info!(
            transactions = transactions.len(),
            goals = goals.len(),
            dropped = warnings.len(),
            root = %self.root.display(),
            "loaded workspace"
        );
        Ok(LoadReport {
            snapshot: Snapshot {
                transactions: TransactionLedger::from_transactions(transactions),
                goals: GoalStore::from_goals(goals),
            },
            warnings,
        })
    }

    fn save_transactions(&self, ledger: &TransactionLedger) -> Result<()> {
        save_records(&self.transactions_file, ledger)
    }

    fn save_goals(&self, goals: &GoalStore) -> Result<()> {
        save_records(&self.goals_file, goals)
    }

    fn load_preferences(&self) -> Preferences {
        self.config.load()
    }

    fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        self.config.save(preferences)
    }
}

fn save_records<T: Serialize + ?Sized>(path: &Path, records: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    write_atomic(path, &json)
}

/// Reads a JSON array of records, keeping every element that parses and
/// passes `validate`. Problems are logged and collected, never returned as
/// errors: a damaged file degrades to whatever can be salvaged.
fn load_records<T, F>(path: &Path, label: &str, validate: F, warnings: &mut Vec<String>) -> Vec<T>
where
    T: DeserializeOwned + Identifiable,
    F: Fn(&T) -> std::result::Result<(), String>,
{
    if !path.exists() {
        return Vec::new();
    }
    let mut warn = |message: String| {
        tracing::warn!(path = %path.display(), "{message}");
        warnings.push(message);
    };

    let value = match fs::read_to_string(path)
        .map_err(|err| err.to_string())
        .and_then(|data| serde_json::from_str::<Value>(&data).map_err(|err| err.to_string()))
    {
        Ok(value) => value,
        Err(err) => {
            warn(format!("could not read {label} file: {err}"));
            return Vec::new();
        }
    };
    let Value::Array(items) = value else {
        warn(format!("{label} file does not contain a JSON array"));
        return Vec::new();
    };

    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let record: T = match serde_json::from_value(item) {
            Ok(record) => record,
            Err(err) => {
                warn(format!("skipped {label} #{index}: {err}"));
                continue;
            }
        };
        if let Err(reason) = validate(&record) {
            warn(format!("skipped {label} #{index}: {reason}"));
            continue;
        }
        if !seen.insert(record.id()) {
            warn(format!("skipped {label} #{index}: duplicate id {}", record.id()));
            continue;
        }
        records.push(record);
    }
    records
}
