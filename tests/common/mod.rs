#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;
use shandu_core::{core::FinanceWorkspace, domain::Transaction, storage::JsonStorage};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a JSON storage rooted in a fresh directory kept alive for the run.
pub fn temp_storage() -> JsonStorage {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    JsonStorage::new(Some(base)).expect("create json storage backend")
}

pub fn temp_workspace() -> FinanceWorkspace {
    FinanceWorkspace::open(Box::new(temp_storage()))
}

pub fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(offset)
}

/// 6000 income on day 0 and 3000 expenses on day 60.
pub fn sixty_day_history() -> Vec<Transaction> {
    vec![
        Transaction::income(6000.0, "Salary", day(0)),
        Transaction::expense(3000.0, "Rent", day(60)),
    ]
}
