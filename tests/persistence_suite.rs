mod common;

use std::fs;

use chrono::NaiveDate;
use shandu_core::{
    core::FinanceWorkspace,
    domain::{Goal, GoalKind, GoalPriority, OperatingMode, Transaction},
    storage::{JsonStorage, StorageBackend},
};

use common::{day, temp_storage};

fn reopen(storage: &JsonStorage) -> FinanceWorkspace {
    let again = JsonStorage::new(Some(storage.base_dir().to_path_buf())).expect("reopen storage");
    FinanceWorkspace::open(Box::new(again))
}

#[test]
fn workspace_mutations_survive_reopen() {
    let storage = temp_storage();
    let root = storage.base_dir().to_path_buf();
    let mut workspace = FinanceWorkspace::open(Box::new(storage));

    workspace
        .add_transaction(Transaction::income(6000.0, "Salary", day(0)).with_description("Pay"))
        .unwrap();
    let rent = workspace
        .add_transaction(Transaction::expense(3000.0, "Rent", day(60)))
        .unwrap();
    workspace
        .add_goal(
            Goal::new(
                OperatingMode::Business,
                GoalKind::Debt,
                "Clear overdraft",
                4000.0,
                NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            )
            .with_priority(GoalPriority::High),
        )
        .unwrap();
    workspace.remove_transaction(rent).unwrap();
    workspace.set_mode(OperatingMode::Business).unwrap();
    workspace.set_theme("zen").unwrap();
    workspace.add_category("Side Hustle").unwrap();

    let reopened = FinanceWorkspace::open(Box::new(JsonStorage::new(Some(root)).unwrap()));
    assert_eq!(reopened.transactions().len(), 1);
    assert_eq!(reopened.goals().len(), 1);
    assert_eq!(reopened.mode(), OperatingMode::Business);
    assert_eq!(reopened.preferences().theme, "zen");
    assert!(reopened
        .preferences()
        .categories
        .iter()
        .any(|name| name == "Side Hustle"));
    assert!(reopened.load_warnings().is_empty());
}

#[test]
fn legacy_records_are_accepted() {
    let storage = temp_storage();
    fs::write(
        storage.transactions_path(),
        r#"[{"id":"1700000000000","type":"income","amount":2500,"category":"Allowance","description":"","date":"2024-02-01T08:00:00.000Z"}]"#,
    )
    .unwrap();
    fs::write(
        storage.goals_path(),
        r#"[{"id":"g1","mode":"student","type":"buy","title":"Bike","targetAmount":1800,"deadline":"2024-12-24","priority":"low","category":"Transport","createdAt":"2024-01-05T10:00:00Z"}]"#,
    )
    .unwrap();

    let report = storage.load().expect("load");
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    let goal = report.snapshot.goals.iter().next().unwrap();
    assert_eq!(goal.mode, OperatingMode::Personal);
    assert_eq!(goal.priority, GoalPriority::Low);
    assert_eq!(report.snapshot.transactions.len(), 1);

    let again = storage.load().unwrap();
    assert_eq!(
        again.snapshot.goals.iter().next().unwrap().id,
        goal.id,
        "legacy ids map to the same uuid on every load"
    );
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let storage = temp_storage();
    let mut workspace = reopen(&storage);
    workspace
        .add_transaction(Transaction::income(42.0, "Gift", day(1)))
        .unwrap();
    let path = storage.transactions_path().to_path_buf();
    let original = fs::read_to_string(&path).expect("read original file");

    // A directory at the temp path makes the staging write fail.
    let mut tmp = path.clone();
    tmp.set_extension("json.tmp");
    fs::create_dir_all(&tmp).unwrap();

    let result = workspace.add_transaction(Transaction::expense(10.0, "Food", day(2)));
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert_eq!(workspace.transactions().len(), 1);
}

#[test]
fn corrupt_preferences_fall_back_to_defaults() {
    let storage = temp_storage();
    fs::write(storage.base_dir().join("preferences.json"), "{ nope").unwrap();
    let workspace = reopen(&storage);
    assert_eq!(workspace.mode(), OperatingMode::Personal);
    assert_eq!(workspace.preferences().theme, "executive");
    assert_eq!(workspace.preferences().categories.len(), 10);
}
