pub mod goal_store;
pub mod transaction_ledger;

pub use goal_store::GoalStore;
pub use transaction_ledger::TransactionLedger;
