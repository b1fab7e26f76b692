pub mod common;
pub mod goal;
pub mod mode;
pub mod transaction;

pub use common::{Identifiable, ParseVariantError};
pub use goal::{Goal, GoalKind, GoalPriority};
pub use mode::OperatingMode;
pub use transaction::{Transaction, TransactionKind};
