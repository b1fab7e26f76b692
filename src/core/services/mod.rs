pub mod category_service;
pub mod feasibility_service;
pub mod goal_service;
pub mod projection_service;
pub mod summary_service;
pub mod transaction_service;

pub use category_service::CategoryService;
pub use feasibility_service::{FeasibilityReport, FeasibilityService, MIN_MONTHS_LEFT};
pub use goal_service::{GoalService, GoalStatus};
pub use projection_service::{ProjectionService, RateProjection, DAYS_PER_MONTH};
pub use summary_service::{
    BalancePoint, BalanceStatus, CategoryTotal, FinancialSummary, SummaryService,
    BREAK_EVEN_DEADBAND,
};
pub use transaction_service::TransactionService;

use uuid::Uuid;

use crate::domain::Identifiable;
use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
}

/// Resolves a full id or an unambiguous prefix of its hyphen-less form.
pub fn resolve_id<'a, T, I>(items: I, needle: &str, label: &str) -> ServiceResult<Uuid>
where
    T: Identifiable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let needle = needle.trim().to_ascii_lowercase().replace('-', "");
    if needle.is_empty() {
        return Err(ServiceError::Invalid(format!("{label} id is required")));
    }
    let matches: Vec<Uuid> = items
        .into_iter()
        .map(|item| item.id())
        .filter(|id| id.simple().to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(ServiceError::Invalid(format!("{label} `{needle}` not found"))),
        _ => Err(ServiceError::Invalid(format!(
            "{label} id `{needle}` is ambiguous ({} matches)",
            matches.len()
        ))),
    }
}

/// First eight hex digits of an id, as shown in listings.
pub fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}
