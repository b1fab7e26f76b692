use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Goal, OperatingMode};
use crate::ledger::{GoalStore, TransactionLedger};

use super::{
    resolve_id, FeasibilityReport, FeasibilityService, ProjectionService, ServiceError,
    ServiceResult,
};

/// A visible goal paired with its current verdict.
#[derive(Debug, Clone)]
pub struct GoalStatus<'a> {
    pub goal: &'a Goal,
    pub report: FeasibilityReport,
}

pub struct GoalService;

impl GoalService {
    pub fn add(store: &mut GoalStore, goal: Goal) -> ServiceResult<Uuid> {
        goal.validate().map_err(ServiceError::Invalid)?;
        let id = store.add(goal);
        tracing::debug!(%id, "goal created");
        Ok(id)
    }

    pub fn remove(store: &mut GoalStore, id: Uuid) -> ServiceResult<Goal> {
        store
            .remove(id)
            .ok_or_else(|| ServiceError::Invalid("Goal not found".into()))
    }

    pub fn resolve(store: &GoalStore, needle: &str) -> ServiceResult<Uuid> {
        resolve_id(store.iter(), needle, "goal")
    }

    /// Goals for `mode` evaluated against a fresh projection of the ledger.
    pub fn overview<'a>(
        store: &'a GoalStore,
        ledger: &TransactionLedger,
        mode: OperatingMode,
        now: DateTime<Utc>,
    ) -> Vec<GoalStatus<'a>> {
        let projection = ProjectionService::project(ledger.as_slice());
        store
            .for_mode(mode)
            .map(|goal| GoalStatus {
                goal,
                report: FeasibilityService::evaluate(goal, &projection, now),
            })
            .collect()
    }
}
