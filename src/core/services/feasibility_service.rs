//! Compares a goal's required savings velocity with the projected surplus.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Goal;

use super::projection_service::{RateProjection, DAYS_PER_MONTH};

/// Floor applied to the time remaining so due or overdue goals still produce a
/// finite monthly requirement.
pub const MIN_MONTHS_LEFT: f64 = 0.5;
const MILLIS_PER_MONTH: f64 = DAYS_PER_MONTH * 86_400_000.0;

/// Verdict for one goal against the current projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityReport {
    pub months_left: f64,
    pub required_per_month: f64,
    pub monthly_surplus: f64,
    pub is_achievable: bool,
    /// Positive when the surplus falls short of the requirement.
    pub gap: f64,
}

impl FeasibilityReport {
    pub fn verdict_label(&self) -> &'static str {
        if self.is_achievable {
            "Forecast: Achievable"
        } else {
            "Forecast: Unlikely"
        }
    }
}

pub struct FeasibilityService;

impl FeasibilityService {
    /// Evaluates `goal` as of `now`. Deadlines in the past are not rejected;
    /// they are clamped to the minimum horizon and report a shortfall.
    pub fn evaluate(
        goal: &Goal,
        projection: &RateProjection,
        now: DateTime<Utc>,
    ) -> FeasibilityReport {
        let remaining = (goal.deadline_start() - now).num_milliseconds() as f64;
        let months_left = (remaining / MILLIS_PER_MONTH).max(MIN_MONTHS_LEFT);
        let required_per_month = goal.target_amount / months_left;
        let monthly_surplus = projection.monthly_surplus;
        FeasibilityReport {
            months_left,
            required_per_month,
            monthly_surplus,
            is_achievable: monthly_surplus >= required_per_month,
            gap: required_per_month - monthly_surplus,
        }
    }
}
