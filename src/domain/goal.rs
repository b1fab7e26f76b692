//! Savings and spending targets tracked against a deadline.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{
    deserialize_date, deserialize_id, deserialize_timestamp, start_of_day, Identifiable,
    ParseVariantError,
};
use crate::domain::mode::OperatingMode;

pub const DEFAULT_GOAL_CATEGORY: &str = "General";

/// Intent behind a goal. Used for labels and advice only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    Save,
    Debt,
    Emergency,
    Buy,
    WasteReduction,
    ProfitIncrease,
}

impl GoalKind {
    pub const ALL: [GoalKind; 6] = [
        GoalKind::Save,
        GoalKind::Debt,
        GoalKind::Emergency,
        GoalKind::Buy,
        GoalKind::WasteReduction,
        GoalKind::ProfitIncrease,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GoalKind::Save => "save",
            GoalKind::Debt => "debt",
            GoalKind::Emergency => "emergency",
            GoalKind::Buy => "buy",
            GoalKind::WasteReduction => "waste_reduction",
            GoalKind::ProfitIncrease => "profit_increase",
        }
    }

    /// Human wording for the intent, phrased for the given mode.
    pub fn describe(self, mode: OperatingMode) -> &'static str {
        match (self, mode) {
            (GoalKind::Save, _) => "Save Money",
            (GoalKind::Debt, OperatingMode::Personal) => "Pay Off Debt",
            (GoalKind::Debt, OperatingMode::Business) => "Clear Business Debt",
            (GoalKind::Emergency, OperatingMode::Personal) => "Build Emergency Fund",
            (GoalKind::Emergency, OperatingMode::Business) => "Build Cash Reserves",
            (GoalKind::Buy, OperatingMode::Personal) => "Buy Something",
            (GoalKind::Buy, OperatingMode::Business) => "Acquire Asset / Equipment",
            (GoalKind::WasteReduction, OperatingMode::Personal) => "Reduce Wasteful Spending",
            (GoalKind::WasteReduction, OperatingMode::Business) => "Reduce Operating Costs",
            (GoalKind::ProfitIncrease, _) => "Increase Monthly Profit",
        }
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalKind {
    type Err = ParseVariantError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        GoalKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseVariantError::new("goal type", value))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl GoalPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            GoalPriority::Low => "low",
            GoalPriority::Medium => "medium",
            GoalPriority::High => "high",
        }
    }
}

impl fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalPriority {
    type Err = ParseVariantError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(GoalPriority::Low),
            "medium" | "med" => Ok(GoalPriority::Medium),
            "high" => Ok(GoalPriority::High),
            _ => Err(ParseVariantError::new("priority", value)),
        }
    }
}

/// A user-defined target amount to reach by a deadline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Uuid,
    #[serde(default)]
    pub mode: OperatingMode,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub title: String,
    pub target_amount: f64,
    #[serde(deserialize_with = "deserialize_date")]
    pub deadline: NaiveDate,
    #[serde(default)]
    pub priority: GoalPriority,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

fn default_category() -> String {
    DEFAULT_GOAL_CATEGORY.to_string()
}

impl Goal {
    pub fn new(
        mode: OperatingMode,
        kind: GoalKind,
        title: impl Into<String>,
        target_amount: f64,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            kind,
            title: title.into(),
            target_amount,
            deadline,
            priority: GoalPriority::default(),
            category: default_category(),
            created_at: Utc::now(),
        }
    }

    pub fn with_priority(mut self, priority: GoalPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// The instant the deadline begins, midnight UTC.
    pub fn deadline_start(&self) -> DateTime<Utc> {
        start_of_day(self.deadline)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err(format!("goal {} has an empty title", self.id));
        }
        if !self.target_amount.is_finite() || self.target_amount <= 0.0 {
            return Err(format!(
                "goal `{}` needs a positive target amount, got {}",
                self.title, self.target_amount
            ));
        }
        Ok(())
    }
}

impl Identifiable for Goal {
    fn id(&self) -> Uuid {
        self.id
    }
}
