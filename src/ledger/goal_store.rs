use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Goal, OperatingMode};

/// Collection of goals across both operating modes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct GoalStore {
    goals: Vec<Goal>,
}

impl GoalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_goals(goals: Vec<Goal>) -> Self {
        Self { goals }
    }

    pub fn add(&mut self, goal: Goal) -> Uuid {
        let id = goal.id;
        self.goals.push(goal);
        id
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Goal> {
        let index = self.goals.iter().position(|goal| goal.id == id)?;
        Some(self.goals.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    /// Goals visible under `mode`, in creation order.
    pub fn for_mode(&self, mode: OperatingMode) -> impl Iterator<Item = &Goal> {
        self.goals.iter().filter(move |goal| goal.mode == mode)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter()
    }

    pub fn as_slice(&self) -> &[Goal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GoalKind;
    use chrono::NaiveDate;

    #[test]
    fn business_goals_are_hidden_in_personal_mode() {
        let deadline = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
        let mut store = GoalStore::new();
        store.add(Goal::new(
            OperatingMode::Business,
            GoalKind::ProfitIncrease,
            "Grow margin",
            5000.0,
            deadline,
        ));
        let personal = store.add(Goal::new(
            OperatingMode::Personal,
            GoalKind::Save,
            "Holiday",
            800.0,
            deadline,
        ));

        let visible: Vec<_> = store.for_mode(OperatingMode::Personal).map(|g| g.id).collect();
        assert_eq!(visible, vec![personal]);
        assert_eq!(store.for_mode(OperatingMode::Business).count(), 1);
    }
}
