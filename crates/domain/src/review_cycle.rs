use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A time-boxed performance-review period with role-specific deadlines.
/// All deadline fields are millis timestamps; the reminder calculator
/// normalizes them to local calendar days.
#[derive(Debug, Clone)]
pub struct ReviewCycle {
    pub id: ID,
    pub business_id: ID,
    pub name: String,
    pub status: CycleStatus,
    pub self_review_deadline: i64,
    pub manager_review_deadline: i64,
    pub hr_review_deadline: i64,
    pub end_at: i64,
    /// Threshold-set marker for the business-wide HR reminder. Lives on the
    /// cycle because the HR reminder aggregates over all of its reviews.
    pub hr_reminders_sent: Vec<i64>,
}

impl ReviewCycle {
    /// Whether the reminder calculator should consider this cycle at all.
    pub fn is_active(&self, now: i64) -> bool {
        self.status == CycleStatus::Active && self.end_at >= now
    }
}

impl Entity<ID> for ReviewCycle {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    Active,
    Completed,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(status: CycleStatus, end_at: i64) -> ReviewCycle {
        ReviewCycle {
            id: Default::default(),
            business_id: Default::default(),
            name: "Q1-2025".into(),
            status,
            self_review_deadline: 0,
            manager_review_deadline: 0,
            hr_review_deadline: 0,
            end_at,
            hr_reminders_sent: Vec::new(),
        }
    }

    #[test]
    fn only_running_cycles_are_active() {
        assert!(cycle(CycleStatus::Active, 100).is_active(50));
        assert!(!cycle(CycleStatus::Active, 100).is_active(101));
        assert!(!cycle(CycleStatus::Completed, 100).is_active(50));
        assert!(!cycle(CycleStatus::Cancelled, 100).is_active(50));
    }
}
