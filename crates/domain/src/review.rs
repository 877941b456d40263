use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A single employee's performance review within a `ReviewCycle`.
#[derive(Debug, Clone)]
pub struct PerformanceReview {
    pub id: ID,
    pub business_id: ID,
    pub cycle_id: ID,
    pub employee_id: ID,
    pub manager_id: ID,
    pub status: ReviewStatus,
    /// Threshold-set marker: which day-offsets of the self-review deadline
    /// have already triggered a reminder for this review.
    pub self_reminders_sent: Vec<i64>,
    /// Threshold-set marker for the manager-review deadline. Stamped onto
    /// every review of a manager's batch, so the summarized count stays
    /// correct across partially notified batches.
    pub manager_reminders_sent: Vec<i64>,
    /// Last-notified-value marker: the status the employee was last told
    /// about. A new notification fires only when `status` differs.
    pub last_notified_status: Option<ReviewStatus>,
}

impl PerformanceReview {
    pub fn new(business_id: ID, cycle_id: ID, employee_id: ID, manager_id: ID) -> Self {
        Self {
            id: Default::default(),
            business_id,
            cycle_id,
            employee_id,
            manager_id,
            status: ReviewStatus::Draft,
            self_reminders_sent: Vec::new(),
            manager_reminders_sent: Vec::new(),
            last_notified_status: None,
        }
    }

    /// Whether the employee is still owed a notification for the current
    /// workflow status. Draft is the initial state and is never announced.
    pub fn status_unnotified(&self) -> bool {
        self.status != ReviewStatus::Draft && self.last_notified_status != Some(self.status)
    }

    /// Reviews that still await the employee's own input.
    pub fn awaits_self_review(&self) -> bool {
        matches!(
            self.status,
            ReviewStatus::Draft | ReviewStatus::SelfReviewPending
        )
    }

    /// Reviews that sit with the manager.
    pub fn awaits_manager_review(&self) -> bool {
        matches!(
            self.status,
            ReviewStatus::SelfReviewSubmitted | ReviewStatus::ManagerReviewPending
        )
    }

    /// Reviews that sit with HR.
    pub fn awaits_hr_review(&self) -> bool {
        matches!(
            self.status,
            ReviewStatus::ManagerReviewSubmitted | ReviewStatus::HrReviewPending
        )
    }
}

impl Entity<ID> for PerformanceReview {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

/// The ordered review workflow. `Cancelled` can be entered from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Draft,
    SelfReviewPending,
    SelfReviewSubmitted,
    ManagerReviewPending,
    ManagerReviewSubmitted,
    HrReviewPending,
    HrReviewSubmitted,
    Completed,
    Cancelled,
}

impl ReviewStatus {
    /// Human readable label used in status-change notifications.
    pub fn label(&self) -> &'static str {
        match self {
            ReviewStatus::Draft => "Draft",
            ReviewStatus::SelfReviewPending => "Self review pending",
            ReviewStatus::SelfReviewSubmitted => "Self review submitted",
            ReviewStatus::ManagerReviewPending => "Manager review pending",
            ReviewStatus::ManagerReviewSubmitted => "Manager review submitted",
            ReviewStatus::HrReviewPending => "HR review pending",
            ReviewStatus::HrReviewSubmitted => "HR review submitted",
            ReviewStatus::Completed => "Completed",
            ReviewStatus::Cancelled => "Cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_reviews_are_never_status_notifiable() {
        let review = PerformanceReview::new(
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
        );
        assert!(!review.status_unnotified());
    }

    #[test]
    fn status_is_notifiable_until_last_notified_catches_up() {
        let mut review = PerformanceReview::new(
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
        );
        review.status = ReviewStatus::SelfReviewPending;
        assert!(review.status_unnotified());

        review.last_notified_status = Some(ReviewStatus::SelfReviewPending);
        assert!(!review.status_unnotified());

        // Advancing the workflow makes it notifiable again
        review.status = ReviewStatus::SelfReviewSubmitted;
        assert!(review.status_unnotified());
    }

    #[test]
    fn status_round_trips_through_serde() {
        let v = serde_json::to_string(&ReviewStatus::ManagerReviewPending).unwrap();
        assert_eq!(v, "\"manager_review_pending\"");
        let s: ReviewStatus = serde_json::from_str(&v).unwrap();
        assert_eq!(s, ReviewStatus::ManagerReviewPending);
    }
}
