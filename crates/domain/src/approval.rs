use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// The six approval-style domains are structurally identical: a request
/// reaches a terminal decision and the employee should be told about it
/// exactly once. One parameterized record type covers all of them, each
/// kind living in its own collection.
#[derive(Debug, Clone)]
pub struct ApprovalRequest {
    pub id: ID,
    pub business_id: ID,
    pub employee_id: ID,
    pub kind: ApprovalKind,
    pub status: ApprovalStatus,
    /// When the approver made the decision, in millis. Unset while pending.
    pub decided_at: Option<i64>,
    /// Dedup marker: when the "approved" notification was delivered.
    /// Set exactly once, never cleared.
    pub approved_notified_at: Option<i64>,
    /// Dedup marker: when the "rejected" notification was delivered.
    pub rejected_notified_at: Option<i64>,
}

impl ApprovalRequest {
    pub fn new(business_id: ID, employee_id: ID, kind: ApprovalKind) -> Self {
        Self {
            id: Default::default(),
            business_id,
            employee_id,
            kind,
            status: ApprovalStatus::Pending,
            decided_at: None,
            approved_notified_at: None,
            rejected_notified_at: None,
        }
    }

    /// The decision outcome, if the request has reached one.
    pub fn outcome(&self) -> Option<ApprovalOutcome> {
        match self.status {
            ApprovalStatus::Approved => Some(ApprovalOutcome::Approved),
            ApprovalStatus::Rejected => Some(ApprovalOutcome::Rejected),
            ApprovalStatus::Pending => None,
        }
    }

    /// Whether the notification for the current outcome is still owed.
    pub fn outcome_unnotified(&self) -> bool {
        match self.outcome() {
            Some(ApprovalOutcome::Approved) => {
                self.decided_at.is_some() && self.approved_notified_at.is_none()
            }
            Some(ApprovalOutcome::Rejected) => {
                self.decided_at.is_some() && self.rejected_notified_at.is_none()
            }
            None => false,
        }
    }
}

impl Entity<ID> for ApprovalRequest {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalKind {
    Leave,
    Expense,
    Reimbursement,
    Payslip,
    Loan,
    Attendance,
}

impl ApprovalKind {
    pub const ALL: [ApprovalKind; 6] = [
        ApprovalKind::Leave,
        ApprovalKind::Expense,
        ApprovalKind::Reimbursement,
        ApprovalKind::Payslip,
        ApprovalKind::Loan,
        ApprovalKind::Attendance,
    ];

    /// Human readable label used in notification messages.
    pub fn label(&self) -> &'static str {
        match self {
            ApprovalKind::Leave => "leave request",
            ApprovalKind::Expense => "expense claim",
            ApprovalKind::Reimbursement => "reimbursement claim",
            ApprovalKind::Payslip => "payslip",
            ApprovalKind::Loan => "loan request",
            ApprovalKind::Attendance => "attendance regularization request",
        }
    }
}

impl std::fmt::Display for ApprovalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ApprovalKind::Leave => "leave",
            ApprovalKind::Expense => "expense",
            ApprovalKind::Reimbursement => "reimbursement",
            ApprovalKind::Payslip => "payslip",
            ApprovalKind::Loan => "loan",
            ApprovalKind::Attendance => "attendance",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    Approved,
    Rejected,
}

impl ApprovalOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ApprovalOutcome::Approved => "approved",
            ApprovalOutcome::Rejected => "rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decided(status: ApprovalStatus) -> ApprovalRequest {
        let mut req = ApprovalRequest::new(Default::default(), Default::default(), ApprovalKind::Leave);
        req.status = status;
        req.decided_at = Some(1000);
        req
    }

    #[test]
    fn pending_request_is_never_notifiable() {
        let mut req = decided(ApprovalStatus::Pending);
        req.decided_at = None;
        assert!(!req.outcome_unnotified());
    }

    #[test]
    fn decided_request_is_notifiable_until_marked() {
        let mut req = decided(ApprovalStatus::Approved);
        assert!(req.outcome_unnotified());
        req.approved_notified_at = Some(2000);
        assert!(!req.outcome_unnotified());

        let mut req = decided(ApprovalStatus::Rejected);
        assert!(req.outcome_unnotified());
        // The marker of the other outcome does not count
        req.approved_notified_at = Some(2000);
        assert!(req.outcome_unnotified());
        req.rejected_notified_at = Some(2000);
        assert!(!req.outcome_unnotified());
    }
}
