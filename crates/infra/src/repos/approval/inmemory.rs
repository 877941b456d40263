use super::IApprovalRepo;
use crate::repos::shared::inmemory_repo::*;
use staffpilot_domain::{ApprovalKind, ApprovalOutcome, ApprovalRequest, Entity, ID};

pub struct InMemoryApprovalRepo {
    requests: std::sync::Mutex<Vec<ApprovalRequest>>,
}

impl InMemoryApprovalRepo {
    pub fn new() -> Self {
        Self {
            requests: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IApprovalRepo for InMemoryApprovalRepo {
    async fn insert(&self, request: &ApprovalRequest) -> anyhow::Result<()> {
        insert(request, &self.requests);
        Ok(())
    }

    async fn find(&self, kind: ApprovalKind, request_id: &ID) -> Option<ApprovalRequest> {
        find_by(&self.requests, |r| r.kind == kind && r.id() == *request_id)
            .into_iter()
            .next()
    }

    async fn find_unnotified(&self, kind: ApprovalKind) -> anyhow::Result<Vec<ApprovalRequest>> {
        Ok(find_by(&self.requests, |r| {
            r.kind == kind && r.outcome_unnotified()
        }))
    }

    async fn mark_notified(
        &self,
        kind: ApprovalKind,
        request_ids: &[ID],
        outcome: ApprovalOutcome,
        timestamp: i64,
    ) -> anyhow::Result<()> {
        update_many(
            &self.requests,
            |r| r.kind == kind && request_ids.contains(&r.id),
            |r| match outcome {
                ApprovalOutcome::Approved => r.approved_notified_at = Some(timestamp),
                ApprovalOutcome::Rejected => r.rejected_notified_at = Some(timestamp),
            },
        );
        Ok(())
    }
}
