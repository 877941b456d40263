use crate::guard::deliver_and_commit;
use crate::shared::usecase::UseCase;
use staffpilot_domain::{ApprovalKind, ApprovalOutcome};
use staffpilot_infra::{PushMessage, StaffpilotContext};
use thiserror::Error;
use tracing::error;

/// One parameterized notifier covers the six approval-style domains:
/// fetch decided-but-unnotified requests for the kind, deliver to the
/// employee and stamp the single-flag marker of the decision outcome.
#[derive(Debug)]
pub struct NotifyApprovalsUseCase {
    pub kind: ApprovalKind,
}

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Unable to query pending approval notifications")]
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for NotifyApprovalsUseCase {
    /// Number of delivered notifications
    type Response = usize;
    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &StaffpilotContext) -> Result<Self::Response, Self::Errors> {
        let kind = self.kind;
        let pending = ctx
            .repos
            .approvals
            .find_unnotified(kind)
            .await
            .map_err(|e| {
                error!("Unable to query {} approvals: {:?}", kind, e);
                UseCaseError::StorageError
            })?;

        let mut delivered = 0;
        for request in pending {
            let outcome = match request.outcome() {
                Some(outcome) => outcome,
                None => continue,
            };

            let message = approval_message(kind, outcome, &request.id.as_string());
            let request_ids = vec![request.id.clone()];
            let sent = deliver_and_commit(ctx, &request.employee_id, message, || async {
                ctx.repos
                    .approvals
                    .mark_notified(kind, &request_ids, outcome, ctx.sys.get_timestamp_millis())
                    .await
            })
            .await;

            if sent {
                delivered += 1;
            }
        }

        Ok(delivered)
    }
}

fn approval_message(kind: ApprovalKind, outcome: ApprovalOutcome, record_id: &str) -> PushMessage {
    let label = kind.label();
    let mut title = format!("{} {}", label, outcome.label());
    if let Some(first) = title.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    PushMessage {
        title,
        body: format!("Your {} has been {}.", label, outcome.label()),
        metadata: serde_json::json!({
            "event": "approval_decision",
            "kind": kind.to_string(),
            "outcome": outcome.label(),
            "record_id": record_id,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use staffpilot_domain::{ApprovalRequest, ApprovalStatus, Staff, ID};
    use staffpilot_infra::RecordingPushGateway;
    use std::sync::Arc;

    async fn setup_with_staff(token: Option<&str>) -> (StaffpilotContext, Arc<RecordingPushGateway>, ID) {
        let gateway = Arc::new(RecordingPushGateway::new());
        let ctx = StaffpilotContext::create_inmemory(gateway.clone());
        let mut staff = Staff::new(Default::default(), "Jo");
        staff.device_token = token.map(|t| t.to_string());
        ctx.repos.staff.insert(&staff).await.unwrap();
        (ctx, gateway, staff.id)
    }

    fn decided_request(employee_id: &ID, status: ApprovalStatus) -> ApprovalRequest {
        let mut request =
            ApprovalRequest::new(Default::default(), employee_id.clone(), ApprovalKind::Leave);
        request.status = status;
        request.decided_at = Some(1000);
        request
    }

    #[tokio::test]
    async fn notifies_each_decision_exactly_once() {
        let (ctx, gateway, employee_id) = setup_with_staff(Some("token-1")).await;
        let request = decided_request(&employee_id, ApprovalStatus::Approved);
        ctx.repos.approvals.insert(&request).await.unwrap();

        let delivered = execute(NotifyApprovalsUseCase { kind: ApprovalKind::Leave }, &ctx)
            .await
            .unwrap();
        assert_eq!(delivered, 1);
        assert_eq!(gateway.sent_count(), 1);
        let (_, message) = &gateway.sent()[0];
        assert_eq!(message.body, "Your leave request has been approved.");

        // A second pass with no intervening change sends nothing further
        let delivered = execute(NotifyApprovalsUseCase { kind: ApprovalKind::Leave }, &ctx)
            .await
            .unwrap();
        assert_eq!(delivered, 0);
        assert_eq!(gateway.sent_count(), 1);

        let stored = ctx
            .repos
            .approvals
            .find(ApprovalKind::Leave, &request.id)
            .await
            .unwrap();
        assert!(stored.approved_notified_at.is_some());
        assert!(stored.rejected_notified_at.is_none());
    }

    #[tokio::test]
    async fn rejected_decisions_use_their_own_marker() {
        let (ctx, gateway, employee_id) = setup_with_staff(Some("token-1")).await;
        let request = decided_request(&employee_id, ApprovalStatus::Rejected);
        ctx.repos.approvals.insert(&request).await.unwrap();

        execute(NotifyApprovalsUseCase { kind: ApprovalKind::Leave }, &ctx)
            .await
            .unwrap();
        assert_eq!(gateway.sent_count(), 1);
        assert_eq!(
            gateway.sent()[0].1.body,
            "Your leave request has been rejected."
        );

        let stored = ctx
            .repos
            .approvals
            .find(ApprovalKind::Leave, &request.id)
            .await
            .unwrap();
        assert!(stored.rejected_notified_at.is_some());
        assert!(stored.approved_notified_at.is_none());
    }

    #[tokio::test]
    async fn kinds_do_not_leak_into_each_other() {
        let (ctx, gateway, employee_id) = setup_with_staff(Some("token-1")).await;
        let mut request = decided_request(&employee_id, ApprovalStatus::Approved);
        request.kind = ApprovalKind::Expense;
        ctx.repos.approvals.insert(&request).await.unwrap();

        let delivered = execute(NotifyApprovalsUseCase { kind: ApprovalKind::Leave }, &ctx)
            .await
            .unwrap();
        assert_eq!(delivered, 0);
        assert_eq!(gateway.sent_count(), 0);

        let delivered = execute(
            NotifyApprovalsUseCase {
                kind: ApprovalKind::Expense,
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(delivered, 1);
        assert_eq!(
            gateway.sent()[0].1.body,
            "Your expense claim has been approved."
        );
    }

    #[tokio::test]
    async fn tokenless_employee_is_retried_until_a_token_appears() {
        let (ctx, gateway, employee_id) = setup_with_staff(None).await;
        let request = decided_request(&employee_id, ApprovalStatus::Approved);
        ctx.repos.approvals.insert(&request).await.unwrap();

        for _ in 0..3 {
            let delivered = execute(NotifyApprovalsUseCase { kind: ApprovalKind::Leave }, &ctx)
                .await
                .unwrap();
            assert_eq!(delivered, 0);
        }
        assert_eq!(gateway.sent_count(), 0);
        let stored = ctx
            .repos
            .approvals
            .find(ApprovalKind::Leave, &request.id)
            .await
            .unwrap();
        assert!(stored.approved_notified_at.is_none());

        // The mobile pairing flow registers a token out-of-band
        let mut staff = ctx.repos.staff.find(&employee_id).await.unwrap();
        staff.device_token = Some("token-1".into());
        ctx.repos.staff.save(&staff).await.unwrap();

        let delivered = execute(NotifyApprovalsUseCase { kind: ApprovalKind::Leave }, &ctx)
            .await
            .unwrap();
        assert_eq!(delivered, 1);
        assert_eq!(gateway.sent_count(), 1);
    }

    #[tokio::test]
    async fn delivery_failure_is_retried_next_pass() {
        let (ctx, gateway, employee_id) = setup_with_staff(Some("token-1")).await;
        let request = decided_request(&employee_id, ApprovalStatus::Approved);
        ctx.repos.approvals.insert(&request).await.unwrap();

        gateway.set_failing(true);
        let delivered = execute(NotifyApprovalsUseCase { kind: ApprovalKind::Leave }, &ctx)
            .await
            .unwrap();
        assert_eq!(delivered, 0);
        let stored = ctx
            .repos
            .approvals
            .find(ApprovalKind::Leave, &request.id)
            .await
            .unwrap();
        assert!(stored.approved_notified_at.is_none());

        gateway.set_failing(false);
        let delivered = execute(NotifyApprovalsUseCase { kind: ApprovalKind::Leave }, &ctx)
            .await
            .unwrap();
        assert_eq!(delivered, 1);
        assert_eq!(gateway.sent_count(), 1);
    }
}
