use crate::guard::deliver_and_commit;
use crate::shared::usecase::UseCase;
use staffpilot_domain::PerformanceReview;
use staffpilot_infra::{PushMessage, StaffpilotContext};
use thiserror::Error;
use tracing::error;

/// Tells the employee where their review stands now. The last-notified
/// marker only ever advances to the *current* status: if delivery kept
/// failing while the review moved through several statuses, the employee
/// gets a single notification for the latest one, not a replay of the
/// intermediate transitions.
#[derive(Debug)]
pub struct NotifyReviewStatusChangesUseCase;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Unable to query pending review status notifications")]
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for NotifyReviewStatusChangesUseCase {
    /// Number of delivered notifications
    type Response = usize;
    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &StaffpilotContext) -> Result<Self::Response, Self::Errors> {
        let pending = ctx
            .repos
            .reviews
            .find_status_unnotified()
            .await
            .map_err(|e| {
                error!("Unable to query review status changes: {:?}", e);
                UseCaseError::StorageError
            })?;

        let mut delivered = 0;
        for review in pending {
            let message = status_message(&review);
            let status = review.status;
            let sent = deliver_and_commit(ctx, &review.employee_id, message, || async {
                ctx.repos
                    .reviews
                    .set_last_notified_status(&review.id, status)
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

fn status_message(review: &PerformanceReview) -> PushMessage {
    PushMessage {
        title: "Performance review update".into(),
        body: format!("Your performance review moved to: {}.", review.status.label()),
        metadata: serde_json::json!({
            "event": "review_status_change",
            "review_id": review.id.as_string(),
            "status": review.status.label(),
        }),
    }
}
