use staffpilot_domain::ID;
use staffpilot_infra::{PushMessage, StaffpilotContext};
use std::future::Future;
use tracing::{debug, error, warn};

/// The single choke point enforcing "commit only after confirmed delivery".
///
/// Resolves the recipient and their delivery token, pushes the message
/// through the gateway and, only on a confirmed send, runs `commit` to
/// stamp the dedup marker(s) of the notification unit.
///
/// Returns whether the message was delivered. `false` always means the
/// markers are untouched, so the same unit is picked up again on the next
/// pass:
/// - a missing staff record or a missing/blank token is a silent skip;
///   tokens arrive asynchronously from the mobile pairing flow and the
///   unit is retried until one exists,
/// - a gateway failure is logged and retried the same way.
pub async fn deliver_and_commit<F, Fut>(
    ctx: &StaffpilotContext,
    recipient_id: &ID,
    message: PushMessage,
    commit: F,
) -> bool
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let staff = match ctx.repos.staff.find(recipient_id).await {
        Some(staff) => staff,
        None => {
            debug!(
                "No staff record found for recipient {}, skipping delivery",
                recipient_id
            );
            return false;
        }
    };

    let token = match staff.delivery_token() {
        Some(token) => token.to_string(),
        None => {
            debug!("Staff {} has no delivery token, skipping delivery", staff.id);
            return false;
        }
    };

    if let Err(e) = ctx.gateway.send(&token, &message).await {
        warn!("Push delivery to staff {} failed: {:?}", staff.id, e);
        return false;
    }

    if let Err(e) = commit().await {
        // Delivered but not recorded: the next pass may produce one
        // duplicate for this unit. Bounded, and preferable to re-running
        // the delivery here.
        error!(
            "Failed to commit notification marker for staff {}: {:?}",
            staff.id, e
        );
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffpilot_domain::Staff;
    use staffpilot_infra::RecordingPushGateway;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn setup() -> (StaffpilotContext, Arc<RecordingPushGateway>) {
        let gateway = Arc::new(RecordingPushGateway::new());
        let ctx = StaffpilotContext::create_inmemory(gateway.clone());
        (ctx, gateway)
    }

    fn message() -> PushMessage {
        PushMessage {
            title: "Hello".into(),
            body: "World".into(),
            metadata: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn commits_only_after_confirmed_delivery() {
        let (ctx, gateway) = setup();
        let mut staff = Staff::new(Default::default(), "Jo");
        staff.device_token = Some("token-1".into());
        ctx.repos.staff.insert(&staff).await.unwrap();

        let commits = Arc::new(AtomicUsize::new(0));
        let c = commits.clone();
        let delivered = deliver_and_commit(&ctx, &staff.id, message(), || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await;

        assert!(delivered);
        assert_eq!(gateway.sent_count(), 1);
        assert_eq!(commits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gateway_failure_leaves_markers_untouched() {
        let (ctx, gateway) = setup();
        let mut staff = Staff::new(Default::default(), "Jo");
        staff.device_token = Some("token-1".into());
        ctx.repos.staff.insert(&staff).await.unwrap();
        gateway.set_failing(true);

        let commits = Arc::new(AtomicUsize::new(0));
        let c = commits.clone();
        let delivered = deliver_and_commit(&ctx, &staff.id, message(), || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await;

        assert!(!delivered);
        assert_eq!(commits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_token_skips_without_commit() {
        let (ctx, gateway) = setup();
        let staff = Staff::new(Default::default(), "Jo");
        ctx.repos.staff.insert(&staff).await.unwrap();

        let commits = Arc::new(AtomicUsize::new(0));
        let c = commits.clone();
        let delivered = deliver_and_commit(&ctx, &staff.id, message(), || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await;

        assert!(!delivered);
        assert_eq!(gateway.sent_count(), 0);
        assert_eq!(commits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_recipient_skips_without_commit() {
        let (ctx, gateway) = setup();

        let delivered =
            deliver_and_commit(&ctx, &Default::default(), message(), || async { Ok(()) }).await;

        assert!(!delivered);
        assert_eq!(gateway.sent_count(), 0);
    }
}
