use crate::approvals::NotifyApprovalsUseCase;
use crate::attendance_assignment::NotifyAttendanceAssignmentsUseCase;
use crate::deadlines::SendDeadlineRemindersUseCase;
use crate::shared::usecase::execute;
use crate::status_change::NotifyReviewStatusChangesUseCase;
use staffpilot_domain::ApprovalKind;
use staffpilot_infra::StaffpilotContext;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::info;

/// One full dispatch pass over every event source. A failing source only
/// loses its own pass: its items stay unmarked and are retried on the
/// next tick, while the remaining sources still run.
pub async fn run_pass(ctx: &StaffpilotContext) {
    for kind in ApprovalKind::ALL {
        let _ = execute(NotifyApprovalsUseCase { kind }, ctx).await;
    }
    let _ = execute(NotifyAttendanceAssignmentsUseCase, ctx).await;
    let _ = execute(SendDeadlineRemindersUseCase, ctx).await;
    let _ = execute(NotifyReviewStatusChangesUseCase, ctx).await;
}

/// Polling loop. Passes never overlap: each tick awaits the full pass
/// before the next one is taken, and ticks missed while a slow pass runs
/// are collapsed into a single delayed one.
pub async fn run_dispatcher(ctx: StaffpilotContext) {
    let period = Duration::from_secs(ctx.config.poll_interval_secs);
    info!(
        "Dispatcher started, polling every {}s",
        ctx.config.poll_interval_secs
    );

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        run_pass(&ctx).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use staffpilot_domain::{
        ApprovalRequest, ApprovalStatus, AttendanceEntry, PerformanceReview, ReviewStatus, Staff,
        ID,
    };
    use staffpilot_infra::{IAttendanceRepo, RecordingPushGateway};
    use std::sync::Arc;

    struct UnavailableAttendanceRepo;

    #[async_trait::async_trait]
    impl IAttendanceRepo for UnavailableAttendanceRepo {
        async fn insert(&self, _entry: &AttendanceEntry) -> anyhow::Result<()> {
            anyhow::bail!("attendance store unavailable")
        }

        async fn find_unnotified_assignments(&self) -> anyhow::Result<Vec<AttendanceEntry>> {
            anyhow::bail!("attendance store unavailable")
        }

        async fn mark_assignments_notified(
            &self,
            _entry_ids: &[ID],
            _timestamp: i64,
        ) -> anyhow::Result<()> {
            anyhow::bail!("attendance store unavailable")
        }
    }

    #[tokio::test]
    async fn a_pass_covers_every_source_and_is_idempotent() {
        let gateway = Arc::new(RecordingPushGateway::new());
        let ctx = StaffpilotContext::create_inmemory(gateway.clone());
        let business_id = ID::default();

        let mut employee = Staff::new(business_id.clone(), "Sam");
        employee.device_token = Some("token-sam".into());
        ctx.repos.staff.insert(&employee).await.unwrap();

        let mut leave = ApprovalRequest::new(
            business_id.clone(),
            employee.id.clone(),
            ApprovalKind::Leave,
        );
        leave.status = ApprovalStatus::Approved;
        leave.decided_at = Some(10);
        ctx.repos.approvals.insert(&leave).await.unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 2, 21).unwrap();
        for label in ["Late arrival", "Early leave"] {
            let entry = AttendanceEntry::new(business_id.clone(), employee.id.clone(), date, label);
            ctx.repos.attendance.insert(&entry).await.unwrap();
        }

        let mut review = PerformanceReview::new(
            business_id.clone(),
            Default::default(),
            employee.id.clone(),
            Default::default(),
        );
        review.status = ReviewStatus::SelfReviewPending;
        ctx.repos.reviews.insert(&review).await.unwrap();

        // Approval outcome, one grouped attendance push, one status change
        run_pass(&ctx).await;
        assert_eq!(gateway.sent_count(), 3);

        // Everything is marked, the next pass is silent
        run_pass(&ctx).await;
        assert_eq!(gateway.sent_count(), 3);
    }

    #[tokio::test]
    async fn a_failing_source_loses_only_its_own_pass() {
        let gateway = Arc::new(RecordingPushGateway::new());
        let mut ctx = StaffpilotContext::create_inmemory(gateway.clone());
        ctx.repos.attendance = Arc::new(UnavailableAttendanceRepo);
        let business_id = ID::default();

        let mut employee = Staff::new(business_id.clone(), "Sam");
        employee.device_token = Some("token-sam".into());
        ctx.repos.staff.insert(&employee).await.unwrap();

        let mut leave = ApprovalRequest::new(
            business_id.clone(),
            employee.id.clone(),
            ApprovalKind::Leave,
        );
        leave.status = ApprovalStatus::Approved;
        leave.decided_at = Some(10);
        ctx.repos.approvals.insert(&leave).await.unwrap();

        let mut review = PerformanceReview::new(
            business_id.clone(),
            Default::default(),
            employee.id.clone(),
            Default::default(),
        );
        review.status = ReviewStatus::SelfReviewPending;
        ctx.repos.reviews.insert(&review).await.unwrap();

        // The attendance source errors, but the sources before and after
        // it still deliver within the same pass
        run_pass(&ctx).await;
        assert_eq!(gateway.sent_count(), 2);
        let bodies = gateway
            .sent()
            .iter()
            .map(|(_, m)| m.body.clone())
            .collect::<Vec<_>>();
        assert!(bodies.contains(&"Your leave request has been approved.".to_string()));
        assert!(bodies.contains(&"Your performance review moved to: Self review pending.".to_string()));
    }
}
