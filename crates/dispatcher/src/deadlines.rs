use crate::guard::deliver_and_commit;
use crate::shared::usecase::UseCase;
use chrono::TimeZone;
use chrono_tz::Tz;
use staffpilot_domain::{PerformanceReview, ReviewCycle, StaffRole, ID};
use staffpilot_infra::{PushMessage, StaffpilotContext};
use std::collections::HashMap;
use thiserror::Error;
use tracing::error;

/// Deadline reminders for active review cycles. Unlike the other
/// collectors there is nothing to fetch directly: the pending units are
/// synthesized from calendar arithmetic against the cycle's three
/// role-specific deadlines, and the threshold sets on the reviews (self,
/// manager) and on the cycle (HR) record which day-offsets already fired.
#[derive(Debug)]
pub struct SendDeadlineRemindersUseCase;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Unable to query review cycles or reviews")]
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDeadlineRemindersUseCase {
    /// Number of delivered reminders
    type Response = usize;
    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &StaffpilotContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let cycles = ctx.repos.review_cycles.find_active(now).await.map_err(|e| {
            error!("Unable to query active review cycles: {:?}", e);
            UseCaseError::StorageError
        })?;

        let mut delivered = 0;
        for cycle in cycles {
            delivered += remind_cycle(ctx, &cycle, now).await?;
        }
        Ok(delivered)
    }
}

async fn remind_cycle(
    ctx: &StaffpilotContext,
    cycle: &ReviewCycle,
    now: i64,
) -> Result<usize, UseCaseError> {
    let tz = ctx.config.business_timezone;
    let thresholds = &ctx.config.reminder_threshold_days;

    let mut delivered = 0;
    if let Some(days) = crossed_threshold(now, cycle.self_review_deadline, tz, thresholds) {
        delivered += remind_self_reviews(ctx, cycle, days).await?;
    }
    if let Some(days) = crossed_threshold(now, cycle.manager_review_deadline, tz, thresholds) {
        delivered += remind_managers(ctx, cycle, days).await?;
    }
    if let Some(days) = crossed_threshold(now, cycle.hr_review_deadline, tz, thresholds) {
        delivered += remind_hr(ctx, cycle, days).await?;
    }
    Ok(delivered)
}

/// Whole local calendar days between now and the deadline. Both instants
/// are normalized to their local date first, so "23:59 tonight" counts as
/// due today and "00:30 tomorrow" as due tomorrow.
fn days_remaining(now: i64, deadline: i64, tz: Tz) -> Option<i64> {
    let today = tz.timestamp_millis_opt(now).single()?.date_naive();
    let due = tz.timestamp_millis_opt(deadline).single()?.date_naive();
    Some((due - today).num_days())
}

/// The day-offset to remind for, if the deadline sits on a configured
/// threshold. Passed deadlines never remind.
fn crossed_threshold(now: i64, deadline: i64, tz: Tz, thresholds: &[i64]) -> Option<i64> {
    let days = days_remaining(now, deadline, tz)?;
    if days < 0 || !thresholds.contains(&days) {
        return None;
    }
    Some(days)
}

fn due_phrase(days: i64) -> String {
    match days {
        0 => "is due today".to_string(),
        1 => "is due tomorrow".to_string(),
        n => format!("is due in {} days", n),
    }
}

fn deadline_metadata(role: &str, cycle: &ReviewCycle, days: i64) -> serde_json::Value {
    serde_json::json!({
        "event": "review_deadline",
        "role": role,
        "cycle": cycle.name,
        "day_offset": days,
    })
}

/// Employees still owing their self review get an individual reminder;
/// the threshold set lives on each review.
async fn remind_self_reviews(
    ctx: &StaffpilotContext,
    cycle: &ReviewCycle,
    days: i64,
) -> Result<usize, UseCaseError> {
    let reviews = ctx
        .repos
        .reviews
        .find_by_cycle_awaiting_self(&cycle.id)
        .await
        .map_err(|e| {
            error!("Unable to query reviews awaiting self review: {:?}", e);
            UseCaseError::StorageError
        })?;

    let mut delivered = 0;
    for review in reviews {
        if review.self_reminders_sent.contains(&days) {
            continue;
        }
        let message = PushMessage {
            title: "Self review reminder".into(),
            body: format!("Your self review for {} {}.", cycle.name, due_phrase(days)),
            metadata: deadline_metadata("self", cycle, days),
        };
        let review_ids = vec![review.id.clone()];
        let sent = deliver_and_commit(ctx, &review.employee_id, message, || async {
            ctx.repos.reviews.add_self_reminder(&review_ids, days).await
        })
        .await;
        if sent {
            delivered += 1;
        }
    }
    Ok(delivered)
}

/// A manager may have several direct reports due, so the batch is
/// summarized into one reminder carrying the count. The dedup marker
/// lives on each review: the already-sent check uses the batch's first
/// member, and a successful send stamps the offset onto every member —
/// a partially stamped batch would otherwise report a wrong count on the
/// next send.
async fn remind_managers(
    ctx: &StaffpilotContext,
    cycle: &ReviewCycle,
    days: i64,
) -> Result<usize, UseCaseError> {
    let reviews = ctx
        .repos
        .reviews
        .find_by_cycle_awaiting_manager(&cycle.id)
        .await
        .map_err(|e| {
            error!("Unable to query reviews awaiting manager review: {:?}", e);
            UseCaseError::StorageError
        })?;

    let mut batches: HashMap<ID, Vec<PerformanceReview>> = HashMap::new();
    for review in reviews {
        batches
            .entry(review.manager_id.clone())
            .or_default()
            .push(review);
    }

    let mut delivered = 0;
    for (manager_id, batch) in batches {
        if batch[0].manager_reminders_sent.contains(&days) {
            continue;
        }
        let message = PushMessage {
            title: "Manager review reminder".into(),
            body: format!(
                "You have {} review(s) awaiting your manager review for {}. The manager review {}.",
                batch.len(),
                cycle.name,
                due_phrase(days)
            ),
            metadata: deadline_metadata("manager", cycle, days),
        };
        let review_ids = batch.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
        let sent = deliver_and_commit(ctx, &manager_id, message, || async {
            ctx.repos
                .reviews
                .add_manager_reminder(&review_ids, days)
                .await
        })
        .await;
        if sent {
            delivered += 1;
        }
    }
    Ok(delivered)
}

/// Business-wide fan-out: every Hr/Admin staff member of the cycle's
/// business gets the aggregate count. The threshold set lives on the
/// cycle and is committed once at least one recipient was reached.
async fn remind_hr(
    ctx: &StaffpilotContext,
    cycle: &ReviewCycle,
    days: i64,
) -> Result<usize, UseCaseError> {
    let reviews = ctx
        .repos
        .reviews
        .find_by_cycle_awaiting_hr(&cycle.id)
        .await
        .map_err(|e| {
            error!("Unable to query reviews awaiting HR review: {:?}", e);
            UseCaseError::StorageError
        })?;

    if reviews.is_empty() || cycle.hr_reminders_sent.contains(&days) {
        return Ok(0);
    }

    let recipients = ctx
        .repos
        .staff
        .find_by_roles(&cycle.business_id, &[StaffRole::Hr, StaffRole::Admin])
        .await;

    let message = PushMessage {
        title: "HR review reminder".into(),
        body: format!(
            "{} review(s) for {} await HR review. The HR review {}.",
            reviews.len(),
            cycle.name,
            due_phrase(days)
        ),
        metadata: deadline_metadata("hr", cycle, days),
    };

    let mut delivered = 0;
    for recipient in recipients {
        let sent =
            deliver_and_commit(ctx, &recipient.id, message.clone(), || async { Ok(()) }).await;
        if sent {
            delivered += 1;
        }
    }

    if delivered > 0 {
        if let Err(e) = ctx.repos.review_cycles.add_hr_reminder(&cycle.id, days).await {
            error!(
                "Failed to commit HR reminder marker for cycle {}: {:?}",
                cycle.id, e
            );
        }
    }
    Ok(delivered)
}
