use crate::guard::deliver_and_commit;
use crate::shared::usecase::UseCase;
use staffpilot_domain::{AttendanceEntry, ID};
use staffpilot_infra::{PushMessage, StaffpilotContext};
use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;
use tracing::error;

/// Notifies employees about assigned attendance statuses. Several raw rows
/// can exist for the same person and day; they are collapsed into one
/// notification unit and a successful send marks every member row, so
/// re-polling cannot re-select an unmarked sibling and produce a duplicate
/// push for what the user perceives as one event.
#[derive(Debug)]
pub struct NotifyAttendanceAssignmentsUseCase;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Unable to query pending attendance assignment notifications")]
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for NotifyAttendanceAssignmentsUseCase {
    /// Number of delivered notifications (one per group)
    type Response = usize;
    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &StaffpilotContext) -> Result<Self::Response, Self::Errors> {
        let pending = ctx
            .repos
            .attendance
            .find_unnotified_assignments()
            .await
            .map_err(|e| {
                error!("Unable to query attendance assignments: {:?}", e);
                UseCaseError::StorageError
            })?;

        let mut delivered = 0;
        for (_, members) in group_by_employee_and_date(pending) {
            // The representative builds the payload; the member list is
            // what gets marked.
            let representative = &members[0];
            let message = assignment_message(representative);
            let member_ids = members.iter().map(|e| e.id.clone()).collect::<Vec<_>>();

            let sent = deliver_and_commit(ctx, &representative.employee_id, message, || async {
                ctx.repos
                    .attendance
                    .mark_assignments_notified(&member_ids, ctx.sys.get_timestamp_millis())
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

fn group_by_employee_and_date(
    entries: Vec<AttendanceEntry>,
) -> HashMap<(ID, NaiveDate), Vec<AttendanceEntry>> {
    let mut groups: HashMap<(ID, NaiveDate), Vec<AttendanceEntry>> = HashMap::new();
    for entry in entries {
        groups.entry(entry.group_key()).or_default().push(entry);
    }
    groups
}

fn assignment_message(entry: &AttendanceEntry) -> PushMessage {
    PushMessage {
        title: "Attendance updated".into(),
        body: format!(
            "Your attendance for {} was marked: {}.",
            entry.date.format("%Y-%m-%d"),
            entry.status_label
        ),
        metadata: serde_json::json!({
            "event": "attendance_assignment",
            "date": entry.date.format("%Y-%m-%d").to_string(),
            "status": entry.status_label,
        }),
    }
}
