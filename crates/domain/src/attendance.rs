use crate::shared::entity::{Entity, ID};
use chrono::NaiveDate;

/// One raw attendance row with an assigned day status. Several rows can
/// exist for the same person and day (shift splits, corrections), but the
/// employee should perceive only one "your attendance for DATE was marked
/// STATUS" notification per day.
#[derive(Debug, Clone)]
pub struct AttendanceEntry {
    pub id: ID,
    pub business_id: ID,
    pub employee_id: ID,
    pub date: NaiveDate,
    /// The assigned day status, e.g. "Present", "Absent" or "Half day".
    pub status_label: String,
    /// Dedup marker: when the status-assignment notification for this row
    /// was delivered. A successful group send stamps every sibling row.
    pub assignment_notified_at: Option<i64>,
}

impl AttendanceEntry {
    pub fn new(business_id: ID, employee_id: ID, date: NaiveDate, status_label: &str) -> Self {
        Self {
            id: Default::default(),
            business_id,
            employee_id,
            date,
            status_label: status_label.to_string(),
            assignment_notified_at: None,
        }
    }

    /// Identity used to collapse sibling rows into one notification unit.
    pub fn group_key(&self) -> (ID, NaiveDate) {
        (self.employee_id.clone(), self.date)
    }
}

impl Entity<ID> for AttendanceEntry {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
