use super::IAttendanceRepo;
use crate::repos::shared::inmemory_repo::*;
use staffpilot_domain::{AttendanceEntry, ID};

pub struct InMemoryAttendanceRepo {
    entries: std::sync::Mutex<Vec<AttendanceEntry>>,
}

impl InMemoryAttendanceRepo {
    pub fn new() -> Self {
        Self {
            entries: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IAttendanceRepo for InMemoryAttendanceRepo {
    async fn insert(&self, entry: &AttendanceEntry) -> anyhow::Result<()> {
        insert(entry, &self.entries);
        Ok(())
    }

    async fn find_unnotified_assignments(&self) -> anyhow::Result<Vec<AttendanceEntry>> {
        Ok(find_by(&self.entries, |e| {
            e.assignment_notified_at.is_none()
        }))
    }

    async fn mark_assignments_notified(
        &self,
        entry_ids: &[ID],
        timestamp: i64,
    ) -> anyhow::Result<()> {
        update_many(
            &self.entries,
            |e| entry_ids.contains(&e.id),
            |e| e.assignment_notified_at = Some(timestamp),
        );
        Ok(())
    }
}
