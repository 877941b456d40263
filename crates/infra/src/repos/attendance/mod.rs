mod inmemory;
mod mongo;

pub use inmemory::InMemoryAttendanceRepo;
pub use mongo::MongoAttendanceRepo;
use staffpilot_domain::{AttendanceEntry, ID};

#[async_trait::async_trait]
pub trait IAttendanceRepo: Send + Sync {
    async fn insert(&self, entry: &AttendanceEntry) -> anyhow::Result<()>;
    /// Rows with an assigned status whose assignment notification has not
    /// been delivered yet. The grouping layer collapses siblings afterwards.
    async fn find_unnotified_assignments(&self) -> anyhow::Result<Vec<AttendanceEntry>>;
    /// Commit the assignment marker on every listed row. A group commit
    /// passes all member ids so no sibling is re-selected next pass.
    async fn mark_assignments_notified(
        &self,
        entry_ids: &[ID],
        timestamp: i64,
    ) -> anyhow::Result<()>;
}
