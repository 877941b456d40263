mod inmemory;
mod mongo;

pub use inmemory::InMemoryReviewCycleRepo;
pub use mongo::MongoReviewCycleRepo;
use staffpilot_domain::{ReviewCycle, ID};

#[async_trait::async_trait]
pub trait IReviewCycleRepo: Send + Sync {
    async fn insert(&self, cycle: &ReviewCycle) -> anyhow::Result<()>;
    async fn save(&self, cycle: &ReviewCycle) -> anyhow::Result<()>;
    async fn find(&self, cycle_id: &ID) -> Option<ReviewCycle>;
    /// Cycles the deadline calculator should look at: status active and
    /// end date not passed.
    async fn find_active(&self, now: i64) -> anyhow::Result<Vec<ReviewCycle>>;
    /// Append a day-offset to the cycle-level HR threshold set.
    async fn add_hr_reminder(&self, cycle_id: &ID, day_offset: i64) -> anyhow::Result<()>;
}
