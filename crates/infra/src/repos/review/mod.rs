mod inmemory;
mod mongo;

pub use inmemory::InMemoryReviewRepo;
pub use mongo::MongoReviewRepo;
use staffpilot_domain::{PerformanceReview, ReviewStatus, ID};

#[async_trait::async_trait]
pub trait IReviewRepo: Send + Sync {
    async fn insert(&self, review: &PerformanceReview) -> anyhow::Result<()>;
    async fn save(&self, review: &PerformanceReview) -> anyhow::Result<()>;
    async fn find(&self, review_id: &ID) -> Option<PerformanceReview>;
    /// Reviews whose current status has not been announced to the employee
    /// yet. Draft is never announced.
    async fn find_status_unnotified(&self) -> anyhow::Result<Vec<PerformanceReview>>;
    /// Reviews of a cycle still awaiting the employee's self review
    /// (draft or self-review-pending).
    async fn find_by_cycle_awaiting_self(
        &self,
        cycle_id: &ID,
    ) -> anyhow::Result<Vec<PerformanceReview>>;
    /// Reviews of a cycle sitting with the manager
    /// (self-review-submitted or manager-review-pending).
    async fn find_by_cycle_awaiting_manager(
        &self,
        cycle_id: &ID,
    ) -> anyhow::Result<Vec<PerformanceReview>>;
    /// Reviews of a cycle sitting with HR
    /// (manager-review-submitted or hr-review-pending).
    async fn find_by_cycle_awaiting_hr(
        &self,
        cycle_id: &ID,
    ) -> anyhow::Result<Vec<PerformanceReview>>;
    /// Append a day-offset to the self-deadline threshold set of the given
    /// reviews. Additive, nothing else is touched.
    async fn add_self_reminder(&self, review_ids: &[ID], day_offset: i64) -> anyhow::Result<()>;
    /// Append a day-offset to the manager-deadline threshold set of the
    /// given reviews. A manager-batch commit passes every review of the
    /// batch.
    async fn add_manager_reminder(&self, review_ids: &[ID], day_offset: i64)
        -> anyhow::Result<()>;
    /// Advance the last-notified-value marker to the given status.
    async fn set_last_notified_status(
        &self,
        review_id: &ID,
        status: ReviewStatus,
    ) -> anyhow::Result<()>;
}
