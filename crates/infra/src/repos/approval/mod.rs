mod inmemory;
mod mongo;

pub use inmemory::InMemoryApprovalRepo;
pub use mongo::MongoApprovalRepo;
use staffpilot_domain::{ApprovalKind, ApprovalOutcome, ApprovalRequest, ID};

/// One repository covering the six approval-style collections. The domains
/// are queried and marked identically, only the collection differs.
#[async_trait::async_trait]
pub trait IApprovalRepo: Send + Sync {
    async fn insert(&self, request: &ApprovalRequest) -> anyhow::Result<()>;
    async fn find(&self, kind: ApprovalKind, request_id: &ID) -> Option<ApprovalRequest>;
    /// Decided requests whose marker for the decision outcome is still
    /// unset. Read-only.
    async fn find_unnotified(&self, kind: ApprovalKind) -> anyhow::Result<Vec<ApprovalRequest>>;
    /// Commit the single-flag dedup marker for the given outcome on all
    /// listed requests. Touches nothing but the marker field.
    async fn mark_notified(
        &self,
        kind: ApprovalKind,
        request_ids: &[ID],
        outcome: ApprovalOutcome,
        timestamp: i64,
    ) -> anyhow::Result<()>;
}
