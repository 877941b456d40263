mod inmemory;
mod mongo;

pub use inmemory::InMemoryStaffRepo;
pub use mongo::MongoStaffRepo;
use staffpilot_domain::{Staff, StaffRole, ID};

#[async_trait::async_trait]
pub trait IStaffRepo: Send + Sync {
    async fn insert(&self, staff: &Staff) -> anyhow::Result<()>;
    async fn save(&self, staff: &Staff) -> anyhow::Result<()>;
    async fn find(&self, staff_id: &ID) -> Option<Staff>;
    /// All staff of a business holding at least one of the given roles.
    /// Used for the HR fan-out of cycle-level reminders.
    async fn find_by_roles(&self, business_id: &ID, roles: &[StaffRole]) -> Vec<Staff>;
}
