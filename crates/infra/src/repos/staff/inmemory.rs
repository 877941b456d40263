use super::IStaffRepo;
use crate::repos::shared::inmemory_repo::*;
use staffpilot_domain::{Staff, StaffRole, ID};

pub struct InMemoryStaffRepo {
    staff: std::sync::Mutex<Vec<Staff>>,
}

impl InMemoryStaffRepo {
    pub fn new() -> Self {
        Self {
            staff: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IStaffRepo for InMemoryStaffRepo {
    async fn insert(&self, staff: &Staff) -> anyhow::Result<()> {
        insert(staff, &self.staff);
        Ok(())
    }

    async fn save(&self, staff: &Staff) -> anyhow::Result<()> {
        save(staff, &self.staff);
        Ok(())
    }

    async fn find(&self, staff_id: &ID) -> Option<Staff> {
        find(staff_id, &self.staff)
    }

    async fn find_by_roles(&self, business_id: &ID, roles: &[StaffRole]) -> Vec<Staff> {
        find_by(&self.staff, |s| {
            s.business_id == *business_id && roles.iter().any(|r| s.has_role(*r))
        })
    }
}
