use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A `Staff` member of a business. The `business_id` acts as a namespace so
/// that multiple businesses can share the same instance of this system
/// without interfering with each other.
#[derive(Debug, Clone)]
pub struct Staff {
    pub id: ID,
    pub business_id: ID,
    pub name: String,
    pub roles: Vec<StaffRole>,
    /// Push delivery token registered by the mobile pairing flow. Cleared
    /// out-of-band when the account is deactivated. `None` or blank means
    /// the staff member is currently unreachable.
    pub device_token: Option<String>,
}

impl Staff {
    pub fn new(business_id: ID, name: &str) -> Self {
        Self {
            id: Default::default(),
            business_id,
            name: name.to_string(),
            roles: vec![StaffRole::Employee],
            device_token: None,
        }
    }

    /// The token to deliver push notifications to, if there is a usable one.
    pub fn delivery_token(&self) -> Option<&str> {
        match self.device_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Some(token),
            _ => None,
        }
    }

    pub fn has_role(&self, role: StaffRole) -> bool {
        self.roles.contains(&role)
    }
}

impl Entity<ID> for Staff {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Employee,
    Manager,
    Hr,
    Admin,
}
