use super::IStaffRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, Bson, Document},
    Collection, Database,
};
use staffpilot_domain::{Staff, StaffRole, ID};
use serde::{Deserialize, Serialize};
use tracing::error;

pub struct MongoStaffRepo {
    collection: Collection<Document>,
}

impl MongoStaffRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("staff"),
        }
    }
}

#[async_trait::async_trait]
impl IStaffRepo for MongoStaffRepo {
    async fn insert(&self, staff: &Staff) -> anyhow::Result<()> {
        mongo_repo::insert::<_, StaffMongo>(&self.collection, staff).await
    }

    async fn save(&self, staff: &Staff) -> anyhow::Result<()> {
        mongo_repo::save::<_, StaffMongo>(&self.collection, staff).await
    }

    async fn find(&self, staff_id: &ID) -> Option<Staff> {
        let oid = staff_id.inner_ref();
        mongo_repo::find::<_, StaffMongo>(&self.collection, oid).await
    }

    async fn find_by_roles(&self, business_id: &ID, roles: &[StaffRole]) -> Vec<Staff> {
        let roles = roles
            .iter()
            .map(|r| to_bson(r).unwrap_or(Bson::Null))
            .collect::<Vec<_>>();
        let filter = doc! {
            "business_id": business_id.inner_ref(),
            "roles": {
                "$in": roles
            }
        };
        match mongo_repo::find_many_by::<_, StaffMongo>(&self.collection, filter).await {
            Ok(staff) => staff,
            Err(e) => {
                error!("Error while querying staff by roles: {:?}", e);
                vec![]
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StaffMongo {
    _id: ObjectId,
    business_id: ObjectId,
    name: String,
    roles: Vec<StaffRole>,
    device_token: Option<String>,
}

impl MongoDocument<Staff> for StaffMongo {
    fn to_domain(self) -> Staff {
        Staff {
            id: ID::from(self._id),
            business_id: ID::from(self.business_id),
            name: self.name,
            roles: self.roles,
            device_token: self.device_token,
        }
    }

    fn from_domain(staff: &Staff) -> Self {
        Self {
            _id: *staff.id.inner_ref(),
            business_id: *staff.business_id.inner_ref(),
            name: staff.name.clone(),
            roles: staff.roles.clone(),
            device_token: staff.device_token.clone(),
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": &self._id
        }
    }
}
