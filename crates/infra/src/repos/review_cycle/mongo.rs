use super::IReviewCycleRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection, Database,
};
use staffpilot_domain::{CycleStatus, ReviewCycle, ID};
use serde::{Deserialize, Serialize};

pub struct MongoReviewCycleRepo {
    collection: Collection<Document>,
}

impl MongoReviewCycleRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("review_cycles"),
        }
    }
}

#[async_trait::async_trait]
impl IReviewCycleRepo for MongoReviewCycleRepo {
    async fn insert(&self, cycle: &ReviewCycle) -> anyhow::Result<()> {
        mongo_repo::insert::<_, ReviewCycleMongo>(&self.collection, cycle).await
    }

    async fn save(&self, cycle: &ReviewCycle) -> anyhow::Result<()> {
        mongo_repo::save::<_, ReviewCycleMongo>(&self.collection, cycle).await
    }

    async fn find(&self, cycle_id: &ID) -> Option<ReviewCycle> {
        let oid = cycle_id.inner_ref();
        mongo_repo::find::<_, ReviewCycleMongo>(&self.collection, oid).await
    }

    async fn find_active(&self, now: i64) -> anyhow::Result<Vec<ReviewCycle>> {
        let filter = doc! {
            "status": "active",
            "end_at": {
                "$gte": now
            }
        };
        mongo_repo::find_many_by::<_, ReviewCycleMongo>(&self.collection, filter).await
    }

    async fn add_hr_reminder(&self, cycle_id: &ID, day_offset: i64) -> anyhow::Result<()> {
        let filter = doc! {
            "_id": cycle_id.inner_ref()
        };
        let update = doc! {
            "$addToSet": {
                "hr_reminders_sent": day_offset
            }
        };
        mongo_repo::update_many(&self.collection, filter, update).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ReviewCycleMongo {
    _id: ObjectId,
    business_id: ObjectId,
    name: String,
    status: CycleStatus,
    self_review_deadline: i64,
    manager_review_deadline: i64,
    hr_review_deadline: i64,
    end_at: i64,
    hr_reminders_sent: Vec<i64>,
}

impl MongoDocument<ReviewCycle> for ReviewCycleMongo {
    fn to_domain(self) -> ReviewCycle {
        ReviewCycle {
            id: ID::from(self._id),
            business_id: ID::from(self.business_id),
            name: self.name,
            status: self.status,
            self_review_deadline: self.self_review_deadline,
            manager_review_deadline: self.manager_review_deadline,
            hr_review_deadline: self.hr_review_deadline,
            end_at: self.end_at,
            hr_reminders_sent: self.hr_reminders_sent,
        }
    }

    fn from_domain(cycle: &ReviewCycle) -> Self {
        Self {
            _id: *cycle.id.inner_ref(),
            business_id: *cycle.business_id.inner_ref(),
            name: cycle.name.clone(),
            status: cycle.status,
            self_review_deadline: cycle.self_review_deadline,
            manager_review_deadline: cycle.manager_review_deadline,
            hr_review_deadline: cycle.hr_review_deadline,
            end_at: cycle.end_at,
            hr_reminders_sent: cycle.hr_reminders_sent.clone(),
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": &self._id
        }
    }
}
