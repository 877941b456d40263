use super::IReviewRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, Bson, Document},
    Collection, Database,
};
use staffpilot_domain::{PerformanceReview, ReviewStatus, ID};
use serde::{Deserialize, Serialize};

pub struct MongoReviewRepo {
    collection: Collection<Document>,
}

impl MongoReviewRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("performance_reviews"),
        }
    }

    async fn find_by_cycle_and_statuses(
        &self,
        cycle_id: &ID,
        statuses: &[&str],
    ) -> anyhow::Result<Vec<PerformanceReview>> {
        let filter = doc! {
            "cycle_id": cycle_id.inner_ref(),
            "status": {
                "$in": statuses.to_vec()
            }
        };
        mongo_repo::find_many_by::<_, PerformanceReviewMongo>(&self.collection, filter).await
    }

    async fn add_reminder(
        &self,
        review_ids: &[ID],
        field: &str,
        day_offset: i64,
    ) -> anyhow::Result<()> {
        let oids = review_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let filter = doc! {
            "_id": {
                "$in": oids
            }
        };
        let update = doc! {
            "$addToSet": {
                field: day_offset
            }
        };
        mongo_repo::update_many(&self.collection, filter, update).await
    }
}

#[async_trait::async_trait]
impl IReviewRepo for MongoReviewRepo {
    async fn insert(&self, review: &PerformanceReview) -> anyhow::Result<()> {
        mongo_repo::insert::<_, PerformanceReviewMongo>(&self.collection, review).await
    }

    async fn save(&self, review: &PerformanceReview) -> anyhow::Result<()> {
        mongo_repo::save::<_, PerformanceReviewMongo>(&self.collection, review).await
    }

    async fn find(&self, review_id: &ID) -> Option<PerformanceReview> {
        let oid = review_id.inner_ref();
        mongo_repo::find::<_, PerformanceReviewMongo>(&self.collection, oid).await
    }

    async fn find_status_unnotified(&self) -> anyhow::Result<Vec<PerformanceReview>> {
        let filter = doc! {
            "status": { "$ne": "draft" },
            "$expr": { "$ne": ["$status", "$last_notified_status"] }
        };
        mongo_repo::find_many_by::<_, PerformanceReviewMongo>(&self.collection, filter).await
    }

    async fn find_by_cycle_awaiting_self(
        &self,
        cycle_id: &ID,
    ) -> anyhow::Result<Vec<PerformanceReview>> {
        self.find_by_cycle_and_statuses(cycle_id, &["draft", "self_review_pending"])
            .await
    }

    async fn find_by_cycle_awaiting_manager(
        &self,
        cycle_id: &ID,
    ) -> anyhow::Result<Vec<PerformanceReview>> {
        self.find_by_cycle_and_statuses(cycle_id, &["self_review_submitted", "manager_review_pending"])
            .await
    }

    async fn find_by_cycle_awaiting_hr(
        &self,
        cycle_id: &ID,
    ) -> anyhow::Result<Vec<PerformanceReview>> {
        self.find_by_cycle_and_statuses(
            cycle_id,
            &["manager_review_submitted", "hr_review_pending"],
        )
        .await
    }

    async fn add_self_reminder(&self, review_ids: &[ID], day_offset: i64) -> anyhow::Result<()> {
        self.add_reminder(review_ids, "self_reminders_sent", day_offset)
            .await
    }

    async fn add_manager_reminder(
        &self,
        review_ids: &[ID],
        day_offset: i64,
    ) -> anyhow::Result<()> {
        self.add_reminder(review_ids, "manager_reminders_sent", day_offset)
            .await
    }

    async fn set_last_notified_status(
        &self,
        review_id: &ID,
        status: ReviewStatus,
    ) -> anyhow::Result<()> {
        let filter = doc! {
            "_id": review_id.inner_ref()
        };
        let update = doc! {
            "$set": {
                "last_notified_status": to_bson(&status).unwrap_or(Bson::Null)
            }
        };
        mongo_repo::update_many(&self.collection, filter, update).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PerformanceReviewMongo {
    _id: ObjectId,
    business_id: ObjectId,
    cycle_id: ObjectId,
    employee_id: ObjectId,
    manager_id: ObjectId,
    status: ReviewStatus,
    self_reminders_sent: Vec<i64>,
    manager_reminders_sent: Vec<i64>,
    last_notified_status: Option<ReviewStatus>,
}

impl MongoDocument<PerformanceReview> for PerformanceReviewMongo {
    fn to_domain(self) -> PerformanceReview {
        PerformanceReview {
            id: ID::from(self._id),
            business_id: ID::from(self.business_id),
            cycle_id: ID::from(self.cycle_id),
            employee_id: ID::from(self.employee_id),
            manager_id: ID::from(self.manager_id),
            status: self.status,
            self_reminders_sent: self.self_reminders_sent,
            manager_reminders_sent: self.manager_reminders_sent,
            last_notified_status: self.last_notified_status,
        }
    }

    fn from_domain(review: &PerformanceReview) -> Self {
        Self {
            _id: *review.id.inner_ref(),
            business_id: *review.business_id.inner_ref(),
            cycle_id: *review.cycle_id.inner_ref(),
            employee_id: *review.employee_id.inner_ref(),
            manager_id: *review.manager_id.inner_ref(),
            status: review.status,
            self_reminders_sent: review.self_reminders_sent.clone(),
            manager_reminders_sent: review.manager_reminders_sent.clone(),
            last_notified_status: review.last_notified_status,
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": &self._id
        }
    }
}
