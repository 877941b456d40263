use super::IAttendanceRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use chrono::NaiveDate;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    Collection, Database,
};
use staffpilot_domain::{AttendanceEntry, ID};
use serde::{Deserialize, Serialize};

pub struct MongoAttendanceRepo {
    collection: Collection<Document>,
}

impl MongoAttendanceRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("attendance_entries"),
        }
    }
}

#[async_trait::async_trait]
impl IAttendanceRepo for MongoAttendanceRepo {
    async fn insert(&self, entry: &AttendanceEntry) -> anyhow::Result<()> {
        mongo_repo::insert::<_, AttendanceEntryMongo>(&self.collection, entry).await
    }

    async fn find_unnotified_assignments(&self) -> anyhow::Result<Vec<AttendanceEntry>> {
        let filter = doc! {
            "assignment_notified_at": Bson::Null
        };
        mongo_repo::find_many_by::<_, AttendanceEntryMongo>(&self.collection, filter).await
    }

    async fn mark_assignments_notified(
        &self,
        entry_ids: &[ID],
        timestamp: i64,
    ) -> anyhow::Result<()> {
        let oids = entry_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let filter = doc! {
            "_id": {
                "$in": oids
            }
        };
        let update = doc! {
            "$set": {
                "assignment_notified_at": timestamp
            }
        };
        mongo_repo::update_many(&self.collection, filter, update).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AttendanceEntryMongo {
    _id: ObjectId,
    business_id: ObjectId,
    employee_id: ObjectId,
    /// Stored as a `YYYY-MM-DD` string through chrono's serde impl
    date: NaiveDate,
    status_label: String,
    assignment_notified_at: Option<i64>,
}

impl MongoDocument<AttendanceEntry> for AttendanceEntryMongo {
    fn to_domain(self) -> AttendanceEntry {
        AttendanceEntry {
            id: ID::from(self._id),
            business_id: ID::from(self.business_id),
            employee_id: ID::from(self.employee_id),
            date: self.date,
            status_label: self.status_label,
            assignment_notified_at: self.assignment_notified_at,
        }
    }

    fn from_domain(entry: &AttendanceEntry) -> Self {
        Self {
            _id: *entry.id.inner_ref(),
            business_id: *entry.business_id.inner_ref(),
            employee_id: *entry.employee_id.inner_ref(),
            date: entry.date,
            status_label: entry.status_label.clone(),
            assignment_notified_at: entry.assignment_notified_at,
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": &self._id
        }
    }
}
