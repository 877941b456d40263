use super::IApprovalRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    Collection, Database,
};
use staffpilot_domain::{ApprovalKind, ApprovalOutcome, ApprovalRequest, ApprovalStatus, ID};
use serde::{Deserialize, Serialize};

pub struct MongoApprovalRepo {
    db: Database,
}

impl MongoApprovalRepo {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    fn collection(&self, kind: ApprovalKind) -> Collection<Document> {
        let name = match kind {
            ApprovalKind::Leave => "leave_requests",
            ApprovalKind::Expense => "expense_claims",
            ApprovalKind::Reimbursement => "reimbursement_claims",
            ApprovalKind::Payslip => "payslips",
            ApprovalKind::Loan => "loan_requests",
            ApprovalKind::Attendance => "attendance_requests",
        };
        self.db.collection(name)
    }

    fn marker_field(outcome: ApprovalOutcome) -> &'static str {
        match outcome {
            ApprovalOutcome::Approved => "approved_notified_at",
            ApprovalOutcome::Rejected => "rejected_notified_at",
        }
    }
}

#[async_trait::async_trait]
impl IApprovalRepo for MongoApprovalRepo {
    async fn insert(&self, request: &ApprovalRequest) -> anyhow::Result<()> {
        mongo_repo::insert::<_, ApprovalRequestMongo>(&self.collection(request.kind), request).await
    }

    async fn find(&self, kind: ApprovalKind, request_id: &ID) -> Option<ApprovalRequest> {
        let oid = request_id.inner_ref();
        mongo_repo::find::<_, ApprovalRequestMongo>(&self.collection(kind), oid)
            .await
            .map(|mut r| {
                r.kind = kind;
                r
            })
    }

    async fn find_unnotified(&self, kind: ApprovalKind) -> anyhow::Result<Vec<ApprovalRequest>> {
        let filter = doc! {
            "$or": [
                {
                    "status": "approved",
                    "decided_at": { "$ne": Bson::Null },
                    "approved_notified_at": Bson::Null
                },
                {
                    "status": "rejected",
                    "decided_at": { "$ne": Bson::Null },
                    "rejected_notified_at": Bson::Null
                }
            ]
        };
        let requests =
            mongo_repo::find_many_by::<_, ApprovalRequestMongo>(&self.collection(kind), filter)
                .await?;
        Ok(requests
            .into_iter()
            .map(|mut r| {
                r.kind = kind;
                r
            })
            .collect())
    }

    async fn mark_notified(
        &self,
        kind: ApprovalKind,
        request_ids: &[ID],
        outcome: ApprovalOutcome,
        timestamp: i64,
    ) -> anyhow::Result<()> {
        let oids = request_ids
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
                Self::marker_field(outcome): timestamp
            }
        };
        mongo_repo::update_many(&self.collection(kind), filter, update).await
    }
}

/// Raw document without the kind: the collection itself carries it.
#[derive(Debug, Serialize, Deserialize)]
struct ApprovalRequestMongo {
    _id: ObjectId,
    business_id: ObjectId,
    employee_id: ObjectId,
    status: ApprovalStatus,
    decided_at: Option<i64>,
    approved_notified_at: Option<i64>,
    rejected_notified_at: Option<i64>,
}

impl MongoDocument<ApprovalRequest> for ApprovalRequestMongo {
    fn to_domain(self) -> ApprovalRequest {
        ApprovalRequest {
            id: ID::from(self._id),
            business_id: ID::from(self.business_id),
            employee_id: ID::from(self.employee_id),
            // Placeholder, the caller substitutes the collection's kind
            kind: ApprovalKind::Leave,
            status: self.status,
            decided_at: self.decided_at,
            approved_notified_at: self.approved_notified_at,
            rejected_notified_at: self.rejected_notified_at,
        }
    }

    fn from_domain(request: &ApprovalRequest) -> Self {
        Self {
            _id: *request.id.inner_ref(),
            business_id: *request.business_id.inner_ref(),
            employee_id: *request.employee_id.inner_ref(),
            status: request.status,
            decided_at: request.decided_at,
            approved_notified_at: request.approved_notified_at,
            rejected_notified_at: request.rejected_notified_at,
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": &self._id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_document_round_trip_takes_the_kind_from_the_collection() {
        let mut request = ApprovalRequest::new(
            Default::default(),
            Default::default(),
            ApprovalKind::Expense,
        );
        request.status = ApprovalStatus::Approved;
        request.decided_at = Some(1000);

        // The raw document drops the kind, the collection carries it
        let raw = ApprovalRequestMongo::from_domain(&request);
        let mut restored = raw.to_domain();
        restored.kind = ApprovalKind::Expense;

        assert_eq!(restored.id, request.id);
        assert_eq!(restored.employee_id, request.employee_id);
        assert_eq!(restored.kind, ApprovalKind::Expense);
        assert_eq!(restored.status, ApprovalStatus::Approved);
        assert_eq!(restored.decided_at, Some(1000));
        assert!(restored.approved_notified_at.is_none());
    }
}
