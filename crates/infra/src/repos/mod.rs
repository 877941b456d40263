mod approval;
mod attendance;
mod review;
mod review_cycle;
mod shared;
mod staff;

pub use approval::IApprovalRepo;
use approval::{InMemoryApprovalRepo, MongoApprovalRepo};
pub use attendance::IAttendanceRepo;
use attendance::{InMemoryAttendanceRepo, MongoAttendanceRepo};
use mongodb::{options::ClientOptions, Client};
pub use review::IReviewRepo;
use review::{InMemoryReviewRepo, MongoReviewRepo};
pub use review_cycle::IReviewCycleRepo;
use review_cycle::{InMemoryReviewCycleRepo, MongoReviewCycleRepo};
pub use staff::IStaffRepo;
use staff::{InMemoryStaffRepo, MongoStaffRepo};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub staff: Arc<dyn IStaffRepo>,
    pub approvals: Arc<dyn IApprovalRepo>,
    pub attendance: Arc<dyn IAttendanceRepo>,
    pub reviews: Arc<dyn IReviewRepo>,
    pub review_cycles: Arc<dyn IReviewCycleRepo>,
}

impl Repos {
    pub async fn create_mongodb(
        connection_string: &str,
        db_name: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let client_options = ClientOptions::parse(connection_string).await?;
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // This is needed to make sure that db is ready when starting the dispatcher
        info!("DB CHECKING CONNECTION ...");
        db.collection::<mongodb::bson::Document>("server-start")
            .insert_one(
                mongodb::bson::doc! {
                "server-start": 1
                },
                None,
            )
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            staff: Arc::new(MongoStaffRepo::new(&db)),
            approvals: Arc::new(MongoApprovalRepo::new(&db)),
            attendance: Arc::new(MongoAttendanceRepo::new(&db)),
            reviews: Arc::new(MongoReviewRepo::new(&db)),
            review_cycles: Arc::new(MongoReviewCycleRepo::new(&db)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            staff: Arc::new(InMemoryStaffRepo::new()),
            approvals: Arc::new(InMemoryApprovalRepo::new()),
            attendance: Arc::new(InMemoryAttendanceRepo::new()),
            reviews: Arc::new(InMemoryReviewRepo::new()),
            review_cycles: Arc::new(InMemoryReviewCycleRepo::new()),
        }
    }
}
