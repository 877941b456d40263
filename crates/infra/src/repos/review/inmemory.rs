use super::IReviewRepo;
use crate::repos::shared::inmemory_repo::*;
use staffpilot_domain::{PerformanceReview, ReviewStatus, ID};

pub struct InMemoryReviewRepo {
    reviews: std::sync::Mutex<Vec<PerformanceReview>>,
}

impl InMemoryReviewRepo {
    pub fn new() -> Self {
        Self {
            reviews: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IReviewRepo for InMemoryReviewRepo {
    async fn insert(&self, review: &PerformanceReview) -> anyhow::Result<()> {
        insert(review, &self.reviews);
        Ok(())
    }

    async fn save(&self, review: &PerformanceReview) -> anyhow::Result<()> {
        save(review, &self.reviews);
        Ok(())
    }

    async fn find(&self, review_id: &ID) -> Option<PerformanceReview> {
        find(review_id, &self.reviews)
    }

    async fn find_status_unnotified(&self) -> anyhow::Result<Vec<PerformanceReview>> {
        Ok(find_by(&self.reviews, |r| r.status_unnotified()))
    }

    async fn find_by_cycle_awaiting_self(
        &self,
        cycle_id: &ID,
    ) -> anyhow::Result<Vec<PerformanceReview>> {
        Ok(find_by(&self.reviews, |r| {
            r.cycle_id == *cycle_id && r.awaits_self_review()
        }))
    }

    async fn find_by_cycle_awaiting_manager(
        &self,
        cycle_id: &ID,
    ) -> anyhow::Result<Vec<PerformanceReview>> {
        Ok(find_by(&self.reviews, |r| {
            r.cycle_id == *cycle_id && r.awaits_manager_review()
        }))
    }

    async fn find_by_cycle_awaiting_hr(
        &self,
        cycle_id: &ID,
    ) -> anyhow::Result<Vec<PerformanceReview>> {
        Ok(find_by(&self.reviews, |r| {
            r.cycle_id == *cycle_id && r.awaits_hr_review()
        }))
    }

    async fn add_self_reminder(&self, review_ids: &[ID], day_offset: i64) -> anyhow::Result<()> {
        update_many(
            &self.reviews,
            |r| review_ids.contains(&r.id),
            |r| {
                if !r.self_reminders_sent.contains(&day_offset) {
                    r.self_reminders_sent.push(day_offset);
                }
            },
        );
        Ok(())
    }

    async fn add_manager_reminder(
        &self,
        review_ids: &[ID],
        day_offset: i64,
    ) -> anyhow::Result<()> {
        update_many(
            &self.reviews,
            |r| review_ids.contains(&r.id),
            |r| {
                if !r.manager_reminders_sent.contains(&day_offset) {
                    r.manager_reminders_sent.push(day_offset);
                }
            },
        );
        Ok(())
    }

    async fn set_last_notified_status(
        &self,
        review_id: &ID,
        status: ReviewStatus,
    ) -> anyhow::Result<()> {
        update_many(
            &self.reviews,
            |r| r.id == *review_id,
            |r| r.last_notified_status = Some(status),
        );
        Ok(())
    }
}
