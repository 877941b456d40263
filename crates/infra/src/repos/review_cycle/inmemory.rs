use super::IReviewCycleRepo;
use crate::repos::shared::inmemory_repo::*;
use staffpilot_domain::{ReviewCycle, ID};

pub struct InMemoryReviewCycleRepo {
    cycles: std::sync::Mutex<Vec<ReviewCycle>>,
}

impl InMemoryReviewCycleRepo {
    pub fn new() -> Self {
        Self {
            cycles: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IReviewCycleRepo for InMemoryReviewCycleRepo {
    async fn insert(&self, cycle: &ReviewCycle) -> anyhow::Result<()> {
        insert(cycle, &self.cycles);
        Ok(())
    }

    async fn save(&self, cycle: &ReviewCycle) -> anyhow::Result<()> {
        save(cycle, &self.cycles);
        Ok(())
    }

    async fn find(&self, cycle_id: &ID) -> Option<ReviewCycle> {
        find(cycle_id, &self.cycles)
    }

    async fn find_active(&self, now: i64) -> anyhow::Result<Vec<ReviewCycle>> {
        Ok(find_by(&self.cycles, |c| c.is_active(now)))
    }

    async fn add_hr_reminder(&self, cycle_id: &ID, day_offset: i64) -> anyhow::Result<()> {
        update_many(
            &self.cycles,
            |c| c.id == *cycle_id,
            |c| {
                if !c.hr_reminders_sent.contains(&day_offset) {
                    c.hr_reminders_sent.push(day_offset);
                }
            },
        );
        Ok(())
    }
}
