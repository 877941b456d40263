mod approval;
mod attendance;
mod review;
mod review_cycle;
mod shared;
mod staff;

pub use approval::{ApprovalKind, ApprovalOutcome, ApprovalRequest, ApprovalStatus};
pub use attendance::AttendanceEntry;
pub use review::{PerformanceReview, ReviewStatus};
pub use review_cycle::{CycleStatus, ReviewCycle};
pub use shared::entity::{Entity, ID};
pub use staff::{Staff, StaffRole};
