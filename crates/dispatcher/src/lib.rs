mod approvals;
mod attendance_assignment;
mod deadlines;
mod guard;
mod pass;
mod shared;
mod status_change;

pub use pass::{run_dispatcher, run_pass};
