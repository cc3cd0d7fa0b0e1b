//! Invigilation domain models.
//!
//! Provides the input and output types of a scheduling run.
//!
//! # Domain Mappings
//!
//! | u-invigilate | Meaning |
//! |--------------|---------|
//! | Roster | Teachers, rooms, sessions, active pairs |
//! | ActivePair | A (room, session) holding an exam |
//! | DutyPlan | Quotas and load targets derived from a roster |
//! | ScheduleResult | Supervisors, backups, and loads |

mod plan;
mod roster;
mod schedule;

pub use plan::{backup_quota, DutyPlan, DEFAULT_BACKUP_RATIO, SUPERVISORS_PER_PAIR};
pub use roster::{ActivePair, Roster};
pub use schedule::{
    BackupAssignment, GridRow, ScheduleResult, ScheduleStatus, SupervisorAssignment, Violation,
    ViolationType,
};
