//! Invigilation scheduling and workload evaluation.
//!
//! Validates a roster, solves the duty assignment within a time budget,
//! and reports the run through an [`EventSink`].
//!
//! # Algorithm
//!
//! `InvigilationScheduler` builds a boolean cardinality model from the
//! roster and searches it with depth-first branch and bound. The search is
//! anytime: when the budget runs out the best schedule found so far is
//! returned as `Feasible`.
//!
//! # KPI
//!
//! `WorkloadKpi` summarizes load balance: target, spread, and how many
//! teachers sit on each side of the target.
//!
//! # References
//!
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Rossi, van Beek, Walsh (2006), "Handbook of Constraint Programming"

mod events;
mod invigilation;
mod kpi;
mod request;

pub use events::{EventSink, FailureReason, ScheduleEvent, TracingSink};
pub use invigilation::{solve, InvigilationScheduler};
pub use kpi::WorkloadKpi;
pub use request::{ScheduleConfig, ScheduleRequest, DEFAULT_TIME_LIMIT_SECS};
