//! CP-based invigilation formulation.
//!
//! Builds a boolean cardinality model from a roster, solves it with a
//! time-bounded branch-and-bound search, and reads the assignment back
//! into a schedule.
//!
//! # Pipeline
//!
//! ```text
//! Roster ──InvigilationCpBuilder──▶ CpModel ──CpSolver──▶ CpSolution ──extract_schedule──▶ ScheduleResult
//! ```
//!
//! # Reference
//! - Baptiste et al. (2001), "Constraint-Based Scheduling"
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"

mod builder;
mod extract;
mod model;
mod solver;

pub use builder::{InvigilationCpBuilder, InvigilationModel, PairIndex};
pub use extract::extract_schedule;
pub use model::{BoolVar, CardinalityConstraint, CpModel, ObjectiveTerm, VarId};
pub use solver::{
    BranchAndBoundSolver, CpSolution, CpSolver, SolveStatus, SolverConfig, SolverStats,
};
