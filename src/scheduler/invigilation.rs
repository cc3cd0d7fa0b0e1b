//! Invigilation scheduler.
//!
//! # Algorithm
//!
//! 1. Validate roster and parameters; report every problem at once.
//! 2. Build the cardinality model ([`InvigilationCpBuilder`]).
//! 3. Search it within the time budget ([`CpSolver`]).
//! 4. Read the assignment back ([`extract_schedule`]).
//!
//! Each call builds its own model and solver state; nothing is shared
//! between runs.

use tracing::debug;

use super::events::{EventSink, FailureReason, ScheduleEvent, TracingSink};
use super::request::{ScheduleConfig, ScheduleRequest};
use crate::cp::{
    extract_schedule, BranchAndBoundSolver, CpSolver, InvigilationCpBuilder, SolveStatus,
};
use crate::error::{Result, SchedulingError};
use crate::models::{Roster, ScheduleResult};
use crate::validation::validate_input;

/// Invigilation scheduler.
///
/// # Example
///
/// ```
/// use u_invigilate::models::Roster;
/// use u_invigilate::scheduler::{InvigilationScheduler, ScheduleRequest};
///
/// let roster = Roster::new()
///     .with_teachers(["A", "B", "C"])
///     .with_rooms(["R1"])
///     .with_sessions(["S1"])
///     .with_active_pair("R1", "S1");
/// let request = ScheduleRequest::new(roster).with_time_limit_secs(5);
///
/// let result = InvigilationScheduler::new().schedule(&request).unwrap();
/// assert!(result.is_optimal());
/// assert_eq!(result.backups_for("S1"), &["C".to_string()]);
/// ```
pub struct InvigilationScheduler<S = BranchAndBoundSolver> {
    solver: S,
    sink: Box<dyn EventSink>,
}

impl InvigilationScheduler {
    /// Creates a scheduler using branch and bound, reporting to `tracing`.
    pub fn new() -> Self {
        Self {
            solver: BranchAndBoundSolver::new(),
            sink: Box::new(TracingSink),
        }
    }
}

impl Default for InvigilationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CpSolver> InvigilationScheduler<S> {
    /// Replaces the solver.
    pub fn with_solver<T: CpSolver>(self, solver: T) -> InvigilationScheduler<T> {
        InvigilationScheduler {
            solver,
            sink: self.sink,
        }
    }

    /// Replaces the event sink.
    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Schedules from a request.
    pub fn schedule(&self, request: &ScheduleRequest) -> Result<ScheduleResult> {
        self.schedule_roster(&request.roster, &request.config)
    }

    /// Schedules a roster with the given parameters.
    ///
    /// A schedule whose optimality was not proven in time is returned as
    /// a normal result with [`ScheduleStatus::Feasible`](crate::models::ScheduleStatus::Feasible).
    pub fn schedule_roster(
        &self,
        roster: &Roster,
        config: &ScheduleConfig,
    ) -> Result<ScheduleResult> {
        self.sink.record(&ScheduleEvent::Started {
            teachers: roster.teachers.len(),
            rooms: roster.rooms.len(),
            sessions: roster.sessions.len(),
            active_pairs: roster.active_pairs.len(),
            time_limit_secs: config.time_limit_secs,
        });

        if let Err(errors) = validate_input(roster, config.backup_ratio, config.time_limit_secs) {
            return Err(self.fail(SchedulingError::Validation(errors)));
        }

        let built = InvigilationCpBuilder::new(roster)
            .with_backup_ratio(config.backup_ratio)
            .build()
            .map_err(|e| self.fail(e))?;

        let solution = self.solver.solve(&built.model, &config.solver_config());
        debug!(
            status = ?solution.status,
            objective = ?solution.objective,
            solutions = solution.stats.solutions,
            "search complete"
        );

        match extract_schedule(roster, &built, &solution) {
            Some(result) => {
                self.sink.record(&ScheduleEvent::Solved {
                    status: result.status(),
                    objective: result.objective(),
                    nodes: solution.stats.nodes,
                    elapsed: solution.stats.elapsed,
                });
                Ok(result)
            }
            None => {
                let error = match solution.status {
                    SolveStatus::Unknown => SchedulingError::TimeoutWithoutSolution {
                        time_limit_secs: config.time_limit_secs,
                    },
                    _ => SchedulingError::Infeasible,
                };
                Err(self.fail(error))
            }
        }
    }

    fn fail(&self, error: SchedulingError) -> SchedulingError {
        self.sink.record(&ScheduleEvent::Failed {
            reason: FailureReason::of(&error),
            message: error.to_string(),
        });
        error
    }
}

/// Schedules a roster with the default solver and a `tracing` event sink.
///
/// # Example
///
/// ```
/// use u_invigilate::models::Roster;
/// use u_invigilate::scheduler::{solve, ScheduleConfig};
///
/// let roster = Roster::new()
///     .with_teachers(["A"])
///     .with_rooms(["R1", "R2"])
///     .with_sessions(["S1"])
///     .with_all_pairs_active();
///
/// let err = solve(&roster, &ScheduleConfig::default()).unwrap_err();
/// assert_eq!(err.to_string(), "No feasible schedule.");
/// ```
pub fn solve(roster: &Roster, config: &ScheduleConfig) -> Result<ScheduleResult> {
    InvigilationScheduler::new().schedule_roster(roster, config)
}
