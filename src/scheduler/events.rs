//! Scheduling event sink.
//!
//! The scheduler reports the start, success, or failure of every run as a
//! structured [`ScheduleEvent`]. Where the events go is up to the caller:
//! [`TracingSink`] forwards them to `tracing`, and any
//! `Fn(&ScheduleEvent)` closure can collect them for a UI log panel.

use std::time::Duration;

use tracing::{info, warn};

use crate::error::SchedulingError;
use crate::models::ScheduleStatus;

/// A structured scheduling event.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleEvent {
    /// A run began.
    Started {
        teachers: usize,
        rooms: usize,
        sessions: usize,
        active_pairs: usize,
        time_limit_secs: u64,
    },
    /// A schedule was produced.
    Solved {
        status: ScheduleStatus,
        objective: u64,
        nodes: u64,
        elapsed: Duration,
    },
    /// The run ended without a schedule.
    Failed {
        reason: FailureReason,
        message: String,
    },
}

/// Failure classification carried by [`ScheduleEvent::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Input rejected before search.
    Validation,
    /// No schedule exists.
    Infeasible,
    /// Budget exhausted before a schedule was found.
    Timeout,
}

impl FailureReason {
    /// Classifies a scheduling error.
    pub fn of(error: &SchedulingError) -> Self {
        match error {
            SchedulingError::Validation(_) => FailureReason::Validation,
            SchedulingError::Infeasible => FailureReason::Infeasible,
            SchedulingError::TimeoutWithoutSolution { .. } => FailureReason::Timeout,
        }
    }
}

/// Receives scheduling events.
pub trait EventSink: Send + Sync {
    /// Records one event.
    fn record(&self, event: &ScheduleEvent);
}

impl<F> EventSink for F
where
    F: Fn(&ScheduleEvent) + Send + Sync,
{
    fn record(&self, event: &ScheduleEvent) {
        self(event)
    }
}

/// Forwards events to `tracing`: successes at INFO, failures at WARN.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &ScheduleEvent) {
        match event {
            ScheduleEvent::Started {
                teachers,
                rooms,
                sessions,
                active_pairs,
                time_limit_secs,
            } => info!(
                teachers,
                rooms,
                sessions,
                active_pairs,
                time_limit_secs,
                "scheduling started"
            ),
            ScheduleEvent::Solved {
                status,
                objective,
                nodes,
                elapsed,
            } => info!(
                ?status,
                objective,
                nodes,
                elapsed_ms = elapsed.as_millis() as u64,
                "schedule solved"
            ),
            ScheduleEvent::Failed { reason, message } => {
                warn!(?reason, error = %message, "scheduling failed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    #[test]
    fn test_failure_reason() {
        assert_eq!(
            FailureReason::of(&SchedulingError::Infeasible),
            FailureReason::Infeasible
        );
        assert_eq!(
            FailureReason::of(&SchedulingError::TimeoutWithoutSolution { time_limit_secs: 1 }),
            FailureReason::Timeout
        );
        assert_eq!(
            FailureReason::of(&SchedulingError::Validation(vec![])),
            FailureReason::Validation
        );
    }

    #[test]
    fn test_closure_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |event: &ScheduleEvent| seen.lock().unwrap().push(event.clone());
        sink.record(&ScheduleEvent::Failed {
            reason: FailureReason::Infeasible,
            message: "No feasible schedule.".into(),
        });
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[traced_test]
    #[test]
    fn test_tracing_sink() {
        TracingSink.record(&ScheduleEvent::Failed {
            reason: FailureReason::Infeasible,
            message: "No feasible schedule.".into(),
        });
        assert!(logs_contain("scheduling failed"));
        assert!(logs_contain("No feasible schedule."));
    }
}
