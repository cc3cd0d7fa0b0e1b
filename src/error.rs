//! Scheduling error taxonomy.

use thiserror::Error;

use crate::validation::ValidationError;

/// Why a scheduling request produced no schedule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulingError {
    /// Malformed input, detected before any search.
    #[error("Invalid input: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// The search proved that no assignment satisfies every hard rule.
    #[error("No feasible schedule.")]
    Infeasible,

    /// The time budget ran out before any feasible assignment was found.
    ///
    /// Displays the same message as [`SchedulingError::Infeasible`].
    #[error("No feasible schedule.")]
    TimeoutWithoutSolution {
        /// The budget that was exhausted, in seconds.
        time_limit_secs: u64,
    },
}

impl SchedulingError {
    /// Whether the request was well-formed but no schedule came out of it.
    pub fn is_no_schedule(&self) -> bool {
        matches!(
            self,
            SchedulingError::Infeasible | SchedulingError::TimeoutWithoutSolution { .. }
        )
    }

    /// Validation errors, if this is a validation failure.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            SchedulingError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

impl From<Vec<ValidationError>> for SchedulingError {
    fn from(errors: Vec<ValidationError>) -> Self {
        SchedulingError::Validation(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, SchedulingError>;
