//! Exam invigilation scheduling.
//!
//! Assigns teachers to supervise exam rooms across exam sessions: two
//! supervisors per active (room, session) pair plus a quota of backup
//! teachers per session, with loads balanced as evenly as possible.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Roster`, `ActivePair`, `DutyPlan`,
//!   `ScheduleResult`
//! - **`validation`**: Input integrity checks (empty lists, duplicate IDs,
//!   unknown references, parameter ranges)
//! - **`cp`**: Cardinality model, branch-and-bound solver, and solution
//!   extraction
//! - **`scheduler`**: End-to-end scheduling, event reporting, workload KPIs
//! - **`error`**: `SchedulingError` taxonomy
//!
//! # Hard rules
//!
//! 1. Every active pair has exactly two distinct supervisors.
//! 2. No teacher supervises the same room twice.
//! 3. No teacher holds more than one duty in a session.
//! 4. Each session has exactly `ceil(ratio × 2 × pairs)` backups.
//! 5. Every load lies in `[average − 1, average + 1]`.
//!
//! Among schedules satisfying all five, the solver minimizes the sum of
//! squared deviations from the average load.
//!
//! # Example
//!
//! ```
//! use u_invigilate::models::Roster;
//! use u_invigilate::scheduler::{solve, ScheduleConfig};
//!
//! let roster = Roster::new()
//!     .with_teachers(["A", "B", "C", "D", "E"])
//!     .with_rooms(["R1", "R2"])
//!     .with_sessions(["S1", "S2"])
//!     .with_all_pairs_active();
//!
//! let result = solve(&roster, &ScheduleConfig::default()).unwrap();
//! assert!(result.verify(&roster, 0.2).is_empty());
//! assert_eq!(result.total_duties(), 10);
//! ```
//!
//! # References
//!
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Rossi, van Beek, Walsh (2006), "Handbook of Constraint Programming"

pub mod cp;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{Result, SchedulingError};
