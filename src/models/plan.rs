//! Duty plan: quantities derived from a roster.
//!
//! Rooms per session, backup quotas, total duty slots, and the average
//! load are pure functions of the roster and the backup ratio. The model
//! builder, the extractor, and result verification all read them from
//! [`DutyPlan`] so they can never disagree.
//!
//! # Rounding
//!
//! | Quantity | Formula |
//! |----------|---------|
//! | Backup quota of session s | `ceil(ratio × 2 × pairs(s))` |
//! | Total slots | `2 × #pairs + Σ quota(s)` |
//! | Average load | `ceil(total / #teachers)` |
//! | Load bounds | `[average − 1, average + 1]` |

use serde::{Deserialize, Serialize};

use super::Roster;

/// Supervisors required per active pair.
pub const SUPERVISORS_PER_PAIR: usize = 2;

/// Default fraction of a session's supervisor headcount staffed as backups.
pub const DEFAULT_BACKUP_RATIO: f64 = 0.2;

/// Absorbs floating-point noise before rounding up (`0.1 × 30` must stay 3).
const QUOTA_EPSILON: f64 = 1e-9;

/// Number of backups a session needs.
///
/// # Example
/// ```
/// use u_invigilate::models::backup_quota;
///
/// assert_eq!(backup_quota(0.2, 1), 1); // ceil(0.4)
/// assert_eq!(backup_quota(0.2, 5), 2); // ceil(2.0)
/// assert_eq!(backup_quota(0.2, 0), 0);
/// ```
pub fn backup_quota(backup_ratio: f64, active_rooms: usize) -> usize {
    let supervisors = (SUPERVISORS_PER_PAIR * active_rooms) as f64;
    let raw = (supervisors * backup_ratio - QUOTA_EPSILON).ceil();
    if raw <= 0.0 {
        0
    } else {
        raw as usize
    }
}

/// Derived duty quantities for one roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyPlan {
    /// Active rooms per session (aligned with `Roster::sessions`).
    pub rooms_per_session: Vec<usize>,
    /// Backup quota per session (aligned with `Roster::sessions`).
    pub backup_quota: Vec<usize>,
    /// Supervision slots: 2 per active pair.
    pub supervision_slots: usize,
    /// Supervision plus backup slots.
    pub total_slots: usize,
    /// Target load per teacher.
    pub average_load: usize,
    /// Number of teachers the plan was computed for.
    pub teacher_count: usize,
}

impl DutyPlan {
    /// Computes the plan for a roster.
    ///
    /// Pairs referencing unknown sessions are ignored here; validation
    /// rejects them before a plan is used for solving.
    pub fn new(roster: &Roster, backup_ratio: f64) -> Self {
        let rooms_per_session: Vec<usize> = roster
            .sessions
            .iter()
            .map(|s| roster.pairs_in_session(s).count())
            .collect();
        let backup_quota: Vec<usize> = rooms_per_session
            .iter()
            .map(|&rooms| backup_quota(backup_ratio, rooms))
            .collect();

        let supervision_slots = SUPERVISORS_PER_PAIR * rooms_per_session.iter().sum::<usize>();
        let total_slots = supervision_slots + backup_quota.iter().sum::<usize>();
        let teacher_count = roster.teacher_count();
        let average_load = if teacher_count == 0 {
            0
        } else {
            total_slots.div_ceil(teacher_count)
        };

        Self {
            rooms_per_session,
            backup_quota,
            supervision_slots,
            total_slots,
            average_load,
            teacher_count,
        }
    }

    /// Inclusive load range every teacher must fall into.
    pub fn load_bounds(&self) -> (usize, usize) {
        (self.average_load.saturating_sub(1), self.average_load + 1)
    }

    /// Whether `load` lies inside [`load_bounds`](Self::load_bounds).
    pub fn is_load_within_bounds(&self, load: usize) -> bool {
        let (lo, hi) = self.load_bounds();
        (lo..=hi).contains(&load)
    }

    /// Smallest number of teachers that can sit away from the average.
    ///
    /// Loads sum to `total_slots` and `average × teachers ≥ total_slots`,
    /// so the deficit has to be absorbed by teachers one below average.
    pub fn objective_floor(&self) -> u64 {
        (self.average_load * self.teacher_count).saturating_sub(self.total_slots) as u64
    }

    /// Total backup slots across all sessions.
    pub fn backup_slots(&self) -> usize {
        self.total_slots - self.supervision_slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(teachers: usize) -> Roster {
        Roster::new()
            .with_teachers((0..teachers).map(|i| format!("T{i}")))
            .with_rooms(["R1", "R2", "R3"])
            .with_sessions(["S1", "S2"])
            .with_active_pair("R1", "S1")
            .with_active_pair("R2", "S1")
            .with_active_pair("R3", "S1")
            .with_active_pair("R1", "S2")
    }

    #[test]
    fn test_backup_quota_rounding() {
        assert_eq!(backup_quota(0.2, 1), 1);
        assert_eq!(backup_quota(0.2, 3), 2); // ceil(1.2)
        assert_eq!(backup_quota(1.0, 3), 6);
        assert_eq!(backup_quota(0.1, 15), 3);
        assert_eq!(backup_quota(0.5, 0), 0);
    }

    #[test]
    fn test_plan_quantities() {
        let plan = DutyPlan::new(&roster(4), 0.2);
        assert_eq!(plan.rooms_per_session, vec![3, 1]);
        assert_eq!(plan.backup_quota, vec![2, 1]);
        assert_eq!(plan.supervision_slots, 8);
        assert_eq!(plan.total_slots, 11);
        assert_eq!(plan.backup_slots(), 3);
        // ceil(11 / 4) = 3
        assert_eq!(plan.average_load, 3);
        assert_eq!(plan.load_bounds(), (2, 4));
        // 4 × 3 − 11 = 1
        assert_eq!(plan.objective_floor(), 1);
    }

    #[test]
    fn test_load_bounds_at_zero_average() {
        let plan = DutyPlan {
            rooms_per_session: vec![],
            backup_quota: vec![],
            supervision_slots: 0,
            total_slots: 0,
            average_load: 0,
            teacher_count: 1,
        };
        assert_eq!(plan.load_bounds(), (0, 1));
        assert!(plan.is_load_within_bounds(1));
        assert!(!plan.is_load_within_bounds(2));
    }

    #[test]
    fn test_plan_without_teachers() {
        let plan = DutyPlan::new(&roster(0), 0.2);
        assert_eq!(plan.average_load, 0);
        assert_eq!(plan.objective_floor(), 0);
    }
}
