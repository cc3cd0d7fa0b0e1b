//! Workload metrics (KPIs).
//!
//! Summarizes how evenly a solved schedule spreads duties across the
//! teaching staff.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total duties | Supervisions plus backups |
//! | Target load | `ceil(total / #teachers)` |
//! | Min / Max load | Lightest and heaviest teacher |
//! | Spread | `max − min` |
//! | Below / At / Above target | Teachers per side of the target |
//! | Backup share | Fraction of duties that are backups |
//!
//! # Reference
//! Burke et al. (2004), "The State of the Art of Nurse Rostering", §3: fairness measures

use crate::models::{DutyPlan, Roster, ScheduleResult};

/// Workload indicators of one schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadKpi {
    /// Total duties assigned.
    pub total_duties: usize,
    /// Backup duties among them.
    pub backup_duties: usize,
    /// Target (average) load.
    pub target_load: usize,
    /// Lightest load.
    pub min_load: usize,
    /// Heaviest load.
    pub max_load: usize,
    /// Teachers one or more duties below target.
    pub below_target: usize,
    /// Teachers exactly at target.
    pub at_target: usize,
    /// Teachers above target.
    pub above_target: usize,
    /// Fraction of duties that are backups (0.0..1.0).
    pub backup_share: f64,
}

impl WorkloadKpi {
    /// Computes KPIs from a schedule and the roster it was solved for.
    ///
    /// Teachers missing from the result count as load 0.
    pub fn calculate(result: &ScheduleResult, roster: &Roster, backup_ratio: f64) -> Self {
        let plan = DutyPlan::new(roster, backup_ratio);
        let target = plan.average_load;

        let loads: Vec<usize> = roster
            .teachers
            .iter()
            .map(|t| result.load_of(t).unwrap_or(0))
            .collect();

        let total_duties: usize = loads.iter().sum();
        let backup_duties: usize = result.backups().iter().map(|b| b.teachers.len()).sum();

        let mut below_target = 0;
        let mut at_target = 0;
        let mut above_target = 0;
        for &load in &loads {
            match load.cmp(&target) {
                std::cmp::Ordering::Less => below_target += 1,
                std::cmp::Ordering::Equal => at_target += 1,
                std::cmp::Ordering::Greater => above_target += 1,
            }
        }

        let backup_share = if total_duties == 0 {
            0.0
        } else {
            backup_duties as f64 / total_duties as f64
        };

        Self {
            total_duties,
            backup_duties,
            target_load: target,
            min_load: loads.iter().copied().min().unwrap_or(0),
            max_load: loads.iter().copied().max().unwrap_or(0),
            below_target,
            at_target,
            above_target,
            backup_share,
        }
    }

    /// Difference between the heaviest and lightest load.
    pub fn spread(&self) -> usize {
        self.max_load - self.min_load
    }

    /// Whether no teacher is more than `max_spread` duties apart from another.
    pub fn meets_spread(&self, max_spread: usize) -> bool {
        self.spread() <= max_spread
    }
}
