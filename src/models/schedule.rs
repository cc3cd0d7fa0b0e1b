//! Schedule result model.
//!
//! A [`ScheduleResult`] is the solved duty assignment: two supervisors per
//! active pair, the backup teachers of every session, and the resulting
//! load per teacher. It is produced once per successful solve and is not
//! modified afterwards; fields are reachable through accessors only.
//!
//! Result sinks (spreadsheet writers, reports) read it through
//! [`ScheduleResult::supervisor_grid`] and
//! [`ScheduleResult::workload_ranking`]; [`ScheduleResult::verify`]
//! re-checks every hard rule against a roster.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{DutyPlan, Roster, SUPERVISORS_PER_PAIR};

/// How good the returned schedule is known to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleStatus {
    /// The objective was proven minimal.
    Optimal,
    /// All hard rules hold; the time budget ran out before a proof.
    Feasible,
}

/// The two supervisors of one active pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorAssignment {
    /// Room identifier.
    pub room: String,
    /// Session identifier.
    pub session: String,
    /// Supervising teachers, in roster order.
    pub teachers: Vec<String>,
}

/// The backup teachers of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupAssignment {
    /// Session identifier.
    pub session: String,
    /// Backup teachers, in roster order.
    pub teachers: Vec<String>,
}

/// One row of the room × session distribution grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    /// Room identifier.
    pub room: String,
    /// One cell per session: `"A / B"`, or empty when the room is unused.
    pub cells: Vec<String>,
}

/// A solved invigilation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    status: ScheduleStatus,
    objective: u64,
    supervisors: Vec<SupervisorAssignment>,
    backups: Vec<BackupAssignment>,
    load: HashMap<String, usize>,
}

/// A broken hard rule found by [`ScheduleResult::verify`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity (teacher, session, or `room@session`).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// An active pair does not have exactly two distinct supervisors.
    CoverageMismatch,
    /// A teacher supervises the same room in more than one session.
    RoomRepeated,
    /// A teacher holds more than one duty in a session.
    DoubleDuty,
    /// A session's backup count differs from its quota.
    BackupQuotaMismatch,
    /// A teacher's load is outside `[average − 1, average + 1]`.
    LoadOutOfBounds,
    /// A reported load differs from the recounted duties.
    LoadMismatch,
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
        severity: i32,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
            severity,
        }
    }
}

impl ScheduleResult {
    pub(crate) fn new(
        status: ScheduleStatus,
        objective: u64,
        supervisors: Vec<SupervisorAssignment>,
        backups: Vec<BackupAssignment>,
        load: HashMap<String, usize>,
    ) -> Self {
        Self {
            status,
            objective,
            supervisors,
            backups,
            load,
        }
    }

    /// Solve status.
    pub fn status(&self) -> ScheduleStatus {
        self.status
    }

    /// Whether the schedule was proven optimal.
    pub fn is_optimal(&self) -> bool {
        self.status == ScheduleStatus::Optimal
    }

    /// Sum of squared deviations from the average load.
    ///
    /// Loads are bounded to average ± 1, so this is the number of teachers
    /// not exactly at average.
    pub fn objective(&self) -> u64 {
        self.objective
    }

    /// Supervisor pairs, in active-pair order.
    pub fn supervisors(&self) -> &[SupervisorAssignment] {
        &self.supervisors
    }

    /// Supervisors of one (room, session), if it is an active pair.
    pub fn supervisors_for(&self, room: &str, session: &str) -> Option<&[String]> {
        self.supervisors
            .iter()
            .find(|a| a.room == room && a.session == session)
            .map(|a| a.teachers.as_slice())
    }

    /// Backup lists, one per session in roster order.
    pub fn backups(&self) -> &[BackupAssignment] {
        &self.backups
    }

    /// Backup teachers of a session (empty if none or unknown).
    pub fn backups_for(&self, session: &str) -> &[String] {
        self.backups
            .iter()
            .find(|b| b.session == session)
            .map(|b| b.teachers.as_slice())
            .unwrap_or(&[])
    }

    /// Load per teacher.
    pub fn load(&self) -> &HashMap<String, usize> {
        &self.load
    }

    /// Load of one teacher.
    pub fn load_of(&self, teacher: &str) -> Option<usize> {
        self.load.get(teacher).copied()
    }

    /// Total number of duties across all teachers.
    pub fn total_duties(&self) -> usize {
        self.load.values().sum()
    }

    /// Room × session distribution grid.
    ///
    /// Rows follow `roster.rooms`, cells follow `roster.sessions`.
    pub fn supervisor_grid(&self, roster: &Roster) -> Vec<GridRow> {
        roster
            .rooms
            .iter()
            .map(|room| GridRow {
                room: room.clone(),
                cells: roster
                    .sessions
                    .iter()
                    .map(|session| {
                        self.supervisors_for(room, session)
                            .map(|teachers| teachers.join(" / "))
                            .unwrap_or_default()
                    })
                    .collect(),
            })
            .collect()
    }

    /// Teachers by load, heaviest first; ties by teacher id.
    pub fn workload_ranking(&self) -> Vec<(&str, usize)> {
        let mut ranking: Vec<(&str, usize)> = self
            .load
            .iter()
            .map(|(teacher, &load)| (teacher.as_str(), load))
            .collect();
        ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranking
    }

    /// Re-checks every hard rule against `roster`.
    ///
    /// Returns an empty list for a valid schedule. Loads are recounted from
    /// the assignments rather than taken from the stored totals.
    pub fn verify(&self, roster: &Roster, backup_ratio: f64) -> Vec<Violation> {
        let plan = DutyPlan::new(roster, backup_ratio);
        let mut violations = Vec::new();

        let mut room_count: HashMap<(&str, &str), usize> = HashMap::new();
        let mut session_count: HashMap<(&str, &str), usize> = HashMap::new();
        let mut recount: HashMap<&str, usize> = HashMap::new();

        for pair in &roster.active_pairs {
            let entity = format!("{}@{}", pair.room, pair.session);
            let teachers = self.supervisors_for(&pair.room, &pair.session).unwrap_or(&[]);

            let mut distinct: Vec<&str> = teachers.iter().map(String::as_str).collect();
            distinct.sort_unstable();
            distinct.dedup();
            if teachers.len() != SUPERVISORS_PER_PAIR || distinct.len() != teachers.len() {
                violations.push(Violation::new(
                    ViolationType::CoverageMismatch,
                    entity,
                    format!(
                        "{} supervisors assigned ({} distinct), expected {}",
                        teachers.len(),
                        distinct.len(),
                        SUPERVISORS_PER_PAIR
                    ),
                    100,
                ));
            }

            for teacher in distinct {
                *room_count.entry((teacher, pair.room.as_str())).or_insert(0) += 1;
                *session_count
                    .entry((teacher, pair.session.as_str()))
                    .or_insert(0) += 1;
                *recount.entry(teacher).or_insert(0) += 1;
            }
        }

        for (idx, session) in roster.sessions.iter().enumerate() {
            let backups = self.backups_for(session);
            for teacher in backups {
                *session_count
                    .entry((teacher.as_str(), session.as_str()))
                    .or_insert(0) += 1;
                *recount.entry(teacher.as_str()).or_insert(0) += 1;
            }

            let quota = plan.backup_quota[idx];
            if backups.len() != quota {
                violations.push(Violation::new(
                    ViolationType::BackupQuotaMismatch,
                    session.as_str(),
                    format!("{} backups assigned, quota is {}", backups.len(), quota),
                    90,
                ));
            }
        }

        for teacher in &roster.teachers {
            for room in &roster.rooms {
                let count = room_count
                    .get(&(teacher.as_str(), room.as_str()))
                    .copied()
                    .unwrap_or(0);
                if count > 1 {
                    violations.push(Violation::new(
                        ViolationType::RoomRepeated,
                        teacher.as_str(),
                        format!("supervises room '{room}' in {count} sessions"),
                        70,
                    ));
                }
            }

            for session in &roster.sessions {
                let count = session_count
                    .get(&(teacher.as_str(), session.as_str()))
                    .copied()
                    .unwrap_or(0);
                if count > 1 {
                    violations.push(Violation::new(
                        ViolationType::DoubleDuty,
                        teacher.as_str(),
                        format!("holds {count} duties in session '{session}'"),
                        95,
                    ));
                }
            }

            let counted = recount.get(teacher.as_str()).copied().unwrap_or(0);
            if self.load_of(teacher) != Some(counted) {
                violations.push(Violation::new(
                    ViolationType::LoadMismatch,
                    teacher.as_str(),
                    format!(
                        "reported load {:?} but {} duties assigned",
                        self.load_of(teacher),
                        counted
                    ),
                    60,
                ));
            }
            if !plan.is_load_within_bounds(counted) {
                let (lo, hi) = plan.load_bounds();
                violations.push(Violation::new(
                    ViolationType::LoadOutOfBounds,
                    teacher.as_str(),
                    format!("load {counted} outside [{lo}, {hi}]"),
                    80,
                ));
            }
        }

        violations
    }
}
