//! Invigilation model builder.
//!
//! Translates a [`Roster`] into a [`CpModel`]:
//!
//! | Rule | Constraint |
//! |------|-----------|
//! | Coverage | `Σ_t x[t,p] = 2` for every active pair p |
//! | No room repetition | `Σ_{p in room r} x[t,p] ≤ 1` |
//! | Single duty | `Σ_{p in session s} x[t,p] + b[t,s] ≤ 1` |
//! | Backup quota | `Σ_t b[t,s] = quota(s)` |
//! | Load bounds | `average − 1 ≤ load(t) ≤ average + 1` |
//!
//! Objective: `Σ_t (load(t) − average)²`. With loads bounded to
//! average ± 1 this counts the teachers not exactly at average.
//!
//! Two redundant sums let the solver see staffing shortfalls up front:
//!
//! | Sum | Constraint |
//! |-----|-----------|
//! | Session demand | `Σ_{t, p in s} x[t,p] + Σ_t b[t,s] = 2·pairs(s) + quota(s)` |
//! | Room demand | `Σ_{t, p in r} x[t,p] = 2·pairs(r)` |
//!
//! Combined with single duty and no room repetition, each is capped by
//! the number of teachers.

use std::collections::HashMap;

use tracing::debug;

use super::model::{CpModel, VarId};
use crate::error::{Result, SchedulingError};
use crate::models::{DutyPlan, Roster, DEFAULT_BACKUP_RATIO, SUPERVISORS_PER_PAIR};
use crate::validation::{
    validate_backup_ratio, validate_roster, ValidationError, ValidationErrorKind,
};

/// Indices of an active pair into `Roster::rooms` and `Roster::sessions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairIndex {
    /// Index into `Roster::rooms`.
    pub room: usize,
    /// Index into `Roster::sessions`.
    pub session: usize,
}

/// A built model plus the variable layout needed to read a solution back.
#[derive(Debug, Clone)]
pub struct InvigilationModel {
    /// The cardinality model handed to the solver.
    pub model: CpModel,
    /// Derived quotas and load targets.
    pub plan: DutyPlan,
    pairs: Vec<PairIndex>,
    /// [teacher][pair]
    supervision: Vec<Vec<VarId>>,
    /// [teacher][session]
    backup: Vec<Vec<VarId>>,
}

impl InvigilationModel {
    /// Active pairs in model order (session-major, then room).
    pub fn pairs(&self) -> &[PairIndex] {
        &self.pairs
    }

    /// Supervision variable of teacher `t` on pair `p`.
    pub fn supervision_var(&self, teacher: usize, pair: usize) -> VarId {
        self.supervision[teacher][pair]
    }

    /// Backup variable of teacher `t` in session `s`.
    pub fn backup_var(&self, teacher: usize, session: usize) -> VarId {
        self.backup[teacher][session]
    }
}

/// Builds a [`CpModel`] from a roster.
///
/// # Example
/// ```
/// use u_invigilate::cp::InvigilationCpBuilder;
/// use u_invigilate::models::Roster;
///
/// let roster = Roster::new()
///     .with_teachers(["A", "B", "C"])
///     .with_rooms(["R1"])
///     .with_sessions(["S1"])
///     .with_active_pair("R1", "S1");
///
/// let built = InvigilationCpBuilder::new(&roster).build().unwrap();
/// // 3 supervision + 3 backup variables
/// assert_eq!(built.model.var_count(), 6);
/// assert_eq!(built.plan.backup_quota, vec![1]);
/// ```
pub struct InvigilationCpBuilder<'a> {
    roster: &'a Roster,
    backup_ratio: f64,
}

impl<'a> InvigilationCpBuilder<'a> {
    /// Creates a builder with the default backup ratio (0.2).
    pub fn new(roster: &'a Roster) -> Self {
        Self {
            roster,
            backup_ratio: DEFAULT_BACKUP_RATIO,
        }
    }

    /// Sets the backup ratio.
    pub fn with_backup_ratio(mut self, backup_ratio: f64) -> Self {
        self.backup_ratio = backup_ratio;
        self
    }

    /// Validates the roster and builds the model.
    ///
    /// Structural infeasibility (too few teachers, quotas that cannot be
    /// met) is not checked here; the solver reports it.
    pub fn build(&self) -> Result<InvigilationModel> {
        validate_roster(self.roster)?;
        validate_backup_ratio(self.backup_ratio)?;

        let roster = self.roster;
        let plan = DutyPlan::new(roster, self.backup_ratio);
        let pairs = self.ordered_pairs();
        let mut model = CpModel::new("invigilation");

        let mut supervision = Vec::with_capacity(roster.teachers.len());
        let mut backup = Vec::with_capacity(roster.teachers.len());
        for teacher in &roster.teachers {
            supervision.push(
                pairs
                    .iter()
                    .map(|p| {
                        model.add_bool_var(format!(
                            "x[{teacher}][{}@{}]",
                            roster.rooms[p.room], roster.sessions[p.session]
                        ))
                    })
                    .collect::<Vec<_>>(),
            );
            backup.push(
                roster
                    .sessions
                    .iter()
                    .map(|s| model.add_bool_var(format!("b[{teacher}][{s}]")))
                    .collect::<Vec<_>>(),
            );
        }
        let teachers = 0..roster.teachers.len();
        let per_pair = count(SUPERVISORS_PER_PAIR, "supervisors per pair")?;
        let (lo, hi) = plan.load_bounds();
        let (lo, hi) = (count(lo, "load lower bound")?, count(hi, "load upper bound")?);
        let average = count(plan.average_load, "average load")?;

        // Search-driving constraints, session by session.
        for (s, session) in roster.sessions.iter().enumerate() {
            for (p, pair) in pairs.iter().enumerate().filter(|(_, pair)| pair.session == s) {
                model.add_exactly(
                    format!("cover[{}@{session}]", roster.rooms[pair.room]),
                    teachers.clone().map(|t| supervision[t][p]).collect(),
                    per_pair,
                    true,
                );
            }
            model.add_exactly(
                format!("backup[{session}]"),
                teachers.clone().map(|t| backup[t][s]).collect(),
                count(plan.backup_quota[s], "backup quota")?,
                true,
            );
        }

        for (t, teacher) in roster.teachers.iter().enumerate() {
            for (r, room) in roster.rooms.iter().enumerate() {
                let vars: Vec<VarId> = pair_vars(&pairs, &supervision[t], |p| p.room == r);
                if vars.len() > 1 {
                    model.add_at_most(format!("room-once[{teacher}][{room}]"), vars, 1);
                }
            }

            for (s, session) in roster.sessions.iter().enumerate() {
                let mut vars = pair_vars(&pairs, &supervision[t], |p| p.session == s);
                if vars.is_empty() {
                    continue;
                }
                vars.push(backup[t][s]);
                model.add_at_most(format!("one-duty[{teacher}][{session}]"), vars, 1);
            }

            let duties: Vec<VarId> = supervision[t]
                .iter()
                .chain(backup[t].iter())
                .copied()
                .collect();
            model.add_cardinality(format!("load[{teacher}]"), duties.clone(), lo, hi, false);
            model.add_objective_term(format!("balance[{teacher}]"), duties, average);
        }

        for (s, session) in roster.sessions.iter().enumerate() {
            if plan.rooms_per_session[s] == 0 {
                continue;
            }
            let mut vars = Vec::new();
            for t in teachers.clone() {
                vars.extend(pair_vars(&pairs, &supervision[t], |p| p.session == s));
                vars.push(backup[t][s]);
            }
            let demand = SUPERVISORS_PER_PAIR * plan.rooms_per_session[s] + plan.backup_quota[s];
            model.add_exactly(
                format!("session-demand[{session}]"),
                vars,
                count(demand, "session demand")?,
                false,
            );
        }

        for (r, room) in roster.rooms.iter().enumerate() {
            let in_room = pairs.iter().filter(|p| p.room == r).count();
            if in_room < 2 {
                continue;
            }
            let vars: Vec<VarId> = teachers
                .clone()
                .flat_map(|t| pair_vars(&pairs, &supervision[t], |p| p.room == r))
                .collect();
            model.add_exactly(
                format!("room-demand[{room}]"),
                vars,
                count(SUPERVISORS_PER_PAIR * in_room, "room demand")?,
                false,
            );
        }
        model.set_objective_floor(plan.objective_floor());

        debug!(
            teachers = roster.teachers.len(),
            active_pairs = pairs.len(),
            total_slots = plan.total_slots,
            average_load = plan.average_load,
            vars = model.var_count(),
            constraints = model.constraint_count(),
            "built invigilation model"
        );

        Ok(InvigilationModel {
            model,
            plan,
            pairs,
            supervision,
            backup,
        })
    }

    /// Active pairs as indices, sorted session-major then by room.
    fn ordered_pairs(&self) -> Vec<PairIndex> {
        let rooms: HashMap<&str, usize> = index_of(&self.roster.rooms);
        let sessions: HashMap<&str, usize> = index_of(&self.roster.sessions);

        let mut pairs: Vec<PairIndex> = self
            .roster
            .active_pairs
            .iter()
            .filter_map(|p| {
                Some(PairIndex {
                    room: *rooms.get(p.room.as_str())?,
                    session: *sessions.get(p.session.as_str())?,
                })
            })
            .collect();
        pairs.sort_by_key(|p| (p.session, p.room));
        pairs
    }
}

/// Narrows a derived count to the model's `u32` bounds.
fn count(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        SchedulingError::Validation(vec![ValidationError::new(
            ValidationErrorKind::CountOverflow,
            format!("{what} of {value} exceeds {}", u32::MAX),
        )])
    })
}

fn index_of(ids: &[String]) -> HashMap<&str, usize> {
    ids.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect()
}

fn pair_vars(
    pairs: &[PairIndex],
    teacher_vars: &[VarId],
    keep: impl Fn(&PairIndex) -> bool,
) -> Vec<VarId> {
    pairs
        .iter()
        .zip(teacher_vars)
        .filter(|(p, _)| keep(p))
        .map(|(_, &v)| v)
        .collect()
}
