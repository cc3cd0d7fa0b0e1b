//! Solution extraction.
//!
//! Reads solved variable values back into a [`ScheduleResult`]. Loads and
//! the objective are recounted from the values; the builder's plan is only
//! used for the average the objective is measured against.

use std::collections::HashMap;

use super::builder::InvigilationModel;
use super::solver::{CpSolution, SolveStatus};
use crate::models::{
    BackupAssignment, Roster, ScheduleResult, ScheduleStatus, SupervisorAssignment,
};

/// Converts a solver assignment into a schedule.
///
/// Returns `None` when the solution carries no usable assignment
/// (infeasible or timed out).
pub fn extract_schedule(
    roster: &Roster,
    built: &InvigilationModel,
    solution: &CpSolution,
) -> Option<ScheduleResult> {
    let status = match solution.status {
        SolveStatus::Optimal => ScheduleStatus::Optimal,
        SolveStatus::Feasible => ScheduleStatus::Feasible,
        SolveStatus::Infeasible | SolveStatus::Unknown => return None,
    };

    let mut counts = vec![0usize; roster.teachers.len()];

    let supervisors = built
        .pairs()
        .iter()
        .enumerate()
        .map(|(p, pair)| {
            let teachers = roster
                .teachers
                .iter()
                .enumerate()
                .filter(|&(t, _)| solution.value(built.supervision_var(t, p)))
                .map(|(t, teacher)| {
                    counts[t] += 1;
                    teacher.clone()
                })
                .collect();
            SupervisorAssignment {
                room: roster.rooms[pair.room].clone(),
                session: roster.sessions[pair.session].clone(),
                teachers,
            }
        })
        .collect();

    let backups = roster
        .sessions
        .iter()
        .enumerate()
        .map(|(s, session)| {
            let teachers = roster
                .teachers
                .iter()
                .enumerate()
                .filter(|&(t, _)| solution.value(built.backup_var(t, s)))
                .map(|(t, teacher)| {
                    counts[t] += 1;
                    teacher.clone()
                })
                .collect();
            BackupAssignment {
                session: session.clone(),
                teachers,
            }
        })
        .collect();

    let average = built.plan.average_load;
    let objective = counts
        .iter()
        .map(|&load| {
            let diff = load.abs_diff(average) as u64;
            diff * diff
        })
        .sum();

    let load: HashMap<String, usize> = roster.teachers.iter().cloned().zip(counts).collect();

    Some(ScheduleResult::new(
        status,
        objective,
        supervisors,
        backups,
        load,
    ))
}
