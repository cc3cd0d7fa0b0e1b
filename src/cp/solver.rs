//! Branch-and-bound solver for cardinality models.
//!
//! # Algorithm
//!
//! Depth-first search over boolean variables with constraint propagation
//! and an undo trail:
//!
//! 1. **Propagate.** A constraint whose true-count reached `max` fixes its
//!    free variables to false; one that needs every free variable to reach
//!    `min` fixes them to true. Over- or under-shoot is a conflict.
//!    A constraint with a positive minimum is also checked against its
//!    *cover*: disjoint slices of its variables that sit inside tighter
//!    constraints (an at-most-one over part of them, say). The slices' caps
//!    bound how many of its variables can still become true.
//! 2. **Bound.** The lower bound is the larger of the model's objective
//!    floor and the sum of each term's smallest reachable cost. Nodes whose
//!    bound cannot beat the incumbent are pruned.
//! 3. **Branch.** The first search-driving constraint still below its
//!    minimum is refined: its free variable with the lowest objective-group
//!    count is set true, then false on backtrack. Ties use a fixed rank
//!    (creation order, or a seeded permutation).
//!
//! The search is anytime: the incumbent is kept throughout and returned as
//! soon as the time budget or node limit is hit.
//!
//! # Reference
//! - Rossi, van Beek, Walsh (2006), "Handbook of Constraint Programming", Ch. 3-4
//! - Land & Doig (1960), "An Automatic Method of Solving Discrete Programming Problems"

use std::cmp::Reverse;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::model::{CpModel, VarId};

/// Nodes explored between wall-clock checks.
const CLOCK_CHECK_INTERVAL: u64 = 256;

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Best objective proven minimal.
    Optimal,
    /// A feasible assignment was found; optimality not proven in time.
    Feasible,
    /// Proven that no assignment satisfies every constraint.
    Infeasible,
    /// Budget expired before any feasible assignment was found.
    Unknown,
}

impl SolveStatus {
    /// Whether a usable assignment exists.
    pub fn is_solution_found(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// Solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Wall-clock budget.
    pub time_limit: Duration,
    /// Maximum number of search nodes. `None` = unlimited.
    pub node_limit: Option<u64>,
    /// Seed for the tie-breaking permutation. `None` = creation order.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(10),
            node_limit: None,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Sets the time budget in whole seconds.
    pub fn with_time_limit_secs(mut self, secs: u64) -> Self {
        self.time_limit = Duration::from_secs(secs);
        self
    }

    /// Sets the node limit.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Sets the tie-breaking seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Search statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverStats {
    /// Search nodes explored.
    pub nodes: u64,
    /// Propagation failures.
    pub conflicts: u64,
    /// Complete assignments reached.
    pub solutions: u64,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Result of a solve.
#[derive(Debug, Clone)]
pub struct CpSolution {
    /// Solve outcome.
    pub status: SolveStatus,
    /// Variable values of the best assignment (empty if none was found).
    pub values: Vec<bool>,
    /// Objective of the best assignment.
    pub objective: Option<u64>,
    /// Search statistics.
    pub stats: SolverStats,
}

impl CpSolution {
    /// Whether a usable assignment exists.
    pub fn is_solution_found(&self) -> bool {
        self.status.is_solution_found()
    }

    /// Value of a variable; false when no solution was found.
    pub fn value(&self, var: VarId) -> bool {
        self.values.get(var).copied().unwrap_or(false)
    }
}

/// A solver for [`CpModel`]s.
pub trait CpSolver {
    /// Searches `model` within the limits of `config`.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}

/// Depth-first branch and bound with cardinality propagation.
///
/// # Example
/// ```
/// use u_invigilate::cp::{BranchAndBoundSolver, CpModel, CpSolver, SolveStatus, SolverConfig};
///
/// let mut model = CpModel::new("pick-one");
/// let a = model.add_bool_var("a");
/// let b = model.add_bool_var("b");
/// model.add_exactly("one", vec![a, b], 1, true);
/// model.add_objective_term("want-b", vec![b], 1);
///
/// let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
/// assert_eq!(solution.status, SolveStatus::Optimal);
/// assert_eq!(solution.objective, Some(0));
/// assert!(solution.value(b));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBoundSolver;

impl BranchAndBoundSolver {
    /// Creates a new solver.
    pub fn new() -> Self {
        Self
    }
}

impl CpSolver for BranchAndBoundSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        debug!(
            model = %model.name,
            vars = model.var_count(),
            constraints = model.constraint_count(),
            time_limit_ms = config.time_limit.as_millis() as u64,
            "starting branch and bound"
        );
        let mut search = Search::new(model, config);
        let outcome = search.run();
        let solution = search.finish(outcome);
        debug!(
            status = ?solution.status,
            objective = ?solution.objective,
            nodes = solution.stats.nodes,
            conflicts = solution.stats.conflicts,
            elapsed_ms = solution.stats.elapsed.as_millis() as u64,
            "branch and bound finished"
        );
        solution
    }
}

/// Why the search loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Whole tree explored.
    Exhausted,
    /// Incumbent reached the objective floor.
    FloorReached,
    /// Time or node budget hit.
    Interrupted,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    trail_len: usize,
    var: VarId,
    value: bool,
    retried: bool,
}

struct Search<'m> {
    model: &'m CpModel,
    value: Vec<Option<bool>>,
    /// var → constraints containing it
    watch: Vec<Vec<usize>>,
    /// var → objective terms containing it
    terms_of: Vec<Vec<usize>>,
    ctr_true: Vec<u32>,
    ctr_free: Vec<u32>,
    term_true: Vec<u32>,
    term_free: Vec<u32>,
    demand: Vec<usize>,
    /// constraint → cover groups
    covers: Vec<Vec<usize>>,
    /// var → cover groups containing it
    groups_of: Vec<Vec<usize>>,
    group_cap: Vec<u32>,
    /// group → vars not fixed to false
    group_open: Vec<u32>,
    rank: Vec<usize>,
    trail: Vec<VarId>,
    queue: Vec<usize>,
    queued: Vec<bool>,
    best: Option<(Vec<bool>, u64)>,
    stats: SolverStats,
    started: Instant,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
}

impl<'m> Search<'m> {
    fn new(model: &'m CpModel, config: &SolverConfig) -> Self {
        let n = model.var_count();
        let mut watch = vec![Vec::new(); n];
        let mut ctr_free = Vec::with_capacity(model.constraint_count());
        let mut demand = Vec::new();
        for (c, con) in model.constraints().iter().enumerate() {
            for &v in &con.vars {
                watch[v].push(c);
            }
            ctr_free.push(con.vars.len() as u32);
            if con.drives_search {
                demand.push(c);
            }
        }

        let mut terms_of = vec![Vec::new(); n];
        let mut term_free = Vec::with_capacity(model.objective().len());
        for (t, term) in model.objective().iter().enumerate() {
            for &v in &term.vars {
                terms_of[v].push(t);
            }
            term_free.push(term.vars.len() as u32);
        }

        let cover = build_cover(model, &watch);
        let mut groups_of = vec![Vec::new(); n];
        for (g, members) in cover.members.iter().enumerate() {
            for &v in members {
                groups_of[v].push(g);
            }
        }
        let group_open = cover.members.iter().map(|m| m.len() as u32).collect();

        let mut rank: Vec<usize> = (0..n).collect();
        if let Some(seed) = config.seed {
            let mut rng = StdRng::seed_from_u64(seed);
            rank.shuffle(&mut rng);
        }

        let started = Instant::now();
        Self {
            model,
            value: vec![None; n],
            watch,
            terms_of,
            ctr_true: vec![0; model.constraint_count()],
            ctr_free,
            term_true: vec![0; model.objective().len()],
            term_free,
            demand,
            covers: cover.by_constraint,
            groups_of,
            group_cap: cover.cap,
            group_open,
            rank,
            trail: Vec::with_capacity(n),
            queue: Vec::new(),
            queued: vec![false; model.constraint_count()],
            best: None,
            stats: SolverStats::default(),
            started,
            deadline: started.checked_add(config.time_limit),
            node_limit: config.node_limit,
        }
    }

    fn run(&mut self) -> Outcome {
        for c in 0..self.model.constraint_count() {
            self.queue.push(c);
            self.queued[c] = true;
        }
        if !self.propagate() {
            return Outcome::Exhausted;
        }

        let mut stack: Vec<Frame> = Vec::new();
        loop {
            if self.out_of_budget() {
                return Outcome::Interrupted;
            }
            self.stats.nodes += 1;

            if !self.can_prune() {
                match self.select_branch() {
                    None => {
                        if self.record_solution() {
                            return Outcome::FloorReached;
                        }
                    }
                    Some((var, value)) => {
                        stack.push(Frame {
                            trail_len: self.trail.len(),
                            var,
                            value,
                            retried: false,
                        });
                        self.assign(var, value);
                        if self.propagate() {
                            continue;
                        }
                        self.stats.conflicts += 1;
                    }
                }
            }

            // Backtrack to the deepest untried alternative.
            loop {
                let Some(frame) = stack.pop() else {
                    return Outcome::Exhausted;
                };
                self.undo_to(frame.trail_len);
                if frame.retried {
                    continue;
                }
                stack.push(Frame {
                    value: !frame.value,
                    retried: true,
                    ..frame
                });
                self.assign(frame.var, !frame.value);
                if self.propagate() {
                    break;
                }
                self.stats.conflicts += 1;
            }
        }
    }

    fn finish(mut self, outcome: Outcome) -> CpSolution {
        self.stats.elapsed = self.started.elapsed();
        let status = match (outcome, self.best.is_some()) {
            (Outcome::Exhausted | Outcome::FloorReached, true) => SolveStatus::Optimal,
            (Outcome::Interrupted, true) => SolveStatus::Feasible,
            (Outcome::Interrupted, false) => SolveStatus::Unknown,
            (_, false) => SolveStatus::Infeasible,
        };
        let (values, objective) = match self.best {
            Some((values, objective)) => (values, Some(objective)),
            None => (Vec::new(), None),
        };
        CpSolution {
            status,
            values,
            objective,
            stats: self.stats,
        }
    }

    fn out_of_budget(&self) -> bool {
        if self.node_limit.is_some_and(|limit| self.stats.nodes >= limit) {
            return true;
        }
        self.stats.nodes % CLOCK_CHECK_INTERVAL == 0
            && self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn assign(&mut self, var: VarId, value: bool) {
        self.value[var] = Some(value);
        self.trail.push(var);
        for &c in &self.watch[var] {
            self.ctr_free[c] -= 1;
            if value {
                self.ctr_true[c] += 1;
            }
            if !self.queued[c] {
                self.queued[c] = true;
                self.queue.push(c);
            }
        }
        for &t in &self.terms_of[var] {
            self.term_free[t] -= 1;
            if value {
                self.term_true[t] += 1;
            }
        }
        if !value {
            for &g in &self.groups_of[var] {
                self.group_open[g] -= 1;
            }
        }
    }

    fn undo_to(&mut self, trail_len: usize) {
        while self.trail.len() > trail_len {
            let Some(var) = self.trail.pop() else { break };
            let was_true = self.value[var] == Some(true);
            if !was_true {
                for &g in &self.groups_of[var] {
                    self.group_open[g] += 1;
                }
            }
            self.value[var] = None;
            for &c in &self.watch[var] {
                self.ctr_free[c] += 1;
                if was_true {
                    self.ctr_true[c] -= 1;
                }
            }
            for &t in &self.terms_of[var] {
                self.term_free[t] += 1;
                if was_true {
                    self.term_true[t] -= 1;
                }
            }
        }
    }

    /// Runs queued constraints to fixpoint. Returns false on conflict.
    fn propagate(&mut self) -> bool {
        let model = self.model;
        while let Some(c) = self.queue.pop() {
            self.queued[c] = false;
            let con = &model.constraints()[c];
            let fixed = self.ctr_true[c];
            let free = self.ctr_free[c];

            if fixed > con.max || fixed + free < con.min || self.cover_capacity(c) < con.min {
                trace!(constraint = %con.name, fixed, free, "conflict");
                for c in self.queue.drain(..) {
                    self.queued[c] = false;
                }
                return false;
            }
            if free == 0 {
                continue;
            }

            let forced = if fixed == con.max {
                false
            } else if fixed + free == con.min {
                true
            } else {
                continue;
            };
            for &v in &con.vars {
                if self.value[v].is_none() {
                    self.assign(v, forced);
                }
            }
        }
        true
    }

    /// Upper bound on how many vars of constraint `c` can end up true.
    fn cover_capacity(&self, c: usize) -> u32 {
        let groups = &self.covers[c];
        if groups.is_empty() {
            return u32::MAX;
        }
        groups
            .iter()
            .map(|&g| self.group_cap[g].min(self.group_open[g]))
            .sum()
    }

    fn lower_bound(&self) -> u64 {
        let terms: u64 = self
            .model
            .objective()
            .iter()
            .enumerate()
            .map(|(t, term)| term.min_cost(self.term_true[t], self.term_free[t]))
            .sum();
        terms.max(self.model.objective_floor())
    }

    fn can_prune(&self) -> bool {
        self.best
            .as_ref()
            .is_some_and(|(_, best)| self.lower_bound() >= *best)
    }

    fn group_count(&self, var: VarId) -> u32 {
        self.model.vars()[var]
            .group
            .map_or(0, |term| self.term_true[term])
    }

    /// Next decision: a free variable and the value to try first.
    fn select_branch(&self) -> Option<(VarId, bool)> {
        let constraints = self.model.constraints();
        for &c in &self.demand {
            if self.ctr_true[c] >= constraints[c].min {
                continue;
            }
            let pick = constraints[c]
                .vars
                .iter()
                .copied()
                .filter(|&v| self.value[v].is_none())
                .min_by_key(|&v| (self.group_count(v), self.rank[v]));
            if let Some(var) = pick {
                return Some((var, true));
            }
        }
        // Variables outside every search-driving constraint default to false.
        self.value
            .iter()
            .position(Option::is_none)
            .map(|var| (var, false))
    }

    /// Stores the current complete assignment if it improves the incumbent.
    /// Returns true when the objective floor has been reached.
    fn record_solution(&mut self) -> bool {
        self.stats.solutions += 1;
        let objective: u64 = self
            .model
            .objective()
            .iter()
            .enumerate()
            .map(|(t, term)| term.cost(self.term_true[t]))
            .sum();

        if self.best.as_ref().map_or(true, |(_, best)| objective < *best) {
            debug!(
                objective,
                nodes = self.stats.nodes,
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                "new incumbent"
            );
            let values = self.value.iter().map(|v| *v == Some(true)).collect();
            self.best = Some((values, objective));
        }
        objective <= self.model.objective_floor()
    }
}

/// Cover groups of every constraint with a positive minimum.
///
/// A group is a disjoint slice of the constraint's variables that lies
/// inside another constraint whose `max` is below the slice size, so at
/// most `max` of them can be true. Variables without such a constraint
/// form singleton groups of cap 1. Constraints where no group tightens
/// anything get no cover.
struct Cover {
    by_constraint: Vec<Vec<usize>>,
    members: Vec<Vec<VarId>>,
    cap: Vec<u32>,
}

fn build_cover(model: &CpModel, watch: &[Vec<usize>]) -> Cover {
    let constraints = model.constraints();
    let mut cover = Cover {
        by_constraint: vec![Vec::new(); constraints.len()],
        members: Vec::new(),
        cap: Vec::new(),
    };

    for (c, con) in constraints.iter().enumerate() {
        if con.min == 0 {
            continue;
        }
        let inside: HashSet<VarId> = con.vars.iter().copied().collect();
        let mut covered: HashSet<VarId> = HashSet::new();
        let mut groups: Vec<(Vec<VarId>, u32)> = Vec::new();
        let mut tightened = false;

        for &v in &con.vars {
            if covered.contains(&v) {
                continue;
            }
            // Tightest cap first, then the widest slice.
            let best = watch[v]
                .iter()
                .filter(|&&k| k != c)
                .filter_map(|&k| {
                    let shared: Vec<VarId> = constraints[k]
                        .vars
                        .iter()
                        .copied()
                        .filter(|u| inside.contains(u) && !covered.contains(u))
                        .collect();
                    (constraints[k].max < shared.len() as u32).then_some((constraints[k].max, shared))
                })
                .min_by_key(|(max, shared)| (*max, Reverse(shared.len())));

            let (members, cap) = match best {
                Some((max, shared)) => {
                    tightened = true;
                    (shared, max)
                }
                None => (vec![v], 1),
            };
            covered.extend(members.iter().copied());
            groups.push((members, cap));
        }

        if !tightened {
            continue;
        }
        for (members, cap) in groups {
            cover.by_constraint[c].push(cover.cap.len());
            cover.members.push(members);
            cover.cap.push(cap);
        }
    }
    cover
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn pick_one_model() -> CpModel {
        let mut model = CpModel::new("pick-one");
        let a = model.add_bool_var("a");
        let b = model.add_bool_var("b");
        model.add_exactly("one", vec![a, b], 1, true);
        model.add_objective_term("want-b", vec![b], 1);
        model
    }

    #[test]
    fn test_optimal_after_improvement() {
        let solution = BranchAndBoundSolver::new().solve(&pick_one_model(), &SolverConfig::default());
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_eq!(solution.values, vec![false, true]);
        assert_eq!(solution.objective, Some(0));
        // a=true is tried first, then improved
        assert_eq!(solution.stats.solutions, 2);
    }

    #[test]
    fn test_node_limit_returns_incumbent() {
        let config = SolverConfig::default().with_node_limit(2);
        let solution = BranchAndBoundSolver::new().solve(&pick_one_model(), &config);
        assert_eq!(solution.status, SolveStatus::Feasible);
        assert_eq!(solution.values, vec![true, false]);
        assert_eq!(solution.objective, Some(1));
    }

    #[test]
    fn test_unknown_without_incumbent() {
        let config = SolverConfig::default().with_node_limit(0);
        let solution = BranchAndBoundSolver::new().solve(&pick_one_model(), &config);
        assert_eq!(solution.status, SolveStatus::Unknown);
        assert!(!solution.is_solution_found());
        assert!(solution.values.is_empty());
        assert!(!solution.value(0));
    }

    #[test]
    fn test_zero_time_limit_interrupts() {
        let config = SolverConfig {
            time_limit: Duration::ZERO,
            ..SolverConfig::default()
        };
        let solution = BranchAndBoundSolver::new().solve(&pick_one_model(), &config);
        assert_eq!(solution.status, SolveStatus::Unknown);
    }

    #[test]
    fn test_root_conflict_is_infeasible() {
        let mut model = CpModel::new("too-few");
        let a = model.add_bool_var("a");
        model.add_exactly("two", vec![a], 2, true);
        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolveStatus::Infeasible);
        assert_eq!(solution.stats.nodes, 0);
    }

    #[test]
    fn test_search_proves_infeasible() {
        // Pigeonhole: 3 items, each exactly one of 2 slots, slots hold at most 1.
        let mut model = CpModel::new("pigeonhole");
        let x: Vec<Vec<VarId>> = (0..3)
            .map(|i| (0..2).map(|j| model.add_bool_var(format!("x{i}{j}"))).collect())
            .collect();
        for (i, row) in x.iter().enumerate() {
            model.add_exactly(format!("item{i}"), row.clone(), 1, true);
        }
        for j in 0..2 {
            model.add_at_most(format!("slot{j}"), x.iter().map(|row| row[j]).collect(), 1);
        }
        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolveStatus::Infeasible);
        assert!(solution.stats.conflicts > 0);
    }

    #[test]
    fn test_floor_stops_search() {
        let mut model = pick_one_model();
        model.set_objective_floor(1);
        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
        // First solution meets the declared floor
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_eq!(solution.objective, Some(1));
        assert_eq!(solution.stats.solutions, 1);
    }

    /// `rows × cols` vars with at most one true per row.
    fn rows_at_most_one(model: &mut CpModel, rows: usize, cols: usize) -> Vec<Vec<VarId>> {
        let grid: Vec<Vec<VarId>> = (0..rows)
            .map(|r| (0..cols).map(|c| model.add_bool_var(format!("x{r}{c}"))).collect())
            .collect();
        for (r, row) in grid.iter().enumerate() {
            model.add_at_most(format!("row{r}"), row.clone(), 1);
        }
        grid
    }

    #[test]
    fn test_cover_detects_demand_over_capacity() {
        // 3 needed, but 2 rows can give one each
        let mut model = CpModel::new("demand");
        let grid = rows_at_most_one(&mut model, 2, 3);
        model.add_exactly("need", grid.concat(), 3, false);

        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolveStatus::Infeasible);
        assert_eq!(solution.stats.nodes, 0);
    }

    #[test]
    fn test_cover_detects_load_above_row_count() {
        // A load of at least 3 over 2 at-most-one rows
        let mut model = CpModel::new("load");
        let grid = rows_at_most_one(&mut model, 2, 4);
        model.add_cardinality("load", grid.concat(), 3, 4, false);

        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolveStatus::Infeasible);
        assert_eq!(solution.stats.nodes, 0);
    }

    #[test]
    fn test_cover_prunes_during_search() {
        // Trying `a` first empties row 0; the cover rejects that at once.
        let mut model = CpModel::new("prune");
        let grid = rows_at_most_one(&mut model, 3, 2);
        let a = model.add_bool_var("a");
        let b = model.add_bool_var("b");
        model.add_exactly("pick", vec![a, b], 1, true);
        model.add_exactly("need", grid.concat(), 3, true);
        model.add_at_most("kill", vec![a, grid[0][0], grid[0][1]], 1);

        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert!(!solution.value(a));
        assert!(solution.value(b));
        assert_eq!(solution.stats.conflicts, 1);
        assert_eq!(model.evaluate(&solution.values), Some(0));
    }

    #[test]
    fn test_cover_keeps_feasible_models() {
        let mut model = CpModel::new("fits");
        let grid = rows_at_most_one(&mut model, 3, 3);
        model.add_exactly("need", grid.concat(), 3, true);

        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_eq!(model.evaluate(&solution.values), Some(0));
    }

    #[test]
    fn test_wall_clock_budget_stops_search() {
        // 14 items into 13 slots: no propagation shortcut, exponential search
        let mut model = CpModel::new("pigeonhole");
        let x: Vec<Vec<VarId>> = (0..14)
            .map(|i| (0..13).map(|j| model.add_bool_var(format!("x{i}_{j}"))).collect())
            .collect();
        for (i, row) in x.iter().enumerate() {
            model.add_exactly(format!("item{i}"), row.clone(), 1, true);
        }
        for j in 0..13 {
            model.add_at_most(format!("slot{j}"), x.iter().map(|row| row[j]).collect(), 1);
        }

        let config = SolverConfig::default().with_time_limit_secs(1);
        let started = Instant::now();
        let solution = BranchAndBoundSolver::new().solve(&model, &config);
        let elapsed = started.elapsed();

        assert_eq!(solution.status, SolveStatus::Unknown);
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");
    }

    #[test]
    fn test_unconstrained_vars_default_false() {
        let mut model = CpModel::new("free");
        model.add_bool_var("a");
        model.add_bool_var("b");
        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_eq!(solution.values, vec![false, false]);
    }

    #[test]
    fn test_deterministic_with_and_without_seed() {
        let model = random_model(&mut StdRng::seed_from_u64(7), 10);
        let solver = BranchAndBoundSolver::new();

        let config = SolverConfig::default();
        let a = solver.solve(&model, &config);
        let b = solver.solve(&model, &config);
        assert_eq!(a.values, b.values);

        let seeded = SolverConfig::default().with_seed(99);
        let c = solver.solve(&model, &seeded);
        let d = solver.solve(&model, &seeded);
        assert_eq!(c.values, d.values);
        assert_eq!(a.status, c.status);
        assert_eq!(a.objective, c.objective);
    }

    /// Random cardinality model over `n` variables.
    fn random_model<R: Rng>(rng: &mut R, n: usize) -> CpModel {
        let mut model = CpModel::new("random");
        let vars: Vec<VarId> = (0..n).map(|i| model.add_bool_var(format!("v{i}"))).collect();
        for c in 0..4 {
            let members: Vec<VarId> = vars.iter().copied().filter(|_| rng.random_bool(0.5)).collect();
            let len = members.len() as u32;
            let min = rng.random_range(0..=len);
            let max = rng.random_range(min..=len);
            model.add_cardinality(format!("c{c}"), members, min, max, c % 2 == 0);
        }
        for t in 0..3 {
            let members: Vec<VarId> = vars.iter().copied().filter(|_| rng.random_bool(0.4)).collect();
            let target = rng.random_range(0..=members.len() as u32);
            model.add_objective_term(format!("t{t}"), members, target);
        }
        model
    }

    fn brute_force(model: &CpModel) -> Option<u64> {
        let n = model.var_count();
        (0u32..(1 << n))
            .filter_map(|mask| {
                let values: Vec<bool> = (0..n).map(|i| mask & (1 << i) != 0).collect();
                model.evaluate(&values)
            })
            .min()
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        let solver = BranchAndBoundSolver::new();
        for _ in 0..50 {
            let model = random_model(&mut rng, 10);
            let expected = brute_force(&model);
            let solution = solver.solve(&model, &SolverConfig::default());

            match expected {
                Some(best) => {
                    assert_eq!(solution.status, SolveStatus::Optimal);
                    assert_eq!(solution.objective, Some(best));
                    assert_eq!(model.evaluate(&solution.values), Some(best));
                }
                None => assert_eq!(solution.status, SolveStatus::Infeasible),
            }
        }
    }
}
