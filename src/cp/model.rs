//! Boolean cardinality model.
//!
//! Every invigilation rule is a bound on how many of a set of boolean
//! variables are true, so the model has exactly one constraint shape:
//!
//! ```text
//! min ≤ Σ vars ≤ max
//! ```
//!
//! The objective is a sum of squared deviations `(Σ vars − target)²`,
//! evaluated directly on integer counts. No multiplication constraint or
//! big-M linearization is needed.

/// Index of a boolean variable in a [`CpModel`].
pub type VarId = usize;

/// A boolean decision variable.
#[derive(Debug, Clone)]
pub struct BoolVar {
    /// Debug name.
    pub name: String,
    /// First objective term containing this variable, used for value ordering.
    pub group: Option<usize>,
}

/// `min ≤ Σ vars ≤ max` over boolean variables.
#[derive(Debug, Clone)]
pub struct CardinalityConstraint {
    /// Debug name.
    pub name: String,
    /// Constrained variables.
    pub vars: Vec<VarId>,
    /// Minimum number of true variables.
    pub min: u32,
    /// Maximum number of true variables.
    pub max: u32,
    /// Whether the search branches on this constraint until its minimum is met.
    pub drives_search: bool,
}

/// Objective contribution `(Σ vars − target)²`.
#[derive(Debug, Clone)]
pub struct ObjectiveTerm {
    /// Debug name.
    pub name: String,
    /// Counted variables.
    pub vars: Vec<VarId>,
    /// Desired count.
    pub target: u32,
}

impl ObjectiveTerm {
    /// Squared deviation for a given count.
    #[inline]
    pub fn cost(&self, count: u32) -> u64 {
        let diff = count.abs_diff(self.target) as u64;
        diff * diff
    }

    /// Smallest cost reachable when `fixed` vars are true and `free` undecided.
    #[inline]
    pub fn min_cost(&self, fixed: u32, free: u32) -> u64 {
        if self.target < fixed {
            self.cost(fixed)
        } else if self.target > fixed + free {
            self.cost(fixed + free)
        } else {
            0
        }
    }
}

/// A minimization model over boolean variables.
///
/// # Example
/// ```
/// use u_invigilate::cp::CpModel;
///
/// let mut model = CpModel::new("pick-two");
/// let vars: Vec<_> = (0..3).map(|i| model.add_bool_var(format!("v{i}"))).collect();
/// model.add_exactly("two", vars.clone(), 2, true);
/// model.add_objective_term("prefer-v0", vec![vars[0]], 1);
///
/// assert_eq!(model.var_count(), 3);
/// assert_eq!(model.evaluate(&[true, true, false]), Some(0));
/// assert_eq!(model.evaluate(&[false, true, true]), Some(1));
/// assert_eq!(model.evaluate(&[true, true, true]), None);
/// ```
#[derive(Debug, Clone)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    vars: Vec<BoolVar>,
    constraints: Vec<CardinalityConstraint>,
    objective: Vec<ObjectiveTerm>,
    objective_floor: u64,
}

impl CpModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            constraints: Vec::new(),
            objective: Vec::new(),
            objective_floor: 0,
        }
    }

    /// Adds a boolean variable and returns its index.
    pub fn add_bool_var(&mut self, name: impl Into<String>) -> VarId {
        self.vars.push(BoolVar {
            name: name.into(),
            group: None,
        });
        self.vars.len() - 1
    }

    /// Adds `min ≤ Σ vars ≤ max` and returns the constraint index.
    pub fn add_cardinality(
        &mut self,
        name: impl Into<String>,
        vars: Vec<VarId>,
        min: u32,
        max: u32,
        drives_search: bool,
    ) -> usize {
        self.constraints.push(CardinalityConstraint {
            name: name.into(),
            vars,
            min,
            max,
            drives_search,
        });
        self.constraints.len() - 1
    }

    /// Adds `Σ vars = count`.
    pub fn add_exactly(
        &mut self,
        name: impl Into<String>,
        vars: Vec<VarId>,
        count: u32,
        drives_search: bool,
    ) -> usize {
        self.add_cardinality(name, vars, count, count, drives_search)
    }

    /// Adds `Σ vars ≤ count`.
    pub fn add_at_most(&mut self, name: impl Into<String>, vars: Vec<VarId>, count: u32) -> usize {
        self.add_cardinality(name, vars, 0, count, false)
    }

    /// Adds the objective term `(Σ vars − target)²`.
    pub fn add_objective_term(
        &mut self,
        name: impl Into<String>,
        vars: Vec<VarId>,
        target: u32,
    ) -> usize {
        let term = self.objective.len();
        for &v in &vars {
            self.vars[v].group.get_or_insert(term);
        }
        self.objective.push(ObjectiveTerm {
            name: name.into(),
            vars,
            target,
        });
        term
    }

    /// Declares a known lower bound on the objective.
    ///
    /// A solution reaching it is optimal without exhausting the search.
    pub fn set_objective_floor(&mut self, floor: u64) {
        self.objective_floor = floor;
    }

    /// Known lower bound on the objective.
    pub fn objective_floor(&self) -> u64 {
        self.objective_floor
    }

    /// Variables.
    pub fn vars(&self) -> &[BoolVar] {
        &self.vars
    }

    /// Constraints, in creation order.
    pub fn constraints(&self) -> &[CardinalityConstraint] {
        &self.constraints
    }

    /// Objective terms.
    pub fn objective(&self) -> &[ObjectiveTerm] {
        &self.objective
    }

    /// Number of variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value of a complete assignment, or `None` if it violates a
    /// constraint or has the wrong length.
    pub fn evaluate(&self, values: &[bool]) -> Option<u64> {
        if values.len() != self.vars.len() {
            return None;
        }
        let count = |vars: &[VarId]| vars.iter().filter(|&&v| values[v]).count() as u32;

        let feasible = self.constraints.iter().all(|c| {
            let n = count(&c.vars);
            c.min <= n && n <= c.max
        });
        if !feasible {
            return None;
        }

        Some(self.objective.iter().map(|t| t.cost(count(&t.vars))).sum())
    }
}
