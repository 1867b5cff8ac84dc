//! The injected MILP solver capability.

use std::fmt;
use std::time::Duration;

use super::expr::{LinearConstraint, LinearExpr, Sense, VarId};

/// Final verdict of a solve attempt.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TerminalStatus {
    /// Proven best solution.
    Optimal,
    /// A solution was found but optimality was not proven, usually because
    /// a time or iteration budget ran out.
    Feasible,
    Infeasible,
    Unbounded,
    /// The backend failed internally.
    Error(String),
}

impl TerminalStatus {
    /// Returns true if variable values can be read back.
    pub fn has_solution(&self) -> bool {
        matches!(self, TerminalStatus::Optimal | TerminalStatus::Feasible)
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, TerminalStatus::Optimal)
    }
}

impl fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalStatus::Optimal => f.write_str("OPTIMAL"),
            TerminalStatus::Feasible => f.write_str("FEASIBLE"),
            TerminalStatus::Infeasible => f.write_str("INFEASIBLE"),
            TerminalStatus::Unbounded => f.write_str("UNBOUNDED"),
            TerminalStatus::Error(msg) => write!(f, "ERROR ({msg})"),
        }
    }
}

/// A mixed-integer linear solver, reduced to the operations the selection
/// model needs.
///
/// A backend instance holds exactly one model and is solved at most once.
/// Values are only available after [`solve`](Self::solve) returned a status
/// for which [`TerminalStatus::has_solution`] holds.
pub trait MilpBackend {
    /// Registers a binary variable.
    fn add_binary(&mut self, name: &str) -> VarId;

    fn add_constraint(&mut self, constraint: LinearConstraint);

    /// Replaces the objective.
    fn set_objective(&mut self, sense: Sense, objective: LinearExpr);

    /// Requests a wall-clock budget. Returns false if the backend cannot
    /// enforce one.
    fn set_time_limit(&mut self, _limit: Duration) -> bool {
        false
    }

    /// Runs the solve and blocks until a terminal status is reached.
    fn solve(&mut self) -> TerminalStatus;

    /// Status of the last solve, `None` before solving.
    fn status(&self) -> Option<&TerminalStatus>;

    /// Value of `var` in the solution, `None` when no solution exists.
    fn value(&self, var: VarId) -> Option<f64>;

    /// Objective value of the solution, `None` when no solution exists.
    fn objective_value(&self) -> Option<f64>;

    fn variable_name(&self, var: VarId) -> Option<&str>;

    fn variable_count(&self) -> usize;

    fn constraint_count(&self) -> usize;
}

/// Backend-independent bookkeeping for a model under construction.
///
/// Backends that translate into a foreign solver API at solve time can keep
/// their model here and only convert once.
#[derive(Debug, Clone, Default)]
pub struct LinearProgram {
    variables: Vec<String>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
    sense: Sense,
}

impl LinearProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_binary(&mut self, name: &str) -> VarId {
        let id = VarId::new(self.variables.len());
        self.variables.push(name.to_string());
        id
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub fn set_objective(&mut self, sense: Sense, objective: LinearExpr) {
        self.sense = sense;
        self.objective = objective;
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn variable_name(&self, var: VarId) -> Option<&str> {
        self.variables.get(var.index()).map(String::as_str)
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// Returns true if `values` (indexed by variable) meets every constraint.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        self.constraints.iter().all(|c| {
            c.is_satisfied_by(|v| values.get(v.index()).copied().unwrap_or(0.0), tolerance)
        })
    }

    /// Objective value under `values`.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective
            .evaluate(|v| values.get(v.index()).copied().unwrap_or(0.0))
    }
}

/// Outcome of a finished solve: status plus, when available, the values.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedState {
    pub status: TerminalStatus,
    values: Vec<f64>,
    objective: Option<f64>,
}

impl SolvedState {
    /// A solve that produced `values` (indexed by variable).
    pub fn with_values(status: TerminalStatus, values: Vec<f64>, objective: f64) -> Self {
        Self {
            status,
            values,
            objective: Some(objective),
        }
    }

    /// A solve that produced no solution.
    pub fn without_solution(status: TerminalStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective: None,
        }
    }

    pub fn value(&self, var: VarId) -> Option<f64> {
        if !self.status.has_solution() {
            return None;
        }
        self.values.get(var.index()).copied()
    }

    pub fn objective_value(&self) -> Option<f64> {
        if !self.status.has_solution() {
            return None;
        }
        self.objective
    }
}
