//! A brute-force MILP backend for tests.
//!
//! [`ExhaustiveBackend`] enumerates every 0/1 assignment of the registered
//! variables, keeps the feasible ones and returns the best. It is exact and
//! fully deterministic: among tied optima the assignment with the lowest
//! binary encoding (variable 0 as least significant bit) wins. Only usable for
//! small models.
//!
//! # Example
//!
//! ```
//! use welfaresel_core::lp::{LinearExpr, MilpBackend, Sense, TerminalStatus};
//! use welfaresel_test::ExhaustiveBackend;
//!
//! let mut backend = ExhaustiveBackend::new();
//! let a = backend.add_binary("a");
//! let b = backend.add_binary("b");
//! backend.add_constraint(LinearExpr::sum([a, b]).leq(1.0));
//! backend.set_objective(Sense::Maximize, LinearExpr::new().with_term(a, 1.0).with_term(b, 2.0));
//!
//! assert_eq!(backend.solve(), TerminalStatus::Optimal);
//! assert_eq!(backend.value(b), Some(1.0));
//! assert_eq!(backend.objective_value(), Some(2.0));
//! ```

use std::time::Duration;

use welfaresel_core::lp::{
    LinearConstraint, LinearExpr, LinearProgram, MilpBackend, Sense, SolvedState, TerminalStatus,
    VarId,
};

/// Largest model the backend agrees to enumerate.
pub const MAX_EXHAUSTIVE_VARIABLES: usize = 22;

const FEASIBILITY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Exact,
    // Solve exactly but claim optimality was not proven.
    Unproven,
    Fail(String),
}

/// Deterministic exhaustive-search backend.
#[derive(Debug, Clone)]
pub struct ExhaustiveBackend {
    program: LinearProgram,
    solved: Option<SolvedState>,
    mode: Mode,
    time_limit: Option<Duration>,
    solve_calls: usize,
}

impl ExhaustiveBackend {
    pub fn new() -> Self {
        Self {
            program: LinearProgram::new(),
            solved: None,
            mode: Mode::Exact,
            time_limit: None,
            solve_calls: 0,
        }
    }

    /// A backend whose solves report [`TerminalStatus::Feasible`].
    pub fn unproven() -> Self {
        Self {
            mode: Mode::Unproven,
            ..Self::new()
        }
    }

    /// A backend whose solves fail with [`TerminalStatus::Error`].
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            mode: Mode::Fail(message.into()),
            ..Self::new()
        }
    }

    /// The model as registered so far.
    pub fn program(&self) -> &LinearProgram {
        &self.program
    }

    /// The time limit passed through [`MilpBackend::set_time_limit`].
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Number of times [`MilpBackend::solve`] was called.
    pub fn solve_calls(&self) -> usize {
        self.solve_calls
    }

    fn enumerate(&self) -> SolvedState {
        let n = self.program.variables().len();
        if n > MAX_EXHAUSTIVE_VARIABLES {
            return SolvedState::without_solution(TerminalStatus::Error(format!(
                "{n} variables exceed the exhaustive limit of {MAX_EXHAUSTIVE_VARIABLES}"
            )));
        }

        let mut best: Option<(Vec<f64>, f64)> = None;
        let mut values = vec![0.0; n];
        for mask in 0u64..(1u64 << n) {
            for (i, value) in values.iter_mut().enumerate() {
                *value = if mask & (1 << i) != 0 { 1.0 } else { 0.0 };
            }
            if !self.program.is_feasible(&values, FEASIBILITY_TOLERANCE) {
                continue;
            }
            let objective = self.program.evaluate(&values);
            let improves = match &best {
                None => true,
                Some((_, incumbent)) => match self.program.sense() {
                    Sense::Maximize => objective > *incumbent + FEASIBILITY_TOLERANCE,
                    Sense::Minimize => objective < *incumbent - FEASIBILITY_TOLERANCE,
                },
            };
            if improves {
                best = Some((values.clone(), objective));
            }
        }

        let status = match self.mode {
            Mode::Unproven => TerminalStatus::Feasible,
            _ => TerminalStatus::Optimal,
        };
        match best {
            Some((values, objective)) => SolvedState::with_values(status, values, objective),
            None => SolvedState::without_solution(TerminalStatus::Infeasible),
        }
    }
}

impl Default for ExhaustiveBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MilpBackend for ExhaustiveBackend {
    fn add_binary(&mut self, name: &str) -> VarId {
        self.program.add_binary(name)
    }

    fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.program.add_constraint(constraint);
    }

    fn set_objective(&mut self, sense: Sense, objective: LinearExpr) {
        self.program.set_objective(sense, objective);
    }

    fn set_time_limit(&mut self, limit: Duration) -> bool {
        self.time_limit = Some(limit);
        true
    }

    fn solve(&mut self) -> TerminalStatus {
        self.solve_calls += 1;
        let solved = match &self.mode {
            Mode::Fail(message) => {
                SolvedState::without_solution(TerminalStatus::Error(message.clone()))
            }
            _ => self.enumerate(),
        };
        let status = solved.status.clone();
        self.solved = Some(solved);
        status
    }

    fn status(&self) -> Option<&TerminalStatus> {
        self.solved.as_ref().map(|s| &s.status)
    }

    fn value(&self, var: VarId) -> Option<f64> {
        self.solved.as_ref().and_then(|s| s.value(var))
    }

    fn objective_value(&self) -> Option<f64> {
        self.solved.as_ref().and_then(|s| s.objective_value())
    }

    fn variable_name(&self, var: VarId) -> Option<&str> {
        self.program.variable_name(var)
    }

    fn variable_count(&self) -> usize {
        self.program.variables().len()
    }

    fn constraint_count(&self) -> usize {
        self.program.constraints().len()
    }
}
