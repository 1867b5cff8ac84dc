//! [`MilpBackend`] on top of `good_lp` with the pure-Rust `microlp` solver.

use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use welfaresel_core::lp::{
    Comparison, LinearConstraint, LinearExpr, LinearProgram, MilpBackend, Sense, SolvedState,
    TerminalStatus, VarId,
};

/// Branch-and-bound MILP backend.
///
/// The model is recorded as a [`LinearProgram`] and translated into a
/// `good_lp` problem when [`solve`](MilpBackend::solve) runs. `microlp` has
/// no time budget, so [`set_time_limit`](MilpBackend::set_time_limit) is
/// declined; every successful solve is proven optimal.
#[derive(Debug, Default)]
pub struct MicroLpBackend {
    program: LinearProgram,
    solved: Option<SolvedState>,
}

impl MicroLpBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The model as registered so far.
    pub fn program(&self) -> &LinearProgram {
        &self.program
    }

    fn run(&self) -> SolvedState {
        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = self
            .program
            .variables()
            .iter()
            .map(|name| vars.add(variable().binary().name(name.as_str())))
            .collect();

        let to_expression = |expr: &LinearExpr| -> Expression {
            let mut out: Expression = 0.into();
            for &(var, coefficient) in expr.terms() {
                out += coefficient * handles[var.index()];
            }
            out
        };

        let objective = to_expression(self.program.objective());
        let unsolved = match self.program.sense() {
            Sense::Maximize => vars.maximise(objective),
            Sense::Minimize => vars.minimise(objective),
        };
        let mut problem = unsolved.using(microlp);

        for c in self.program.constraints() {
            let lhs = to_expression(&c.expr);
            let translated = match c.comparison {
                Comparison::LessEq => constraint::leq(lhs, c.rhs),
                Comparison::GreaterEq => constraint::geq(lhs, c.rhs),
                Comparison::Equal => constraint::eq(lhs, c.rhs),
            };
            problem.add_constraint(translated);
        }

        match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = handles.iter().map(|&v| solution.value(v)).collect();
                let objective = self.program.evaluate(&values);
                SolvedState::with_values(TerminalStatus::Optimal, values, objective)
            }
            Err(ResolutionError::Infeasible) => {
                SolvedState::without_solution(TerminalStatus::Infeasible)
            }
            Err(ResolutionError::Unbounded) => {
                SolvedState::without_solution(TerminalStatus::Unbounded)
            }
            Err(other) => SolvedState::without_solution(TerminalStatus::Error(other.to_string())),
        }
    }
}

impl MilpBackend for MicroLpBackend {
    fn add_binary(&mut self, name: &str) -> VarId {
        self.program.add_binary(name)
    }

    fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.program.add_constraint(constraint);
    }

    fn set_objective(&mut self, sense: Sense, objective: LinearExpr) {
        self.program.set_objective(sense, objective);
    }

    fn solve(&mut self) -> TerminalStatus {
        let solved = self.run();
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
