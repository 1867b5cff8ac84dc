//! Solver invocation.
//!
//! A [`SelectionSolver`] owns one backend and one configuration. Building
//! registers the model with the backend and yields a [`SelectionSession`];
//! the session is solved once and then only read.
//!
//! Logging levels:
//! - **INFO**: Solve start/end with problem scale and status
//! - **DEBUG**: Model and constraint statistics
//! - **WARN**: Unproven optimality, pinned categories, ignored time limits

use tracing::{info, warn};
use welfaresel_config::{ConfigError, SelectionConfig};
use welfaresel_core::domain::Catalog;
use welfaresel_core::error::{SelectionError, SolverStatusError};
use welfaresel_core::lp::{MilpBackend, Sense, TerminalStatus};

use crate::backend::MicroLpBackend;
use crate::constraints::{self, ConstraintSummary};
use crate::model::SelectionModel;
use crate::objective;
use crate::solution::{self, SelectionSolution};

/// Builds and solves the indicator selection program.
///
/// # Example
///
/// ```
/// use welfaresel_config::SelectionConfig;
/// use welfaresel_core::domain::{Catalog, IndicatorAttributes};
/// use welfaresel_solver::SelectionSolver;
///
/// let catalog = Catalog::builder()
///     .indicator("A", IndicatorAttributes::free())
///     .indicator("B", IndicatorAttributes::free())
///     .hazard("h1", ["A"])
///     .hazard("h2", ["A", "B"])
///     .build()
///     .unwrap();
///
/// let config = SelectionConfig::new().with_target_count(1);
/// let solution = SelectionSolver::new(config).solve(&catalog).unwrap();
///
/// assert_eq!(solution.selected_ids(), vec!["A"]);
/// assert_eq!(solution.covered_hazards.len(), 2);
/// ```
#[derive(Debug)]
pub struct SelectionSolver<B = MicroLpBackend> {
    config: SelectionConfig,
    backend: B,
}

impl SelectionSolver<MicroLpBackend> {
    /// Creates a solver on a fresh `microlp` backend.
    pub fn new(config: SelectionConfig) -> Self {
        Self::with_backend(config, MicroLpBackend::new())
    }
}

impl<B: MilpBackend> SelectionSolver<B> {
    /// Creates a solver on an injected backend.
    ///
    /// The backend must be fresh: it receives exactly one model.
    pub fn with_backend(config: SelectionConfig, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Validates the configuration and builds the full program on the
    /// backend: variables, constraints and objective.
    pub fn build(mut self, catalog: &Catalog) -> Result<SelectionSession<'_, B>, SelectionError> {
        self.config.validate().map_err(config_error)?;

        let model = SelectionModel::build(
            catalog,
            self.config.uncovered_categories,
            &mut self.backend,
        )?;
        let summary = constraints::apply(&model, self.config.target_count, &mut self.backend)?;
        let objective = objective::compose(
            &model,
            catalog,
            &self.config.weights,
            &self.config.penalties,
        );
        self.backend.set_objective(Sense::Maximize, objective);

        if let Some(limit) = self.config.time_limit() {
            if !self.backend.set_time_limit(limit) {
                warn!(
                    time_limit_secs = limit.as_secs(),
                    "Backend has no time budget, ignoring configured time limit"
                );
            }
        }

        Ok(SelectionSession {
            catalog,
            config: self.config,
            backend: self.backend,
            model,
            summary,
        })
    }

    /// Builds, solves and extracts in one call.
    ///
    /// A feasible but unproven solution is returned with
    /// [`SolveWarning::NotProvenOptimal`](crate::SolveWarning::NotProvenOptimal)
    /// rather than as an error.
    ///
    /// When several selections tie on the optimal objective value, which one
    /// is returned depends on the backend's search order. Runs on identical
    /// input are not guaranteed to agree on the tie-break.
    pub fn solve(self, catalog: &Catalog) -> Result<SelectionSolution, SelectionError> {
        let mut session = self.build(catalog)?;
        session.solve()?;
        Ok(session.solution()?)
    }
}

/// A built program bound to its catalog and backend.
#[derive(Debug)]
pub struct SelectionSession<'a, B> {
    catalog: &'a Catalog,
    config: SelectionConfig,
    backend: B,
    model: SelectionModel,
    summary: ConstraintSummary,
}

impl<'a, B: MilpBackend> SelectionSession<'a, B> {
    pub fn model(&self) -> &SelectionModel {
        &self.model
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn constraint_summary(&self) -> ConstraintSummary {
        self.summary
    }

    /// Status of the solve, `None` before [`solve`](Self::solve).
    pub fn status(&self) -> Option<&TerminalStatus> {
        self.backend.status()
    }

    /// Runs the single blocking solve.
    ///
    /// # Errors
    ///
    /// - [`SolverStatusError::AlreadySolved`] on a second call.
    /// - [`SolverStatusError::Infeasible`], [`SolverStatusError::Unbounded`]
    ///   or [`SolverStatusError::Backend`] for statuses without a solution.
    pub fn solve(&mut self) -> Result<TerminalStatus, SolverStatusError> {
        if self.backend.status().is_some() {
            return Err(SolverStatusError::AlreadySolved);
        }

        info!(
            event = "solve_start",
            indicator_count = self.catalog.indicator_count(),
            hazard_count = self.catalog.hazards().len(),
            consequence_count = self.catalog.consequences().len(),
            target_count = self.config.target_count,
            variable_count = self.backend.variable_count(),
            constraint_count = self.backend.constraint_count(),
        );

        let status = self.backend.solve();

        match &status {
            TerminalStatus::Optimal => {}
            TerminalStatus::Feasible => {
                warn!(event = "not_optimal", "Solution is feasible but not proven optimal");
            }
            TerminalStatus::Infeasible => {
                info!(event = "solve_end", status = %status);
                return Err(SolverStatusError::Infeasible);
            }
            TerminalStatus::Unbounded => {
                info!(event = "solve_end", status = %status);
                return Err(SolverStatusError::Unbounded);
            }
            TerminalStatus::Error(msg) => {
                info!(event = "solve_end", status = %status);
                return Err(SolverStatusError::Backend(msg.clone()));
            }
        }

        for cover in self.model.coverage().iter().filter(|c| c.is_orphan()) {
            let category = &self.catalog.categories(cover.kind)[cover.category];
            warn!(
                kind = %cover.kind,
                category = %category.id,
                "Category '{}' ({}) has no covering indicator; coverage fixed to 0",
                category.id,
                cover.kind
            );
        }

        info!(
            event = "solve_end",
            status = %status,
            objective = self.backend.objective_value().unwrap_or_default(),
            feasible = status.has_solution(),
        );
        Ok(status)
    }

    /// Extracts the solution; see [`solution::extract`].
    pub fn solution(&self) -> Result<SelectionSolution, SolverStatusError> {
        solution::extract(
            &self.model,
            self.catalog,
            &self.config.penalties,
            &self.backend,
        )
    }

    /// Releases the backend, e.g. to inspect the program it received.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

fn config_error(err: ConfigError) -> SelectionError {
    SelectionError::Config(err.to_string())
}
