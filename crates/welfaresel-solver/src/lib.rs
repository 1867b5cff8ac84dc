//! WelfareSel Solver - the indicator selection program
//!
//! This crate turns a [`Catalog`](welfaresel_core::Catalog) into a binary
//! integer program and solves it:
//! - [`model`]: one selection variable per indicator, one coverage variable
//!   per category
//! - [`constraints`]: exactly K selections, coverage tied to the OR of the
//!   covering selections
//! - [`objective`]: weighted coverage minus weighted indicator cost
//! - [`solution`]: read-only projection of a solved model onto the catalog
//! - [`SelectionSolver`]: the orchestration of the above on a
//!   [`MilpBackend`](welfaresel_core::lp::MilpBackend)
//!
//! [`MicroLpBackend`] is the default backend. Any other
//! `MilpBackend` can be injected with [`SelectionSolver::with_backend`].

pub mod backend;
pub mod constraints;
pub mod model;
pub mod objective;
pub mod solution;
mod solver;

#[cfg(test)]
mod tests;

pub use backend::MicroLpBackend;
pub use constraints::ConstraintSummary;
pub use model::{CoverageVariable, SelectionModel, SelectionVariable};
pub use solution::{SelectedIndicator, SelectionSolution, SolveWarning, INTEGRALITY_TOLERANCE};
pub use solver::{SelectionSession, SelectionSolver};
