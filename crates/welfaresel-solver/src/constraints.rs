//! Constraint engine: cardinality and coverage linking.
//!
//! For a category `c` with covering selection variables `S(c)`, `n = |S(c)|`:
//!
//! ```text
//! (a)  cover(c)     <= sum(S(c))     no coverage without a selected coverer
//! (b)  n * cover(c) >= sum(S(c))     any selected coverer forces coverage
//! ```
//!
//! For binary variables the pair pins `cover(c)` to the logical OR of
//! `S(c)`. Both are emitted in normalized form with every variable on the
//! left: `cover - sum <= 0` and `n * cover - sum >= 0`. A category with
//! `n = 0` gets the single constraint `cover(c) == 0` instead.

use tracing::debug;
use welfaresel_core::error::ModelConstructionError;
use welfaresel_core::lp::{LinearConstraint, LinearExpr, MilpBackend};

use crate::model::{CoverageVariable, SelectionModel};

/// Counts of the constraints added to a backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintSummary {
    /// Coverage-linking pairs.
    pub linked: usize,
    /// Coverage variables fixed to zero.
    pub pinned: usize,
}

impl ConstraintSummary {
    /// Total number of constraints, cardinality included.
    pub fn total(&self) -> usize {
        1 + 2 * self.linked + self.pinned
    }
}

/// `sum(selection) == target`.
///
/// # Errors
///
/// Fails if `target` is zero or exceeds the number of candidate indicators.
pub fn cardinality(
    model: &SelectionModel,
    target: usize,
) -> Result<LinearConstraint, ModelConstructionError> {
    let available = model.selection().len();
    if target == 0 {
        return Err(ModelConstructionError::ZeroTarget);
    }
    if target > available {
        return Err(ModelConstructionError::TargetExceedsCatalog { target, available });
    }

    let expr = LinearExpr::sum(model.selection().iter().map(|s| s.var));
    Ok(expr.equals(target as f64).named("cardinality"))
}

/// Constraints tying `cover` to the OR of its covering selections.
pub fn coverage_links(cover: &CoverageVariable) -> Vec<LinearConstraint> {
    let n = cover.covering.len();
    if n == 0 {
        let pinned = LinearExpr::new().with_term(cover.var, 1.0);
        return vec![pinned.equals(0.0).named(format!("pin[{}]", cover.var))];
    }

    let covering = LinearExpr::sum(cover.covering.iter().copied()).scaled(-1.0);

    let mut upper = LinearExpr::new().with_term(cover.var, 1.0);
    upper.extend(covering.clone());

    let mut lower = LinearExpr::new().with_term(cover.var, n as f64);
    lower.extend(covering);

    vec![
        upper.leq(0.0).named(format!("cover_upper[{}]", cover.var)),
        lower.geq(0.0).named(format!("cover_lower[{}]", cover.var)),
    ]
}

/// Adds the cardinality constraint and every coverage link to `backend`.
pub fn apply<B: MilpBackend>(
    model: &SelectionModel,
    target: usize,
    backend: &mut B,
) -> Result<ConstraintSummary, ModelConstructionError> {
    backend.add_constraint(cardinality(model, target)?);

    let mut summary = ConstraintSummary::default();
    for cover in model.coverage() {
        if cover.is_orphan() {
            summary.pinned += 1;
        } else {
            summary.linked += 1;
        }
        for constraint in coverage_links(cover) {
            backend.add_constraint(constraint);
        }
    }

    debug!(
        event = "constraints_added",
        target_count = target,
        linked = summary.linked,
        pinned = summary.pinned,
        constraint_count = summary.total(),
    );
    Ok(summary)
}
