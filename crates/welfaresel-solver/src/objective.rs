//! Objective composer.
//!
//! ```text
//! maximize  sum_h w_hazard * cover(h)
//!         + sum_c w_consequence * cover(c)
//!         - sum_i penalty(i) * select(i)
//! ```
//!
//! with `penalty(i) = β·ease(i) + γ·mitigation(i) + δ·resources(i)`. Higher
//! attribute codes mean a costlier indicator, so they lower the objective.

use welfaresel_config::{CoverageWeights, PenaltyWeights};
use welfaresel_core::domain::{Catalog, CategoryKind};
use welfaresel_core::lp::LinearExpr;

use crate::model::SelectionModel;

/// Reward for covering one category of `kind`.
pub fn coverage_reward(weights: &CoverageWeights, kind: CategoryKind) -> f64 {
    match kind {
        CategoryKind::AnimalHazard => weights.hazard,
        CategoryKind::Consequence => weights.consequence,
    }
}

/// Builds the objective expression; the direction is always maximize.
pub fn compose(
    model: &SelectionModel,
    catalog: &Catalog,
    weights: &CoverageWeights,
    penalties: &PenaltyWeights,
) -> LinearExpr {
    let mut objective = LinearExpr::new();

    for cover in model.coverage() {
        objective.add_term(cover.var, coverage_reward(weights, cover.kind));
    }

    let indicators = catalog.indicators();
    for selection in model.selection() {
        let penalty = penalties.penalty(&indicators[selection.indicator].attributes);
        objective.add_term(selection.var, -penalty);
    }

    objective
}
