use std::time::Duration;

use welfaresel_config::{PenaltyWeights, SelectionConfig, UncoveredPolicy};
use welfaresel_core::domain::{Catalog, CategoryKind, IndicatorAttributes};
use welfaresel_core::error::{ModelConstructionError, SelectionError, SolverStatusError};
use welfaresel_core::lp::{Comparison, MilpBackend, TerminalStatus};
use welfaresel_test::{disjoint_catalog, ExhaustiveBackend};

use super::*;

fn zero_penalty_config(target: usize) -> SelectionConfig {
    SelectionConfig::new()
        .with_target_count(target)
        .with_penalty_weights(0.0, 0.0, 0.0)
}

fn shared_catalog() -> Catalog {
    Catalog::builder()
        .indicator("A", IndicatorAttributes::new(1.0, 1.0, 1.0))
        .indicator("B", IndicatorAttributes::new(3.0, 3.0, 3.0))
        .indicator("C", IndicatorAttributes::new(2.0, 1.0, 1.0))
        .hazard("h1", ["A", "B"])
        .hazard("h2", ["B"])
        .consequence("c1", ["A", "C"])
        .build()
        .unwrap()
}

fn orphan_catalog() -> Catalog {
    Catalog::builder()
        .indicator("A", IndicatorAttributes::free())
        .indicator("B", IndicatorAttributes::free())
        .hazard("h1", ["A"])
        .hazard("orphan", std::iter::empty::<&str>())
        .consequence("c1", ["B"])
        .build()
        .unwrap()
}

// Model builder

#[test]
fn test_model_registers_one_variable_per_indicator_and_category() {
    let catalog = shared_catalog();
    let mut backend = ExhaustiveBackend::new();
    let model = SelectionModel::build(&catalog, UncoveredPolicy::Pin, &mut backend).unwrap();

    assert_eq!(model.selection().len(), 3);
    assert_eq!(model.coverage().len(), 3);
    assert_eq!(model.variable_count(), backend.variable_count());
    assert_eq!(model.coverage_of(CategoryKind::AnimalHazard).count(), 2);
    assert_eq!(model.coverage_of(CategoryKind::Consequence).count(), 1);

    let names: Vec<&str> = backend
        .program()
        .variables()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(
        names,
        vec![
            "select[A]",
            "select[B]",
            "select[C]",
            "cover_hazard[h1]",
            "cover_hazard[h2]",
            "cover_consequence[c1]",
        ]
    );
}

#[test]
fn test_model_links_covering_selection_variables() {
    let catalog = shared_catalog();
    let mut backend = ExhaustiveBackend::new();
    let model = SelectionModel::build(&catalog, UncoveredPolicy::Pin, &mut backend).unwrap();

    let h1 = &model.coverage()[0];
    let a = model.selection()[0].var;
    let b = model.selection()[1].var;
    assert_eq!(h1.covering, vec![a, b]);
    assert!(!h1.is_orphan());
}

#[test]
fn test_model_rejects_empty_catalog() {
    let mut backend = ExhaustiveBackend::new();
    let err = SelectionModel::build(&Catalog::default(), UncoveredPolicy::Pin, &mut backend)
        .unwrap_err();

    assert_eq!(err, ModelConstructionError::EmptyModel("indicators"));
    assert_eq!(backend.variable_count(), 0);
}

#[test]
fn test_model_rejects_catalog_without_categories() {
    let catalog = Catalog::builder()
        .indicator("A", IndicatorAttributes::free())
        .build()
        .unwrap();
    let mut backend = ExhaustiveBackend::new();
    let err = SelectionModel::build(&catalog, UncoveredPolicy::Pin, &mut backend).unwrap_err();

    assert_eq!(err, ModelConstructionError::EmptyModel("hazard categories"));
}

#[test]
fn test_model_pins_orphan_category_by_default() {
    let catalog = orphan_catalog();
    let mut backend = ExhaustiveBackend::new();
    let model = SelectionModel::build(&catalog, UncoveredPolicy::Pin, &mut backend).unwrap();

    assert_eq!(model.coverage().len(), 3);
    assert!(model.coverage()[1].is_orphan());
    assert!(model.excluded().is_empty());
}

#[test]
fn test_model_excludes_orphan_category() {
    let catalog = orphan_catalog();
    let mut backend = ExhaustiveBackend::new();
    let model = SelectionModel::build(&catalog, UncoveredPolicy::Exclude, &mut backend).unwrap();

    assert_eq!(model.coverage().len(), 2);
    assert_eq!(model.excluded(), &[(CategoryKind::AnimalHazard, 1)]);
    assert_eq!(backend.variable_count(), 4);
}

#[test]
fn test_model_rejects_orphan_before_registering() {
    let catalog = orphan_catalog();
    let mut backend = ExhaustiveBackend::new();
    let err = SelectionModel::build(&catalog, UncoveredPolicy::Reject, &mut backend).unwrap_err();

    assert_eq!(
        err,
        ModelConstructionError::UncoveredCategory {
            kind: CategoryKind::AnimalHazard,
            category: "orphan".to_string(),
        }
    );
    assert_eq!(backend.variable_count(), 0);
}

#[test]
fn test_model_empty_when_every_category_excluded() {
    let catalog = Catalog::builder()
        .indicator("A", IndicatorAttributes::free())
        .hazard("orphan", std::iter::empty::<&str>())
        .build()
        .unwrap();
    let mut backend = ExhaustiveBackend::new();
    let err = SelectionModel::build(&catalog, UncoveredPolicy::Exclude, &mut backend).unwrap_err();

    assert_eq!(err, ModelConstructionError::EmptyModel("coverable categories"));
}

// Constraint engine

#[test]
fn test_cardinality_sums_every_selection() {
    let catalog = shared_catalog();
    let mut backend = ExhaustiveBackend::new();
    let model = SelectionModel::build(&catalog, UncoveredPolicy::Pin, &mut backend).unwrap();

    let constraint = constraints::cardinality(&model, 2).unwrap();
    assert_eq!(constraint.comparison, Comparison::Equal);
    assert_eq!(constraint.rhs, 2.0);
    assert_eq!(constraint.expr.terms().len(), 3);
    assert_eq!(constraint.name.as_deref(), Some("cardinality"));
}

#[test]
fn test_cardinality_rejects_bad_targets() {
    let catalog = shared_catalog();
    let mut backend = ExhaustiveBackend::new();
    let model = SelectionModel::build(&catalog, UncoveredPolicy::Pin, &mut backend).unwrap();

    assert_eq!(
        constraints::cardinality(&model, 0).unwrap_err(),
        ModelConstructionError::ZeroTarget
    );
    assert_eq!(
        constraints::cardinality(&model, 4).unwrap_err(),
        ModelConstructionError::TargetExceedsCatalog {
            target: 4,
            available: 3
        }
    );
}

#[test]
fn test_coverage_links_are_normalized_pair() {
    let catalog = shared_catalog();
    let mut backend = ExhaustiveBackend::new();
    let model = SelectionModel::build(&catalog, UncoveredPolicy::Pin, &mut backend).unwrap();
    let h1 = &model.coverage()[0];

    let links = constraints::coverage_links(h1);
    assert_eq!(links.len(), 2);

    let upper = &links[0];
    assert_eq!(upper.comparison, Comparison::LessEq);
    assert_eq!(upper.rhs, 0.0);
    assert_eq!(upper.expr.coefficient(h1.var), 1.0);
    for &var in &h1.covering {
        assert_eq!(upper.expr.coefficient(var), -1.0);
    }

    let lower = &links[1];
    assert_eq!(lower.comparison, Comparison::GreaterEq);
    assert_eq!(lower.rhs, 0.0);
    assert_eq!(lower.expr.coefficient(h1.var), 2.0);
    for &var in &h1.covering {
        assert_eq!(lower.expr.coefficient(var), -1.0);
    }
}

#[test]
fn test_coverage_link_pins_orphan() {
    let catalog = orphan_catalog();
    let mut backend = ExhaustiveBackend::new();
    let model = SelectionModel::build(&catalog, UncoveredPolicy::Pin, &mut backend).unwrap();
    let orphan = &model.coverage()[1];

    let links = constraints::coverage_links(orphan);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].comparison, Comparison::Equal);
    assert_eq!(links[0].rhs, 0.0);
    assert_eq!(links[0].expr.coefficient(orphan.var), 1.0);
}

#[test]
fn test_apply_counts_constraints() {
    let catalog = orphan_catalog();
    let mut backend = ExhaustiveBackend::new();
    let model = SelectionModel::build(&catalog, UncoveredPolicy::Pin, &mut backend).unwrap();

    let summary = constraints::apply(&model, 1, &mut backend).unwrap();
    assert_eq!(summary, ConstraintSummary { linked: 2, pinned: 1 });
    assert_eq!(summary.total(), 6);
    assert_eq!(backend.constraint_count(), 6);
}

#[test]
fn test_coverage_equals_or_of_covering_selections() {
    // Force each selection pattern with extra equality constraints and check
    // that the only feasible coverage value is the OR.
    let catalog = shared_catalog();
    for mask in 0u8..8 {
        let mut backend = ExhaustiveBackend::new();
        let model = SelectionModel::build(&catalog, UncoveredPolicy::Pin, &mut backend).unwrap();
        for cover in model.coverage() {
            for link in constraints::coverage_links(cover) {
                backend.add_constraint(link);
            }
        }
        for (i, selection) in model.selection().iter().enumerate() {
            let value = f64::from(mask >> i & 1);
            let fixed = welfaresel_core::lp::LinearExpr::new().with_term(selection.var, 1.0);
            backend.add_constraint(fixed.equals(value));
        }

        assert_eq!(backend.solve(), TerminalStatus::Optimal);
        for cover in model.coverage() {
            let any_selected = cover
                .covering
                .iter()
                .any(|&v| backend.value(v) == Some(1.0));
            let expected = if any_selected { 1.0 } else { 0.0 };
            assert_eq!(backend.value(cover.var), Some(expected), "mask {mask:03b}");
        }
    }
}

// Objective composer

#[test]
fn test_objective_rewards_coverage_and_penalizes_selection() {
    let catalog = shared_catalog();
    let mut backend = ExhaustiveBackend::new();
    let model = SelectionModel::build(&catalog, UncoveredPolicy::Pin, &mut backend).unwrap();
    let config = SelectionConfig::new().with_coverage_weights(2.0, 5.0);

    let objective = objective::compose(&model, &catalog, &config.weights, &config.penalties);

    let a = model.selection()[0].var;
    let b = model.selection()[1].var;
    assert_eq!(objective.coefficient(a), -30.0);
    assert_eq!(objective.coefficient(b), -90.0);
    assert_eq!(objective.coefficient(model.coverage()[0].var), 2.0);
    assert_eq!(objective.coefficient(model.coverage()[2].var), 5.0);
}

#[test]
fn test_coverage_reward_by_kind() {
    let config = SelectionConfig::new().with_coverage_weights(1.5, 0.5);
    assert_eq!(
        objective::coverage_reward(&config.weights, CategoryKind::AnimalHazard),
        1.5
    );
    assert_eq!(
        objective::coverage_reward(&config.weights, CategoryKind::Consequence),
        0.5
    );
}

// Solution extractor

#[test]
fn test_extract_before_solve_is_not_solved() {
    let catalog = shared_catalog();
    let mut backend = ExhaustiveBackend::new();
    let model = SelectionModel::build(&catalog, UncoveredPolicy::Pin, &mut backend).unwrap();

    let err = solution::extract(&model, &catalog, &PenaltyWeights::ZERO, &backend).unwrap_err();
    assert_eq!(err, SolverStatusError::NotSolved);
}

#[test]
fn test_session_solution_before_solve_is_not_solved() {
    let catalog = shared_catalog();
    let session = SelectionSolver::with_backend(zero_penalty_config(1), ExhaustiveBackend::new())
        .build(&catalog)
        .unwrap();

    assert_eq!(session.status(), None);
    assert_eq!(session.solution().unwrap_err(), SolverStatusError::NotSolved);
}

#[test]
fn test_extract_reports_selected_and_covered() {
    let catalog = shared_catalog();
    let config = zero_penalty_config(1);
    let solution = SelectionSolver::with_backend(config, ExhaustiveBackend::new())
        .solve(&catalog)
        .unwrap();

    // B covers both hazards, A covers one hazard and the consequence. Both
    // reach 2; the exhaustive backend keeps the lower assignment, which is B.
    assert_eq!(solution.status, TerminalStatus::Optimal);
    assert_eq!(solution.objective_value, 2.0);
    assert_eq!(solution.selected_ids(), vec!["B"]);
    assert_eq!(solution.covered_hazards, vec!["h1", "h2"]);
    assert!(solution.uncovered_hazards.is_empty());
    assert!(solution.covered_consequences.is_empty());
    assert_eq!(solution.uncovered_consequences, vec!["c1"]);
    assert!(solution.warnings.is_empty());
}

#[test]
fn test_extract_is_idempotent() {
    let catalog = shared_catalog();
    let config = SelectionConfig::new().with_target_count(2);
    let mut session = SelectionSolver::with_backend(config, ExhaustiveBackend::new())
        .build(&catalog)
        .unwrap();
    session.solve().unwrap();

    let first = session.solution().unwrap();
    let second = session.solution().unwrap();
    assert_eq!(first, second);
    assert_eq!(session.backend().solve_calls(), 1);
}

#[test]
fn test_extract_includes_penalties() {
    let catalog = shared_catalog();
    let config = SelectionConfig::new().with_target_count(2);
    let solution = SelectionSolver::with_backend(config, ExhaustiveBackend::new())
        .solve(&catalog)
        .unwrap();

    // A (30) and C (40) are the cheapest pair; together they cover h1 and c1.
    assert_eq!(solution.selected_ids(), vec!["A", "C"]);
    assert_eq!(solution.total_penalty(), 70.0);
    assert_eq!(solution.objective_value, 2.0 - 70.0);
    assert_eq!(solution.selected[1].penalty, 40.0);
}

#[test]
fn test_extract_rejects_fractional_value() {
    use welfaresel_core::lp::{LinearConstraint, LinearExpr, Sense, SolvedState, VarId};

    #[derive(Default)]
    struct Fractional {
        names: Vec<String>,
        solved: Option<SolvedState>,
    }

    impl MilpBackend for Fractional {
        fn add_binary(&mut self, name: &str) -> VarId {
            self.names.push(name.to_string());
            VarId::new(self.names.len() - 1)
        }
        fn add_constraint(&mut self, _constraint: LinearConstraint) {}
        fn set_objective(&mut self, _sense: Sense, _objective: LinearExpr) {}
        fn solve(&mut self) -> TerminalStatus {
            let values = vec![0.5; self.names.len()];
            self.solved = Some(SolvedState::with_values(TerminalStatus::Optimal, values, 0.0));
            TerminalStatus::Optimal
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
            self.names.get(var.index()).map(String::as_str)
        }
        fn variable_count(&self) -> usize {
            self.names.len()
        }
        fn constraint_count(&self) -> usize {
            0
        }
    }

    let catalog = shared_catalog();
    let err = SelectionSolver::with_backend(SelectionConfig::new(), Fractional::default())
        .solve(&catalog);
    // K = 4 exceeds the three indicators.
    assert!(matches!(
        err,
        Err(SelectionError::ModelConstruction(
            ModelConstructionError::TargetExceedsCatalog { .. }
        ))
    ));

    let err = SelectionSolver::with_backend(zero_penalty_config(1), Fractional::default())
        .solve(&catalog)
        .unwrap_err();
    match err {
        SelectionError::SolverStatus(SolverStatusError::NonIntegral { name, value }) => {
            assert_eq!(name, "select[A]");
            assert_eq!(value, 0.5);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_pinned_orphan_reported_uncovered_with_warning() {
    let catalog = orphan_catalog();
    let solution = SelectionSolver::with_backend(zero_penalty_config(2), ExhaustiveBackend::new())
        .solve(&catalog)
        .unwrap();

    assert_eq!(solution.objective_value, 2.0);
    assert_eq!(solution.uncovered_hazards, vec!["orphan"]);
    assert_eq!(
        solution.warnings,
        vec![SolveWarning::UncoveredCategoryPinned {
            kind: CategoryKind::AnimalHazard,
            category: "orphan".to_string(),
        }]
    );
}

#[test]
fn test_excluded_orphan_reported_uncovered_with_warning() {
    let catalog = orphan_catalog();
    let config = zero_penalty_config(2).with_uncovered_policy(UncoveredPolicy::Exclude);
    let solution = SelectionSolver::with_backend(config, ExhaustiveBackend::new())
        .solve(&catalog)
        .unwrap();

    assert_eq!(solution.objective_value, 2.0);
    assert_eq!(solution.covered_hazards, vec!["h1"]);
    assert_eq!(solution.uncovered_hazards, vec!["orphan"]);
    assert!(matches!(
        solution.warnings.as_slice(),
        [SolveWarning::UncoveredCategoryExcluded { .. }]
    ));
}

// Solver orchestration

#[test]
fn test_unproven_solution_is_soft_failure() {
    let catalog = disjoint_catalog(4, 2);
    let backend = ExhaustiveBackend::unproven();
    let solution = SelectionSolver::with_backend(zero_penalty_config(2), backend)
        .solve(&catalog)
        .unwrap();

    assert_eq!(solution.status, TerminalStatus::Feasible);
    assert!(!solution.is_optimal());
    assert_eq!(solution.selected.len(), 2);
    assert_eq!(solution.warnings, vec![SolveWarning::NotProvenOptimal]);
}

#[test]
fn test_backend_error_is_hard_failure() {
    let catalog = disjoint_catalog(4, 2);
    let backend = ExhaustiveBackend::failing("license expired");
    let err = SelectionSolver::with_backend(zero_penalty_config(2), backend)
        .solve(&catalog)
        .unwrap_err();

    match err {
        SelectionError::SolverStatus(SolverStatusError::Backend(msg)) => {
            assert_eq!(msg, "license expired");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_session_solves_once() {
    let catalog = disjoint_catalog(3, 2);
    let mut session = SelectionSolver::with_backend(zero_penalty_config(1), ExhaustiveBackend::new())
        .build(&catalog)
        .unwrap();

    assert_eq!(session.solve().unwrap(), TerminalStatus::Optimal);
    assert_eq!(session.solve().unwrap_err(), SolverStatusError::AlreadySolved);
    assert_eq!(session.into_backend().solve_calls(), 1);
}

#[test]
fn test_time_limit_passed_to_backend() {
    let catalog = disjoint_catalog(3, 2);
    let config = zero_penalty_config(1).with_termination_seconds(5);
    let session = SelectionSolver::with_backend(config, ExhaustiveBackend::new())
        .build(&catalog)
        .unwrap();

    assert_eq!(session.backend().time_limit(), Some(Duration::from_secs(5)));
}

#[test]
fn test_invalid_config_rejected_before_building() {
    let catalog = disjoint_catalog(3, 2);
    let config = SelectionConfig::new().with_penalty_weights(-1.0, 0.0, 0.0);
    let err = SelectionSolver::with_backend(config, ExhaustiveBackend::new())
        .solve(&catalog)
        .unwrap_err();

    assert!(matches!(err, SelectionError::Config(_)));
}

#[test]
fn test_session_exposes_constraint_summary() {
    let catalog = disjoint_catalog(5, 3);
    let session = SelectionSolver::with_backend(zero_penalty_config(2), ExhaustiveBackend::new())
        .build(&catalog)
        .unwrap();

    assert_eq!(session.constraint_summary(), ConstraintSummary { linked: 3, pinned: 0 });
    assert_eq!(session.backend().constraint_count(), 7);
    assert_eq!(session.model().variable_count(), 8);
}
