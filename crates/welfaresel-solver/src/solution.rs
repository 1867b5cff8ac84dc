//! Solution extractor.
//!
//! Reads every variable of a solved model back from the backend and projects
//! the assignment onto the catalog. Extraction only reads, so extracting twice
//! from the same backend state yields identical solutions.

use welfaresel_config::PenaltyWeights;
use welfaresel_core::domain::{Catalog, CategoryKind, IndicatorAttributes};
use welfaresel_core::error::SolverStatusError;
use welfaresel_core::lp::{MilpBackend, TerminalStatus, VarId};

use crate::model::SelectionModel;

/// Maximum distance of a binary variable's value from 0 or 1.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// A selected indicator with the values that drove its penalty.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SelectedIndicator {
    pub id: String,
    pub attributes: IndicatorAttributes,
    pub penalty: f64,
}

/// Non-fatal findings of a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SolveWarning {
    /// The backend found a solution but did not prove it optimal.
    NotProvenOptimal,
    /// An uncovered category was kept with its coverage fixed to 0.
    UncoveredCategoryPinned { kind: CategoryKind, category: String },
    /// An uncovered category was left out of the model.
    UncoveredCategoryExcluded { kind: CategoryKind, category: String },
}

impl std::fmt::Display for SolveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveWarning::NotProvenOptimal => {
                f.write_str("solution is feasible but not proven optimal")
            }
            SolveWarning::UncoveredCategoryPinned { kind, category } => {
                write!(f, "{kind} '{category}' has no covering indicator; coverage fixed to 0")
            }
            SolveWarning::UncoveredCategoryExcluded { kind, category } => {
                write!(f, "{kind} '{category}' has no covering indicator; left out of the model")
            }
        }
    }
}

/// Read-only result of one solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SelectionSolution {
    pub status: TerminalStatus,
    /// Selected indicators in catalog order.
    pub selected: Vec<SelectedIndicator>,
    pub covered_hazards: Vec<String>,
    /// Uncovered hazards; categories left out of the model come last.
    pub uncovered_hazards: Vec<String>,
    pub covered_consequences: Vec<String>,
    pub uncovered_consequences: Vec<String>,
    pub objective_value: f64,
    pub warnings: Vec<SolveWarning>,
}

impl SelectionSolution {
    /// Identifiers of the selected indicators.
    pub fn selected_ids(&self) -> Vec<&str> {
        self.selected.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    /// Covered category identifiers of one kind.
    pub fn covered(&self, kind: CategoryKind) -> &[String] {
        match kind {
            CategoryKind::AnimalHazard => &self.covered_hazards,
            CategoryKind::Consequence => &self.covered_consequences,
        }
    }

    /// Uncovered category identifiers of one kind.
    pub fn uncovered(&self, kind: CategoryKind) -> &[String] {
        match kind {
            CategoryKind::AnimalHazard => &self.uncovered_hazards,
            CategoryKind::Consequence => &self.uncovered_consequences,
        }
    }

    /// Sum of the selected indicators' penalties.
    pub fn total_penalty(&self) -> f64 {
        self.selected.iter().map(|s| s.penalty).sum()
    }
}

/// Extracts the solution of `model` from a solved `backend`.
///
/// # Errors
///
/// - [`SolverStatusError::NotSolved`] before a terminal status exists.
/// - [`SolverStatusError::Infeasible`], [`SolverStatusError::Unbounded`] or
///   [`SolverStatusError::Backend`] when the status carries no solution.
/// - [`SolverStatusError::NonIntegral`] if a variable is not 0 or 1.
pub fn extract<B: MilpBackend>(
    model: &SelectionModel,
    catalog: &Catalog,
    penalties: &PenaltyWeights,
    backend: &B,
) -> Result<SelectionSolution, SolverStatusError> {
    let status = backend.status().ok_or(SolverStatusError::NotSolved)?;
    match status {
        TerminalStatus::Optimal | TerminalStatus::Feasible => {}
        TerminalStatus::Infeasible => return Err(SolverStatusError::Infeasible),
        TerminalStatus::Unbounded => return Err(SolverStatusError::Unbounded),
        TerminalStatus::Error(msg) => return Err(SolverStatusError::Backend(msg.clone())),
    }

    let mut warnings = Vec::new();
    if !status.is_optimal() {
        warnings.push(SolveWarning::NotProvenOptimal);
    }

    let indicators = catalog.indicators();
    let mut selected = Vec::new();
    for selection in model.selection() {
        if read_binary(backend, selection.var)? {
            let indicator = &indicators[selection.indicator];
            selected.push(SelectedIndicator {
                id: indicator.id.clone(),
                attributes: indicator.attributes,
                penalty: penalties.penalty(&indicator.attributes),
            });
        }
    }

    let mut solution = SelectionSolution {
        status: status.clone(),
        selected,
        covered_hazards: Vec::new(),
        uncovered_hazards: Vec::new(),
        covered_consequences: Vec::new(),
        uncovered_consequences: Vec::new(),
        objective_value: 0.0,
        warnings: Vec::new(),
    };

    for cover in model.coverage() {
        let category = &catalog.categories(cover.kind)[cover.category];
        let covered = read_binary(backend, cover.var)?;
        if cover.is_orphan() {
            warnings.push(SolveWarning::UncoveredCategoryPinned {
                kind: cover.kind,
                category: category.id.clone(),
            });
        }
        let (covered_ids, uncovered_ids) = match cover.kind {
            CategoryKind::AnimalHazard => (
                &mut solution.covered_hazards,
                &mut solution.uncovered_hazards,
            ),
            CategoryKind::Consequence => (
                &mut solution.covered_consequences,
                &mut solution.uncovered_consequences,
            ),
        };
        if covered {
            covered_ids.push(category.id.clone());
        } else {
            uncovered_ids.push(category.id.clone());
        }
    }

    for &(kind, idx) in model.excluded() {
        let category = &catalog.categories(kind)[idx];
        warnings.push(SolveWarning::UncoveredCategoryExcluded {
            kind,
            category: category.id.clone(),
        });
        match kind {
            CategoryKind::AnimalHazard => solution.uncovered_hazards.push(category.id.clone()),
            CategoryKind::Consequence => solution.uncovered_consequences.push(category.id.clone()),
        }
    }

    solution.objective_value = backend
        .objective_value()
        .ok_or(SolverStatusError::NotSolved)?;
    solution.warnings = warnings;
    Ok(solution)
}

fn read_binary<B: MilpBackend>(backend: &B, var: VarId) -> Result<bool, SolverStatusError> {
    let value = backend.value(var).ok_or(SolverStatusError::NotSolved)?;
    if value.abs() <= INTEGRALITY_TOLERANCE {
        Ok(false)
    } else if (value - 1.0).abs() <= INTEGRALITY_TOLERANCE {
        Ok(true)
    } else {
        Err(SolverStatusError::NonIntegral {
            name: backend
                .variable_name(var)
                .map(str::to_string)
                .unwrap_or_else(|| var.to_string()),
            value,
        })
    }
}
