//! Model builder: decision variables of the selection program.
//!
//! One binary selection variable per indicator and one binary coverage
//! variable per modeled category. Registration is the only side effect, and
//! it only happens once the whole catalog has been validated.

use std::collections::HashMap;

use tracing::debug;
use welfaresel_config::UncoveredPolicy;
use welfaresel_core::domain::{Catalog, CategoryKind, HazardCategory};
use welfaresel_core::error::ModelConstructionError;
use welfaresel_core::lp::{MilpBackend, VarId};

/// Selection decision of one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionVariable {
    /// Position of the indicator in the catalog.
    pub indicator: usize,
    pub var: VarId,
}

/// Coverage decision of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageVariable {
    pub kind: CategoryKind,
    /// Position of the category among the catalog's categories of `kind`.
    pub category: usize,
    pub var: VarId,
    /// Selection variables of the covering indicators.
    pub covering: Vec<VarId>,
}

impl CoverageVariable {
    /// Returns true if no indicator covers the category.
    pub fn is_orphan(&self) -> bool {
        self.covering.is_empty()
    }
}

/// Variables of one selection program, indexed back to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    selection: Vec<SelectionVariable>,
    coverage: Vec<CoverageVariable>,
    excluded: Vec<(CategoryKind, usize)>,
}

impl SelectionModel {
    /// Registers the model's variables with `backend`.
    ///
    /// Categories without covering indicators are handled per `policy`:
    /// pinned categories keep a variable, excluded ones get none, and
    /// `Reject` fails before anything is registered.
    ///
    /// # Errors
    ///
    /// - [`ModelConstructionError::EmptyModel`] if the catalog has no
    ///   indicators or no category is left to model.
    /// - [`ModelConstructionError::UncoveredCategory`] under `Reject`.
    /// - [`ModelConstructionError::UnknownIndicator`] if a category names an
    ///   indicator the catalog does not contain.
    pub fn build<B: MilpBackend>(
        catalog: &Catalog,
        policy: UncoveredPolicy,
        backend: &mut B,
    ) -> Result<Self, ModelConstructionError> {
        if catalog.indicators().is_empty() {
            return Err(ModelConstructionError::EmptyModel("indicators"));
        }
        if catalog.category_count() == 0 {
            return Err(ModelConstructionError::EmptyModel("hazard categories"));
        }

        let modeled = validate_categories(catalog, policy)?;
        if modeled == 0 {
            return Err(ModelConstructionError::EmptyModel("coverable categories"));
        }

        let mut model = SelectionModel::default();
        let mut by_id: HashMap<&str, VarId> = HashMap::with_capacity(catalog.indicator_count());
        for (idx, indicator) in catalog.indicators().iter().enumerate() {
            let var = backend.add_binary(&format!("select[{}]", indicator.id));
            by_id.insert(indicator.id.as_str(), var);
            model.selection.push(SelectionVariable {
                indicator: idx,
                var,
            });
        }

        for kind in CategoryKind::ALL {
            let prefix = match kind {
                CategoryKind::AnimalHazard => "cover_hazard",
                CategoryKind::Consequence => "cover_consequence",
            };
            for (idx, category) in catalog.categories(kind).iter().enumerate() {
                if category.is_orphan() && policy == UncoveredPolicy::Exclude {
                    model.excluded.push((kind, idx));
                    continue;
                }
                // Membership was checked by validate_categories.
                let covering = category
                    .covering
                    .iter()
                    .filter_map(|id| by_id.get(id.as_str()).copied())
                    .collect();
                let var = backend.add_binary(&format!("{prefix}[{}]", category.id));
                model.coverage.push(CoverageVariable {
                    kind,
                    category: idx,
                    var,
                    covering,
                });
            }
        }

        debug!(
            event = "model_built",
            selection_vars = model.selection.len(),
            coverage_vars = model.coverage.len(),
            excluded = model.excluded.len(),
        );
        Ok(model)
    }

    pub fn selection(&self) -> &[SelectionVariable] {
        &self.selection
    }

    pub fn coverage(&self) -> &[CoverageVariable] {
        &self.coverage
    }

    /// Coverage variables of one kind, in catalog order.
    pub fn coverage_of(&self, kind: CategoryKind) -> impl Iterator<Item = &CoverageVariable> {
        self.coverage.iter().filter(move |c| c.kind == kind)
    }

    /// Categories left out of the model under [`UncoveredPolicy::Exclude`].
    pub fn excluded(&self) -> &[(CategoryKind, usize)] {
        &self.excluded
    }

    /// Total number of registered variables.
    pub fn variable_count(&self) -> usize {
        self.selection.len() + self.coverage.len()
    }
}

// Returns the number of categories that will get a coverage variable.
fn validate_categories(
    catalog: &Catalog,
    policy: UncoveredPolicy,
) -> Result<usize, ModelConstructionError> {
    let mut modeled = 0;
    for kind in CategoryKind::ALL {
        for category in catalog.categories(kind) {
            check_covering(catalog, category)?;
            if !category.is_orphan() {
                modeled += 1;
                continue;
            }
            match policy {
                UncoveredPolicy::Pin => modeled += 1,
                UncoveredPolicy::Exclude => {}
                UncoveredPolicy::Reject => {
                    return Err(ModelConstructionError::UncoveredCategory {
                        kind,
                        category: category.id.clone(),
                    })
                }
            }
        }
    }
    Ok(modeled)
}

fn check_covering(catalog: &Catalog, category: &HazardCategory) -> Result<(), ModelConstructionError> {
    match category
        .covering
        .iter()
        .find(|id| catalog.indicator(id).is_none())
    {
        Some(unknown) => Err(ModelConstructionError::UnknownIndicator {
            kind: category.kind,
            category: category.id.clone(),
            indicator: unknown.clone(),
        }),
        None => Ok(()),
    }
}
