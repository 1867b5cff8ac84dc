//! The immutable indicator catalog.
//!
//! A [`Catalog`] is built once, either from association rows with
//! [`Catalog::from_rows`] or programmatically with [`CatalogBuilder`], and is
//! then only read. Indicators and categories keep first-appearance order.
//!
//! # Examples
//!
//! ```
//! use welfaresel_core::domain::{Catalog, CategoryKind, IndicatorAttributes};
//!
//! let catalog = Catalog::builder()
//!     .indicator("Lameness score", IndicatorAttributes::new(1.0, 2.0, 1.0))
//!     .indicator("Body condition", IndicatorAttributes::new(2.0, 2.0, 2.0))
//!     .hazard("Hard flooring", ["Lameness score"])
//!     .consequence("Pain", ["Lameness score", "Body condition"])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(catalog.indicator_count(), 2);
//! assert_eq!(catalog.categories(CategoryKind::Consequence)[0].covering.len(), 2);
//! ```

use std::collections::{BTreeSet, HashMap};

use super::category::{CategoryKind, HazardCategory};
use super::indicator::{AttributeAccumulator, Indicator, IndicatorAttributes};
use super::ordinal::{EaseLevel, ImpactLevel, ResourceLevel};
use crate::error::{DataMappingError, ModelConstructionError};

/// One (indicator, hazard, consequence) association with its ordinal levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub indicator: String,
    /// Animal hazard identifier; blank means the row names no hazard.
    pub hazard: String,
    /// Consequence identifier; blank means the row names no consequence.
    pub consequence: String,
    pub ease: EaseLevel,
    pub mitigation: EaseLevel,
    pub resources: ResourceLevel,
    pub impact: Option<ImpactLevel>,
}

/// Indicators and coverage targets of one selection problem.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Catalog {
    indicators: Vec<Indicator>,
    hazards: Vec<HazardCategory>,
    consequences: Vec<HazardCategory>,
}

impl Catalog {
    /// Starts building a catalog by hand.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Extracts the catalog from association rows.
    ///
    /// Attributes are averaged over every row of an indicator. A row with a
    /// blank indicator fails; blank hazard or consequence cells only skip
    /// that side of the association.
    pub fn from_rows<I>(rows: I) -> Result<Self, DataMappingError>
    where
        I: IntoIterator<Item = CatalogRow>,
    {
        let mut order: Vec<String> = Vec::new();
        let mut sums: HashMap<String, AttributeAccumulator> = HashMap::new();
        let mut hazards = CategoryTable::new(CategoryKind::AnimalHazard);
        let mut consequences = CategoryTable::new(CategoryKind::Consequence);

        for (idx, row) in rows.into_iter().enumerate() {
            let indicator = row.indicator.trim();
            if indicator.is_empty() {
                return Err(DataMappingError::MissingValue {
                    column: "indicator",
                    row: idx + 1,
                });
            }

            if !sums.contains_key(indicator) {
                order.push(indicator.to_string());
            }
            sums.entry(indicator.to_string()).or_default().record(
                row.ease,
                row.mitigation,
                row.resources,
                row.impact,
            );

            hazards.associate(row.hazard.trim(), indicator);
            consequences.associate(row.consequence.trim(), indicator);
        }

        let indicators = order
            .into_iter()
            .map(|id| {
                let attributes = sums
                    .get(&id)
                    .map(AttributeAccumulator::mean)
                    .unwrap_or_else(IndicatorAttributes::free);
                Indicator::new(id, attributes)
            })
            .collect();

        Ok(Self {
            indicators,
            hazards: hazards.finish(),
            consequences: consequences.finish(),
        })
    }

    /// Candidate indicators in catalog order.
    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn indicator_count(&self) -> usize {
        self.indicators.len()
    }

    /// Looks up an indicator by identifier.
    pub fn indicator(&self, id: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.id == id)
    }

    /// Categories of one kind in catalog order.
    pub fn categories(&self, kind: CategoryKind) -> &[HazardCategory] {
        match kind {
            CategoryKind::AnimalHazard => &self.hazards,
            CategoryKind::Consequence => &self.consequences,
        }
    }

    pub fn hazards(&self) -> &[HazardCategory] {
        &self.hazards
    }

    pub fn consequences(&self) -> &[HazardCategory] {
        &self.consequences
    }

    /// Total number of categories of both kinds.
    pub fn category_count(&self) -> usize {
        self.hazards.len() + self.consequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

// Category ids in first-appearance order with their covering sets.
struct CategoryTable {
    kind: CategoryKind,
    categories: Vec<HazardCategory>,
    positions: HashMap<String, usize>,
}

impl CategoryTable {
    fn new(kind: CategoryKind) -> Self {
        Self {
            kind,
            categories: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn associate(&mut self, category: &str, indicator: &str) {
        if category.is_empty() {
            return;
        }
        let pos = match self.positions.get(category) {
            Some(&pos) => pos,
            None => {
                let pos = self.categories.len();
                self.categories.push(HazardCategory::new(
                    category,
                    self.kind,
                    BTreeSet::<String>::new(),
                ));
                self.positions.insert(category.to_string(), pos);
                pos
            }
        };
        self.categories[pos].covering.insert(indicator.to_string());
    }

    fn finish(self) -> Vec<HazardCategory> {
        self.categories
    }
}

/// Programmatic catalog construction.
///
/// Validation happens in [`build`](Self::build): identifiers must be unique
/// and every covering indicator must be registered.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    indicators: Vec<Indicator>,
    hazards: Vec<HazardCategory>,
    consequences: Vec<HazardCategory>,
}

impl CatalogBuilder {
    /// Registers a candidate indicator.
    pub fn indicator(mut self, id: impl Into<String>, attributes: IndicatorAttributes) -> Self {
        self.indicators.push(Indicator::new(id, attributes));
        self
    }

    /// Registers an animal hazard covered by `covering`.
    pub fn hazard<I, S>(mut self, id: impl Into<String>, covering: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hazards
            .push(HazardCategory::new(id, CategoryKind::AnimalHazard, covering));
        self
    }

    /// Registers a consequence covered by `covering`.
    pub fn consequence<I, S>(mut self, id: impl Into<String>, covering: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consequences
            .push(HazardCategory::new(id, CategoryKind::Consequence, covering));
        self
    }

    pub fn build(self) -> Result<Catalog, ModelConstructionError> {
        let mut seen = BTreeSet::new();
        for indicator in &self.indicators {
            if !seen.insert(indicator.id.as_str()) {
                return Err(ModelConstructionError::Duplicate(
                    "indicator",
                    indicator.id.clone(),
                ));
            }
        }

        for categories in [&self.hazards, &self.consequences] {
            let mut ids = BTreeSet::new();
            for category in categories {
                if !ids.insert(category.id.as_str()) {
                    return Err(ModelConstructionError::Duplicate(
                        "category",
                        category.id.clone(),
                    ));
                }
                let unknown = category
                    .covering
                    .iter()
                    .find(|i| !seen.contains(i.as_str()));
                if let Some(unknown) = unknown {
                    return Err(ModelConstructionError::UnknownIndicator {
                        kind: category.kind,
                        category: category.id.clone(),
                        indicator: unknown.clone(),
                    });
                }
            }
        }

        Ok(Catalog {
            indicators: self.indicators,
            hazards: self.hazards,
            consequences: self.consequences,
        })
    }
}
