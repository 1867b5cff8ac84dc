//! Catalog fixtures.
//!
//! - [`disjoint_catalog`] - every hazard covered by exactly one distinct indicator
//! - [`dairy_catalog`] - a small catalog extracted from dataset-style rows
//! - [`random_catalog`] - seeded random catalogs for property tests
//!
//! Also provides [`selection_objective`] and [`best_subset`], a reference
//! implementation of the objective that enumerates K-subsets directly instead
//! of going through a linear program.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use welfaresel_config::SelectionConfig;
use welfaresel_core::domain::{
    Catalog, CatalogRow, CategoryKind, EaseLevel, HazardCategory, ImpactLevel,
    IndicatorAttributes, ResourceLevel,
};

/// Indicator ids `I0..I{n}`.
pub fn indicator_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("I{i}")).collect()
}

/// `indicators` penalty-free indicators and `hazards` animal hazards, hazard
/// `Hj` covered only by indicator `Ij`. No consequences.
///
/// # Panics
///
/// Panics if `hazards > indicators`.
pub fn disjoint_catalog(indicators: usize, hazards: usize) -> Catalog {
    assert!(hazards <= indicators, "each hazard needs its own indicator");

    let mut builder = Catalog::builder();
    for id in indicator_ids(indicators) {
        builder = builder.indicator(id, IndicatorAttributes::free());
    }
    for j in 0..hazards {
        builder = builder.hazard(format!("H{j}"), [format!("I{j}")]);
    }
    builder.build().expect("disjoint catalog is valid")
}

/// Dataset rows resembling a dairy cow welfare assessment table.
pub fn dairy_rows() -> Vec<CatalogRow> {
    use EaseLevel::{Difficult, Easy, Moderate};
    use ResourceLevel::{High, Low, Medium};

    let row = |indicator: &str,
               hazard: &str,
               consequence: &str,
               ease: EaseLevel,
               mitigation: EaseLevel,
               resources: ResourceLevel,
               impact: ImpactLevel| CatalogRow {
        indicator: indicator.to_string(),
        hazard: hazard.to_string(),
        consequence: consequence.to_string(),
        ease,
        mitigation,
        resources,
        impact: Some(impact),
    };

    vec![
        row("Lameness", "Hard flooring", "Pain", Easy, Moderate, Low, ImpactLevel::High),
        row("Lameness", "Overcrowding", "Restricted movement", Easy, Difficult, Low, ImpactLevel::High),
        row("Body condition", "Poor nutrition", "Hunger", Easy, Easy, Low, ImpactLevel::Low),
        row("Body condition", "Competition at feeder", "Hunger", Moderate, Moderate, Low, ImpactLevel::Low),
        row("Hock lesions", "Hard flooring", "Pain", Easy, Moderate, Low, ImpactLevel::High),
        row("Hock lesions", "Inadequate bedding", "Resting problems", Easy, Easy, Medium, ImpactLevel::High),
        row("Lying time", "Inadequate bedding", "Resting problems", Difficult, Easy, High, ImpactLevel::High),
        row("Lying time", "Overcrowding", "Resting problems", Difficult, Moderate, High, ImpactLevel::Low),
        row("Avoidance distance", "Rough handling", "Fear", Moderate, Moderate, Medium, ImpactLevel::High),
        row("Mastitis", "Poor hygiene", "Sickness", Moderate, Moderate, Medium, ImpactLevel::High),
        row("Mastitis", "Inadequate bedding", "Sickness", Moderate, Easy, Medium, ImpactLevel::High),
        row("Water provision", "Insufficient water", "Thirst", Easy, Easy, Low, ImpactLevel::High),
    ]
}

/// Catalog extracted from [`dairy_rows`]: 7 indicators, 8 animal hazards,
/// 7 consequences.
pub fn dairy_catalog() -> Catalog {
    Catalog::from_rows(dairy_rows()).expect("dairy rows are valid")
}

/// Shape of a generated catalog.
#[derive(Debug, Clone, Copy)]
pub struct RandomCatalogSpec {
    pub indicators: usize,
    pub hazards: usize,
    pub consequences: usize,
    /// Probability that an indicator covers a category, on top of the one
    /// guaranteed covering indicator.
    pub density: f64,
}

impl Default for RandomCatalogSpec {
    fn default() -> Self {
        Self {
            indicators: 6,
            hazards: 4,
            consequences: 3,
            density: 0.3,
        }
    }
}

/// A reproducible random catalog. Every category has at least one covering
/// indicator; attribute codes are drawn from the ordinal ranges.
pub fn random_catalog(seed: u64, spec: RandomCatalogSpec) -> Catalog {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let ids = indicator_ids(spec.indicators);

    let mut builder = Catalog::builder();
    for id in &ids {
        let ease = EaseLevel::ALL[rng.random_range(0..EaseLevel::ALL.len())];
        let mitigation = EaseLevel::ALL[rng.random_range(0..EaseLevel::ALL.len())];
        let resources = ResourceLevel::ALL[rng.random_range(0..ResourceLevel::ALL.len())];
        builder = builder.indicator(
            id.clone(),
            IndicatorAttributes::from_levels(ease, mitigation, resources),
        );
    }

    let covering = |rng: &mut ChaCha8Rng| -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        set.insert(ids[rng.random_range(0..ids.len())].clone());
        for id in &ids {
            if rng.random_bool(spec.density) {
                set.insert(id.clone());
            }
        }
        set
    };

    for j in 0..spec.hazards {
        builder = builder.hazard(format!("H{j}"), covering(&mut rng));
    }
    for j in 0..spec.consequences {
        builder = builder.consequence(format!("C{j}"), covering(&mut rng));
    }
    builder.build().expect("random catalog is valid")
}

/// Objective of selecting `selected`, computed directly from the catalog.
pub fn selection_objective(catalog: &Catalog, config: &SelectionConfig, selected: &[&str]) -> f64 {
    let reward = |category: &HazardCategory| -> f64 {
        let covered = selected.iter().any(|id| category.is_covered_by(id));
        if !covered {
            return 0.0;
        }
        match category.kind {
            CategoryKind::AnimalHazard => config.weights.hazard,
            CategoryKind::Consequence => config.weights.consequence,
        }
    };

    let rewards: f64 = catalog
        .hazards()
        .iter()
        .chain(catalog.consequences())
        .map(reward)
        .sum();
    let penalties: f64 = selected
        .iter()
        .filter_map(|id| catalog.indicator(id))
        .map(|i| config.penalties.penalty(&i.attributes))
        .sum();
    rewards - penalties
}

/// Best objective over all subsets of exactly `config.target_count`
/// indicators, with one optimal subset. `None` if K exceeds the catalog.
pub fn best_subset(catalog: &Catalog, config: &SelectionConfig) -> Option<(f64, Vec<String>)> {
    let ids: Vec<&str> = catalog.indicators().iter().map(|i| i.id.as_str()).collect();
    let k = config.target_count;
    if k > ids.len() {
        return None;
    }

    let mut best: Option<(f64, Vec<String>)> = None;
    for mask in 0u64..(1u64 << ids.len()) {
        if mask.count_ones() as usize != k {
            continue;
        }
        let subset: Vec<&str> = ids
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << *i) != 0)
            .map(|(_, id)| *id)
            .collect();
        let objective = selection_objective(catalog, config, &subset);
        if best.as_ref().map_or(true, |(b, _)| objective > *b + 1e-9) {
            best = Some((objective, subset.iter().map(|s| s.to_string()).collect()));
        }
    }
    best
}
