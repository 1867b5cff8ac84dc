//! Candidate indicators and their cost attributes.

use super::ordinal::{EaseLevel, ImpactLevel, ResourceLevel};

/// Mean cost attributes of an indicator.
///
/// Each value is the mean ordinal code (1..=3) over every dataset row that
/// references the indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndicatorAttributes {
    /// Mean ease-of-use code.
    pub ease: f64,
    /// Mean ease-of-hazard-mitigation code.
    pub mitigation: f64,
    /// Mean resource-requirement code.
    pub resources: f64,
    /// Mean hazard impact code, when the dataset records it.
    pub impact: Option<f64>,
}

impl IndicatorAttributes {
    /// Creates attributes from already averaged codes.
    pub const fn new(ease: f64, mitigation: f64, resources: f64) -> Self {
        Self {
            ease,
            mitigation,
            resources,
            impact: None,
        }
    }

    /// Creates attributes from a single set of levels.
    pub fn from_levels(ease: EaseLevel, mitigation: EaseLevel, resources: ResourceLevel) -> Self {
        Self::new(
            f64::from(ease.code()),
            f64::from(mitigation.code()),
            f64::from(resources.code()),
        )
    }

    /// Attributes with every code at zero, so the indicator carries no penalty.
    pub const fn free() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Sets the mean impact code.
    pub fn with_impact(mut self, impact: f64) -> Self {
        self.impact = Some(impact);
        self
    }
}

/// A candidate indicator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Indicator {
    pub id: String,
    pub attributes: IndicatorAttributes,
}

impl Indicator {
    pub fn new(id: impl Into<String>, attributes: IndicatorAttributes) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }
}

// Running sums used while averaging row codes.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct AttributeAccumulator {
    ease: u64,
    mitigation: u64,
    resources: u64,
    rows: u64,
    impact: u64,
    impact_rows: u64,
}

impl AttributeAccumulator {
    pub(crate) fn record(
        &mut self,
        ease: EaseLevel,
        mitigation: EaseLevel,
        resources: ResourceLevel,
        impact: Option<ImpactLevel>,
    ) {
        self.ease += u64::from(ease.code());
        self.mitigation += u64::from(mitigation.code());
        self.resources += u64::from(resources.code());
        self.rows += 1;
        if let Some(impact) = impact {
            self.impact += u64::from(impact.code());
            self.impact_rows += 1;
        }
    }

    pub(crate) fn mean(&self) -> IndicatorAttributes {
        let rows = self.rows.max(1) as f64;
        let attributes = IndicatorAttributes::new(
            self.ease as f64 / rows,
            self.mitigation as f64 / rows,
            self.resources as f64 / rows,
        );
        if self.impact_rows > 0 {
            attributes.with_impact(self.impact as f64 / self.impact_rows as f64)
        } else {
            attributes
        }
    }
}
