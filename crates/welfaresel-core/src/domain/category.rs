//! Hazard categories and their covering indicators.

use std::collections::BTreeSet;
use std::fmt;

/// The two families of coverage targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CategoryKind {
    /// A hazard affecting the animal.
    AnimalHazard,
    /// A consequence of a welfare hazard.
    Consequence,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; 2] = [CategoryKind::AnimalHazard, CategoryKind::Consequence];
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKind::AnimalHazard => f.write_str("animal hazard"),
            CategoryKind::Consequence => f.write_str("consequence"),
        }
    }
}

/// A coverage target together with the indicators that detect it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HazardCategory {
    pub id: String,
    pub kind: CategoryKind,
    /// Identifiers of the covering indicators.
    pub covering: BTreeSet<String>,
}

impl HazardCategory {
    pub fn new<I, S>(id: impl Into<String>, kind: CategoryKind, covering: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            kind,
            covering: covering.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `indicator` covers this category.
    pub fn is_covered_by(&self, indicator: &str) -> bool {
        self.covering.contains(indicator)
    }

    /// Returns true if no indicator covers this category.
    pub fn is_orphan(&self) -> bool {
        self.covering.is_empty()
    }
}
