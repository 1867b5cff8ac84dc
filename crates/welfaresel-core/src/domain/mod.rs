//! Domain model: indicators, hazard categories and the catalog tying them.

mod catalog;
mod category;
mod indicator;
mod ordinal;


pub use catalog::{Catalog, CatalogBuilder, CatalogRow};
pub use category::{CategoryKind, HazardCategory};
pub use indicator::{Indicator, IndicatorAttributes};
pub use ordinal::{EaseLevel, ImpactLevel, ResourceLevel};
