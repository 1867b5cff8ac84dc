//! CSV dataset loading.
//!
//! One row per (indicator, animal hazard, consequence) association:
//!
//! | column                         | content                          |
//! |--------------------------------|----------------------------------|
//! | `Welfare_Indicator`            | indicator identifier             |
//! | `Welfare_Hazards_Animal`       | animal hazard, may be blank      |
//! | `Welfare_Hazards_Consequences` | consequence, may be blank        |
//! | `Indicator_Ease`               | Easy / Moderate / Difficult      |
//! | `Ease_of_Hazard_Mitigation`    | Easy / Moderate / Difficult      |
//! | `Indicator_Resources`          | Low / Medium / High              |
//! | `Welfare_Hazards_Impact`       | Low / High, optional column      |

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;
use thiserror::Error;
use welfaresel::{Catalog, CatalogRow, DataMappingError, EaseLevel, ImpactLevel, ResourceLevel};

pub const INDICATOR: &str = "Welfare_Indicator";
pub const HAZARD: &str = "Welfare_Hazards_Animal";
pub const CONSEQUENCE: &str = "Welfare_Hazards_Consequences";
pub const EASE: &str = "Indicator_Ease";
pub const MITIGATION: &str = "Ease_of_Hazard_Mitigation";
pub const RESOURCES: &str = "Indicator_Resources";
pub const IMPACT: &str = "Welfare_Hazards_Impact";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error(transparent)]
    Mapping(#[from] DataMappingError),
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Welfare_Indicator", default)]
    indicator: String,
    #[serde(rename = "Welfare_Hazards_Animal", default)]
    hazard: String,
    #[serde(rename = "Welfare_Hazards_Consequences", default)]
    consequence: String,
    #[serde(rename = "Indicator_Ease", default)]
    ease: String,
    #[serde(rename = "Ease_of_Hazard_Mitigation", default)]
    mitigation: String,
    #[serde(rename = "Indicator_Resources", default)]
    resources: String,
    #[serde(rename = "Welfare_Hazards_Impact", default)]
    impact: Option<String>,
}

/// Reads a dataset file into a catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog, DatasetError> {
    let file = File::open(path)?;
    read_catalog(file)
}

/// Reads dataset rows from any reader into a catalog.
pub fn read_catalog<R: Read>(reader: R) -> Result<Catalog, DatasetError> {
    let rows = read_rows(reader)?;
    Ok(Catalog::from_rows(rows)?)
}

/// Reads and maps every row; row numbers in errors count data rows from 1.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<CatalogRow>, DatasetError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in [INDICATOR, HAZARD, CONSEQUENCE, EASE, MITIGATION, RESOURCES] {
        if !headers.iter().any(|h| h == column) {
            return Err(DatasetError::MissingColumn(column));
        }
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.deserialize::<RawRow>().enumerate() {
        rows.push(map_row(record?, idx + 1)?);
    }
    Ok(rows)
}

fn map_row(raw: RawRow, row: usize) -> Result<CatalogRow, DataMappingError> {
    let indicator = required(INDICATOR, &raw.indicator, row)?;
    let ease = EaseLevel::from_label(EASE, required(EASE, &raw.ease, row)?)?;
    let mitigation = EaseLevel::from_label(MITIGATION, required(MITIGATION, &raw.mitigation, row)?)?;
    let resources = ResourceLevel::from_label(RESOURCES, required(RESOURCES, &raw.resources, row)?)?;
    let impact = match raw.impact.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => Some(ImpactLevel::from_label(IMPACT, label)?),
        _ => None,
    };

    Ok(CatalogRow {
        indicator: indicator.to_string(),
        hazard: raw.hazard.trim().to_string(),
        consequence: raw.consequence.trim().to_string(),
        ease,
        mitigation,
        resources,
        impact,
    })
}

fn required<'a>(column: &'static str, value: &'a str, row: usize) -> Result<&'a str, DataMappingError> {
    let value = value.trim();
    if value.is_empty() {
        Err(DataMappingError::MissingValue { column, row })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests;
