//! WelfareSel Core - Core types and traits for welfare indicator selection
//!
//! This crate provides the fundamental abstractions for WelfareSel:
//! - Domain types for indicators, hazard categories and the catalog
//! - Closed ordinal enumerations for the dataset's categorical columns
//! - The linear program vocabulary and the injected [`MilpBackend`] trait
//! - The error taxonomy shared by every crate

pub mod domain;
pub mod error;
pub mod lp;

pub use domain::{
    Catalog, CatalogBuilder, CatalogRow, CategoryKind, EaseLevel, HazardCategory, ImpactLevel,
    Indicator, IndicatorAttributes, ResourceLevel,
};
pub use error::{DataMappingError, ModelConstructionError, SelectionError, SolverStatusError};
pub use lp::{
    Comparison, LinearConstraint, LinearExpr, LinearProgram, MilpBackend, Sense, SolvedState,
    TerminalStatus, VarId,
};
