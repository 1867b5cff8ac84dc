//! Error types for WelfareSel

use thiserror::Error;

use crate::domain::CategoryKind;

/// Main error type for a selection run.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The integer program could not be built from the catalog.
    #[error(transparent)]
    ModelConstruction(#[from] ModelConstructionError),

    /// The solver did not reach a usable terminal status.
    #[error(transparent)]
    SolverStatus(#[from] SolverStatusError),

    /// An input value could not be mapped to its numeric code.
    #[error(transparent)]
    DataMapping(#[from] DataMappingError),

    /// Error in solver configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a catalog into an integer program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelConstructionError {
    /// Nothing to optimize.
    #[error("Empty model: the catalog has no {0}")]
    EmptyModel(&'static str),

    /// Cardinality can never be met.
    #[error("Target count {target} exceeds the {available} candidate indicators")]
    TargetExceedsCatalog { target: usize, available: usize },

    #[error("Target count must be at least 1")]
    ZeroTarget,

    /// A category has no covering indicator and the policy rejects it.
    #[error("{kind} category '{category}' has no covering indicator")]
    UncoveredCategory { kind: CategoryKind, category: String },

    /// A category references an indicator that is not in the catalog.
    #[error("{kind} category '{category}' references unknown indicator '{indicator}'")]
    UnknownIndicator {
        kind: CategoryKind,
        category: String,
        indicator: String,
    },

    /// The same identifier was registered twice.
    #[error("Duplicate {0} identifier '{1}'")]
    Duplicate(&'static str, String),
}

/// Errors raised by solving or reading back a solution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverStatusError {
    /// Extraction was attempted before a terminal status existed.
    #[error("No terminal solver status is available; solve the model first")]
    NotSolved,

    /// A model is solved at most once.
    #[error("The model has already been solved")]
    AlreadySolved,

    #[error("The model is infeasible")]
    Infeasible,

    #[error("The model is unbounded")]
    Unbounded,

    /// The backend failed internally.
    #[error("Solver error: {0}")]
    Backend(String),

    /// A binary variable came back with a fractional value.
    #[error("Variable '{name}' has non-integral value {value}")]
    NonIntegral { name: String, value: f64 },
}

/// Errors raised while mapping input labels to numeric codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataMappingError {
    /// The label is outside the column's vocabulary.
    #[error("Unrecognized {column} label '{label}' (expected one of: {expected})")]
    UnknownLabel {
        column: &'static str,
        label: String,
        expected: &'static str,
    },

    /// A required cell is empty.
    #[error("Missing value for {column} on row {row}")]
    MissingValue { column: &'static str, row: usize },
}

/// Result type alias for selection operations
pub type Result<T> = std::result::Result<T, SelectionError>;
