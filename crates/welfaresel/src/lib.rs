//! WelfareSel - Welfare Indicator Selection in Rust
//!
//! Picks exactly K welfare indicators that cover as many animal hazards and
//! consequences as possible while keeping assessment cost low, by solving a
//! binary integer program.
//!
//! # Example
//!
//! ```rust
//! use welfaresel::prelude::*;
//!
//! let catalog = Catalog::builder()
//!     .indicator("Lameness", IndicatorAttributes::new(1.0, 2.0, 1.0))
//!     .indicator("Lying time", IndicatorAttributes::new(3.0, 1.0, 3.0))
//!     .hazard("Hard flooring", ["Lameness", "Lying time"])
//!     .consequence("Pain", ["Lameness"])
//!     .build()
//!     .unwrap();
//!
//! let config = SelectionConfig::new().with_target_count(1);
//! let solution = select_indicators(&catalog, &config).unwrap();
//! assert_eq!(solution.selected_ids(), vec!["Lameness"]);
//! ```

// Domain and errors
pub use welfaresel_core::{
    Catalog, CatalogBuilder, CatalogRow, CategoryKind, DataMappingError, EaseLevel,
    HazardCategory, ImpactLevel, Indicator, IndicatorAttributes, ModelConstructionError,
    ResourceLevel, SelectionError, SolverStatusError,
};

// Backend capability
pub use welfaresel_core::lp;
pub use welfaresel_core::{MilpBackend, TerminalStatus};

pub use welfaresel_config::{
    ConfigError, CoverageWeights, PenaltyWeights, SelectionConfig, UncoveredPolicy,
};

pub use welfaresel_solver::{
    MicroLpBackend, SelectedIndicator, SelectionSession, SelectionSolution, SelectionSolver,
    SolveWarning,
};

#[cfg(feature = "console")]
pub use welfaresel_console as console;

mod solver;
pub use solver::{select_indicators, select_indicators_with_config_file, CONFIG_FILE};

pub mod prelude {
    pub use super::{
        select_indicators, Catalog, CategoryKind, IndicatorAttributes, PenaltyWeights,
        SelectionConfig, SelectionError, SelectionSolution, SelectionSolver, TerminalStatus,
        UncoveredPolicy,
    };
}
