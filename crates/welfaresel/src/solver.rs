//! Selection entry points that hide the solver wiring.

use std::path::Path;

use tracing::debug;
use welfaresel_config::SelectionConfig;
use welfaresel_core::{Catalog, SelectionError};
use welfaresel_solver::{SelectionSolution, SelectionSolver};

/// Configuration file read by [`select_indicators_with_config_file`].
pub const CONFIG_FILE: &str = "welfaresel.toml";

/// Selects `config.target_count` indicators from `catalog` on the default
/// backend.
pub fn select_indicators(
    catalog: &Catalog,
    config: &SelectionConfig,
) -> Result<SelectionSolution, SelectionError> {
    #[cfg(feature = "console")]
    welfaresel_console::init();

    SelectionSolver::new(config.clone()).solve(catalog)
}

/// Like [`select_indicators`], with the configuration loaded from `path`.
///
/// A missing or unreadable file falls back to the defaults.
pub fn select_indicators_with_config_file(
    catalog: &Catalog,
    path: impl AsRef<Path>,
) -> Result<SelectionSolution, SelectionError> {
    let path = path.as_ref();
    let config = match SelectionConfig::load(path) {
        Ok(config) => config,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "Using default configuration");
            SelectionConfig::default()
        }
    };
    select_indicators(catalog, &config)
}
