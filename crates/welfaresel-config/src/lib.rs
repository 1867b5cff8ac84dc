//! Configuration system for WelfareSel.
//!
//! Load the selection configuration from TOML or YAML files to change the
//! target count, coverage rewards and cost penalties without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use welfaresel_config::{SelectionConfig, UncoveredPolicy};
//! use std::time::Duration;
//!
//! let config = SelectionConfig::from_toml_str(r#"
//!     target_count = 6
//!     uncovered_categories = "exclude"
//!
//!     [weights]
//!     hazard = 2.0
//!
//!     [penalties]
//!     resources = 5.0
//!
//!     [termination]
//!     seconds_spent_limit = 30
//! "#).unwrap();
//!
//! assert_eq!(config.target_count, 6);
//! assert_eq!(config.weights.hazard, 2.0);
//! assert_eq!(config.weights.consequence, 1.0);
//! assert_eq!(config.penalties.ease, 10.0);
//! assert_eq!(config.uncovered_categories, UncoveredPolicy::Exclude);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use welfaresel_config::SelectionConfig;
//!
//! let config = SelectionConfig::load("selection.toml").unwrap_or_default();
//! assert_eq!(config.target_count, 4);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use welfaresel_core::IndicatorAttributes;

/// Default number of indicators to select.
pub const DEFAULT_TARGET_COUNT: usize = 4;

/// Default weight of each penalty attribute.
pub const DEFAULT_PENALTY_WEIGHT: f64 = 10.0;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main selection configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SelectionConfig {
    /// Exact number of indicators to select (K).
    pub target_count: usize,

    /// Rewards for covered categories.
    pub weights: CoverageWeights,

    /// Weights of the per-indicator cost attributes.
    pub penalties: PenaltyWeights,

    /// Treatment of categories no indicator covers.
    pub uncovered_categories: UncoveredPolicy,

    /// Termination configuration.
    pub termination: Option<TerminationConfig>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_TARGET_COUNT,
            weights: CoverageWeights::default(),
            penalties: PenaltyWeights::default(),
            uncovered_categories: UncoveredPolicy::default(),
            termination: None,
        }
    }
}

impl SelectionConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing the format by extension.
    ///
    /// `.yaml` and `.yml` files are read as YAML, everything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or doesn't parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the number of indicators to select.
    pub fn with_target_count(mut self, count: usize) -> Self {
        self.target_count = count;
        self
    }

    /// Sets the coverage rewards.
    pub fn with_coverage_weights(mut self, hazard: f64, consequence: f64) -> Self {
        self.weights = CoverageWeights {
            hazard,
            consequence,
        };
        self
    }

    /// Sets the penalty weights (β, γ, δ).
    pub fn with_penalty_weights(mut self, ease: f64, mitigation: f64, resources: f64) -> Self {
        self.penalties = PenaltyWeights {
            ease,
            mitigation,
            resources,
        };
        self
    }

    /// Sets the uncovered category policy.
    pub fn with_uncovered_policy(mut self, policy: UncoveredPolicy) -> Self {
        self.uncovered_categories = policy;
        self
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Returns the termination time limit, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// The target count must be at least 1 and every weight finite. Negative
    /// weights are allowed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_count == 0 {
            return Err(ConfigError::Invalid(
                "target_count must be at least 1".to_string(),
            ));
        }

        let weights = [
            ("weights.hazard", self.weights.hazard),
            ("weights.consequence", self.weights.consequence),
            ("penalties.ease", self.penalties.ease),
            ("penalties.mitigation", self.penalties.mitigation),
            ("penalties.resources", self.penalties.resources),
        ];
        for (name, value) in weights {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite number, got {value}"
                )));
            }
        }

        Ok(())
    }
}

/// Coverage rewards per covered category.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CoverageWeights {
    /// Reward for each covered animal hazard.
    pub hazard: f64,

    /// Reward for each covered consequence.
    pub consequence: f64,
}

impl Default for CoverageWeights {
    fn default() -> Self {
        Self {
            hazard: 1.0,
            consequence: 1.0,
        }
    }
}

/// Weights of the cost attributes in an indicator's penalty.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PenaltyWeights {
    /// β: weight of the ease-of-use code.
    pub ease: f64,

    /// γ: weight of the ease-of-mitigation code.
    pub mitigation: f64,

    /// δ: weight of the resource-requirement code.
    pub resources: f64,
}

impl PenaltyWeights {
    /// All weights zero; selection is then driven by coverage alone.
    pub const ZERO: PenaltyWeights = PenaltyWeights {
        ease: 0.0,
        mitigation: 0.0,
        resources: 0.0,
    };

    /// Penalty of an indicator: `β·ease + γ·mitigation + δ·resources`.
    ///
    /// ```
    /// use welfaresel_config::PenaltyWeights;
    /// use welfaresel_core::IndicatorAttributes;
    ///
    /// let attrs = IndicatorAttributes::new(1.0, 2.0, 1.5);
    /// assert_eq!(PenaltyWeights::default().penalty(&attrs), 45.0);
    /// ```
    pub fn penalty(&self, attributes: &IndicatorAttributes) -> f64 {
        self.ease * attributes.ease
            + self.mitigation * attributes.mitigation
            + self.resources * attributes.resources
    }
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            ease: DEFAULT_PENALTY_WEIGHT,
            mitigation: DEFAULT_PENALTY_WEIGHT,
            resources: DEFAULT_PENALTY_WEIGHT,
        }
    }
}

/// What to do with a category that no indicator covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UncoveredPolicy {
    /// Keep the category with its coverage variable fixed to 0.
    #[default]
    Pin,

    /// Leave the category out of the model entirely.
    Exclude,

    /// Fail model construction.
    Reject,
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend solving.
    pub minutes_spent_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds =
            self.seconds_spent_limit.unwrap_or(0) + self.minutes_spent_limit.unwrap_or(0) * 60;
        if seconds > 0 {
            Some(Duration::from_secs(seconds))
        } else {
            None
        }
    }
}
