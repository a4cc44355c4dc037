//! Detector configuration: the tunable policy constants of the scoring loop.
//!
//! Defaults reproduce the empirically tuned values of the upstream profiles.
//! A config can be loaded from TOML so that deployments with different profile
//! sets can retune without recompiling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Policy constants for a [`Detector`](crate::detect::Detector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Smoothing strength: blend between the uniform component and the trained likelihood.
    pub alpha: f64,
    /// Characters of normalized text kept in the buffer; further input is ignored.
    pub max_text_length: usize,
    /// Fixed seed for the trial permutations. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Number of randomized trials averaged per detection.
    pub trials: usize,
    /// Upper bound on Bayesian updates within one trial.
    pub max_updates: usize,
    /// Top probability a trial must exceed to count as converged.
    pub convergence_threshold: f64,
    /// Consecutive updates above the convergence threshold before a trial stops early.
    pub convergence_steps: usize,
    /// Minimum top probability for `detect` to report a language.
    pub confidence_threshold: f64,
    /// Divisor turning alpha into the additive per-n-gram smoothing term.
    pub smoothing_base: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            max_text_length: 10_000,
            seed: None,
            trials: 7,
            max_updates: 1000,
            convergence_threshold: 0.99999,
            convergence_steps: 5,
            confidence_threshold: 0.1,
            smoothing_base: 10_000.0,
        }
    }
}

impl DetectorConfig {
    /// Parse a config from a TOML string. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<string>".into(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every constant is usable by the scoring loop.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |message: String| Err(ConfigError::Invalid { message });

        if !(self.alpha.is_finite() && self.alpha > 0.0 && self.alpha <= 1.0) {
            return invalid(format!("alpha must lie in (0, 1], got {}", self.alpha));
        }
        if self.trials == 0 {
            return invalid("trials must be at least 1".into());
        }
        if self.max_updates == 0 {
            return invalid("max_updates must be at least 1".into());
        }
        if self.convergence_steps == 0 {
            return invalid("convergence_steps must be at least 1".into());
        }
        if self.max_text_length == 0 {
            return invalid("max_text_length must be at least 1".into());
        }
        for (name, value) in [
            ("convergence_threshold", self.convergence_threshold),
            ("confidence_threshold", self.confidence_threshold),
        ] {
            if !(value.is_finite() && value > 0.0 && value <= 1.0) {
                return invalid(format!("{name} must lie in (0, 1], got {value}"));
            }
        }
        if !(self.smoothing_base.is_finite() && self.smoothing_base > 0.0) {
            return invalid(format!(
                "smoothing_base must be positive, got {}",
                self.smoothing_base
            ));
        }
        Ok(())
    }
}
