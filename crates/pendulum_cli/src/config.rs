//! File configuration and its resolution against command-line overrides.
//!
//! ```toml
//! [parameters]
//! mass = 1.0
//! spring_constant = 50.0
//!
//! [engine]
//! speed = 2.0
//! ```
//!
//! Every table and key is optional; missing values take their defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pendulum::SimulationParameters;
use pendulum_engine::{MAX_SPEED, MIN_SPEED};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cli::{Cli, ParameterOverrides};

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Physical parameters.
    pub parameters: SimulationParameters,
    /// Engine settings.
    pub engine: EngineSection,
}

/// The `[engine]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    /// Speed multiplier for real-time runs.
    pub speed: f64,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

impl FileConfig {
    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this layout.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parses configuration text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed input or unknown keys.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Everything a subcommand needs, after merging file and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub parameters: SimulationParameters,
    pub speed: f64,
}

impl Settings {
    /// Loads the config file named on the command line (if any), applies
    /// the parameter overrides and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or a parameter is out
    /// of its physical range.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::from_parts(file, &cli.overrides)
    }

    /// Merges `overrides` onto `file` and validates.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid parameter.
    pub fn from_parts(file: FileConfig, overrides: &ParameterOverrides) -> Result<Self> {
        let parameters = overrides.apply(file.parameters);
        parameters
            .validate()
            .context("invalid simulation parameters")?;

        let speed = file.engine.speed;
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            warn!(speed, min = MIN_SPEED, max = MAX_SPEED, "Configured speed will be clamped");
        }

        Ok(Self { parameters, speed })
    }
}

impl ParameterOverrides {
    /// Replaces each field of `base` that was given on the command line.
    #[must_use]
    pub fn apply(&self, base: SimulationParameters) -> SimulationParameters {
        SimulationParameters {
            mass: self.mass.unwrap_or(base.mass),
            spring_constant: self.stiffness.unwrap_or(base.spring_constant),
            natural_length: self.natural_length.unwrap_or(base.natural_length),
            initial_length: self.initial_length.unwrap_or(base.initial_length),
            initial_angle: self.initial_angle.unwrap_or(base.initial_angle),
            damping: self.damping.unwrap_or(base.damping),
            gravity: self.gravity.unwrap_or(base.gravity),
        }
    }
}
