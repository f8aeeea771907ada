//! Error types for the simulation engine.

use std::io;

use pendulum::ParameterError;

/// Errors that can occur when creating or configuring a [`SimulationEngine`].
///
/// Running simulations do not fail: degenerate parameters show up as
/// non-finite values in snapshots, and shutdown is not an error.
///
/// | Error Variant | Recovery Strategy |
/// |---------------|-------------------|
/// | [`Spawn`](Error::Spawn) | Out of threads or memory; retry later or report |
/// | [`InvalidConfig`](Error::InvalidConfig) | Fix the offending [`EngineConfig`] field |
/// | [`InvalidParameters`](Error::InvalidParameters) | Fix the parameter named in the error |
///
/// [`SimulationEngine`]: crate::SimulationEngine
/// [`EngineConfig`]: crate::EngineConfig
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The background simulation thread could not be created.
    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[source] io::Error),

    /// An [`EngineConfig`](crate::EngineConfig) value is unusable.
    #[error("invalid engine configuration: {field} {reason}")]
    InvalidConfig {
        /// Name of the configuration field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Physical parameters were rejected by
    /// [`try_set_parameters`](crate::SimulationEngine::try_set_parameters).
    #[error(transparent)]
    InvalidParameters(#[from] ParameterError),
}

/// A specialized [`Result`](std::result::Result) for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
