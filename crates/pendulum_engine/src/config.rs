//! Engine scheduling configuration.

use std::time::Duration;

use pendulum::{SimulationParameters, TIME_STEP};

use crate::error::{Error, Result};

/// Wall-clock period between snapshot broadcasts (~60 per second).
pub const BROADCAST_INTERVAL: Duration = Duration::from_millis(16);
/// How long the loop sleeps between passes when nothing wakes it.
pub const YIELD_INTERVAL: Duration = Duration::from_millis(1);
/// Slowest allowed speed multiplier.
pub const MIN_SPEED: f64 = 0.1;
/// Fastest allowed speed multiplier.
pub const MAX_SPEED: f64 = 10.0;

/// Configuration for a [`SimulationEngine`](crate::SimulationEngine).
///
/// The defaults give 1 ms RK4 steps, a
/// broadcast every 16 ms of wall time, a 1 ms idle yield, and a speed
/// multiplier clamped to `[0.1, 10.0]`.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use pendulum_engine::EngineConfig;
///
/// let config = EngineConfig::default()
///     .broadcast_interval(Duration::from_millis(33))
///     .initial_speed(2.0);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Integration step in simulated seconds.
    pub time_step: f64,
    /// Wall-clock time between broadcasts while running.
    pub broadcast_interval: Duration,
    /// Idle sleep between loop passes; bounds shutdown latency.
    pub yield_interval: Duration,
    /// Lower clamp for the speed multiplier.
    pub min_speed: f64,
    /// Upper clamp for the speed multiplier.
    pub max_speed: f64,
    /// Speed multiplier at startup (clamped like any other).
    pub initial_speed: f64,
    /// Parameters the simulation starts with.
    pub parameters: SimulationParameters,
    /// Name given to the background thread.
    pub thread_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_step: TIME_STEP,
            broadcast_interval: BROADCAST_INTERVAL,
            yield_interval: YIELD_INTERVAL,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            initial_speed: 1.0,
            parameters: SimulationParameters::default(),
            thread_name: "pendulum-sim".to_string(),
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the integration step.
    pub fn time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Sets the broadcast interval.
    pub fn broadcast_interval(mut self, interval: Duration) -> Self {
        self.broadcast_interval = interval;
        self
    }

    /// Sets the idle yield interval.
    pub fn yield_interval(mut self, interval: Duration) -> Self {
        self.yield_interval = interval;
        self
    }

    /// Sets the speed clamp range.
    pub fn speed_range(mut self, min: f64, max: f64) -> Self {
        self.min_speed = min;
        self.max_speed = max;
        self
    }

    /// Sets the startup speed multiplier.
    pub fn initial_speed(mut self, speed: f64) -> Self {
        self.initial_speed = speed;
        self
    }

    /// Sets the startup parameters.
    pub fn parameters(mut self, parameters: SimulationParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Sets the background thread name.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Clamps `speed` into `[min_speed, max_speed]`.
    ///
    /// `NaN` maps to `min_speed`.
    pub fn clamp_speed(&self, speed: f64) -> f64 {
        if speed.is_nan() {
            self.min_speed
        } else {
            speed.clamp(self.min_speed, self.max_speed)
        }
    }

    /// Checks the scheduling fields.
    ///
    /// Physical parameters are not checked here; they are accepted as-is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first unusable field.
    pub fn validate(&self) -> Result<()> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(invalid("time_step", format!("must be positive, got {}", self.time_step)));
        }
        if self.broadcast_interval.is_zero() {
            return Err(invalid("broadcast_interval", "must be non-zero".to_string()));
        }
        if self.yield_interval.is_zero() {
            return Err(invalid("yield_interval", "must be non-zero".to_string()));
        }
        if !(self.min_speed.is_finite() && self.min_speed > 0.0) {
            return Err(invalid("min_speed", format!("must be positive, got {}", self.min_speed)));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= self.min_speed) {
            return Err(invalid(
                "max_speed",
                format!("must be >= min_speed ({}), got {}", self.min_speed, self.max_speed),
            ));
        }
        if self.thread_name.is_empty() {
            return Err(invalid("thread_name", "must not be empty".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> Error {
    Error::InvalidConfig { field, reason }
}
