//! Physical parameters of the spring pendulum.

use core::f64::consts::FRAC_PI_6;

/// Default bob mass (kg).
pub const DEFAULT_MASS: f64 = 1.0;
/// Default spring constant (N/m).
pub const DEFAULT_SPRING_CONSTANT: f64 = 50.0;
/// Default natural (unstretched) spring length (m).
pub const DEFAULT_NATURAL_LENGTH: f64 = 1.0;
/// Default spring length at release (m).
pub const DEFAULT_INITIAL_LENGTH: f64 = 1.5;
/// Default release angle from the downward vertical (rad).
pub const DEFAULT_INITIAL_ANGLE: f64 = FRAC_PI_6;
/// Default linear damping coefficient (kg/s).
pub const DEFAULT_DAMPING: f64 = 0.1;
/// Standard gravity (m/s²).
pub const DEFAULT_GRAVITY: f64 = 9.81;

/// The complete physical description of one spring pendulum.
///
/// Parameters are plain values: they are `Copy`, and every component that
/// needs a stable view holds its own copy. A change of parameters is always
/// a whole new value, never an in-place edit of a shared one.
///
/// No range checks happen on construction. Degenerate values such as a zero
/// mass are accepted and produce `NaN`/`inf` trajectories; call
/// [`validate`](Self::validate) where that should be rejected instead.
///
/// # Example
///
/// ```rust
/// use pendulum::SimulationParameters;
///
/// let params = SimulationParameters::default()
///     .with_mass(2.0)
///     .with_damping(0.0);
///
/// assert_eq!(params.mass, 2.0);
/// assert_eq!(params.spring_constant, 50.0);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationParameters {
    /// Bob mass `m` (kg).
    pub mass: f64,
    /// Spring constant `k` (N/m).
    pub spring_constant: f64,
    /// Natural spring length `R0` (m).
    pub natural_length: f64,
    /// Spring length at release `R_init` (m).
    pub initial_length: f64,
    /// Release angle `φ_init` from the downward vertical (rad).
    pub initial_angle: f64,
    /// Linear damping coefficient `c` (kg/s), applied to radial and angular motion.
    pub damping: f64,
    /// Gravitational acceleration `g` (m/s²).
    pub gravity: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            mass: DEFAULT_MASS,
            spring_constant: DEFAULT_SPRING_CONSTANT,
            natural_length: DEFAULT_NATURAL_LENGTH,
            initial_length: DEFAULT_INITIAL_LENGTH,
            initial_angle: DEFAULT_INITIAL_ANGLE,
            damping: DEFAULT_DAMPING,
            gravity: DEFAULT_GRAVITY,
        }
    }
}

impl SimulationParameters {
    /// Creates the default parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bob mass.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Sets the spring constant.
    pub fn with_spring_constant(mut self, spring_constant: f64) -> Self {
        self.spring_constant = spring_constant;
        self
    }

    /// Sets the natural spring length.
    pub fn with_natural_length(mut self, natural_length: f64) -> Self {
        self.natural_length = natural_length;
        self
    }

    /// Sets the spring length at release.
    pub fn with_initial_length(mut self, initial_length: f64) -> Self {
        self.initial_length = initial_length;
        self
    }

    /// Sets the release angle in radians.
    pub fn with_initial_angle(mut self, initial_angle: f64) -> Self {
        self.initial_angle = initial_angle;
        self
    }

    /// Sets the damping coefficient.
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Sets the gravitational acceleration.
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Length at which the spring balances the bob hanging at `angle`.
    ///
    /// This is `R0 + m·g·cos(φ)/k`, the center the radial oscillation
    /// settles around for a slowly swinging bob.
    pub fn equilibrium_length(&self, angle: f64) -> f64 {
        self.natural_length + self.mass * self.gravity * angle.cos() / self.spring_constant
    }

    /// Checks that every field lies in its physical range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParameterError`] found, in field order.
    pub fn validate(&self) -> Result<(), ParameterError> {
        positive("mass", self.mass)?;
        positive("spring_constant", self.spring_constant)?;
        positive("natural_length", self.natural_length)?;
        positive("initial_length", self.initial_length)?;
        if !self.initial_angle.is_finite() {
            return Err(ParameterError::new(
                "initial_angle",
                self.initial_angle,
                Constraint::Finite,
            ));
        }
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(ParameterError::new(
                "damping",
                self.damping,
                Constraint::NonNegative,
            ));
        }
        positive("gravity", self.gravity)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::new(field, value, Constraint::Positive))
    }
}

impl core::fmt::Display for SimulationParameters {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "m={:.2}, k={:.2}, R0={:.2}, R={:.2}, phi={:.2}, c={:.2}, g={:.2}",
            self.mass,
            self.spring_constant,
            self.natural_length,
            self.initial_length,
            self.initial_angle,
            self.damping,
            self.gravity
        )
    }
}

/// The bound a parameter failed to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Finite and strictly greater than zero.
    Positive,
    /// Finite and greater than or equal to zero.
    NonNegative,
    /// Any finite value.
    Finite,
}

impl core::fmt::Display for Constraint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Positive => "a finite value > 0",
            Self::NonNegative => "a finite value >= 0",
            Self::Finite => "a finite value",
        })
    }
}

/// A parameter outside its physical range.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("invalid parameter `{field}` = {value}: expected {constraint}")]
pub struct ParameterError {
    /// Field name as spelled on [`SimulationParameters`].
    pub field: &'static str,
    /// The rejected value.
    pub value: f64,
    /// The bound that was violated.
    pub constraint: Constraint,
}

impl ParameterError {
    fn new(field: &'static str, value: f64, constraint: Constraint) -> Self {
        Self {
            field,
            value,
            constraint,
        }
    }
}
