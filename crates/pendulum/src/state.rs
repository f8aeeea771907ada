//! Immutable snapshots of the pendulum and the named-parameter lookup.

use core::fmt;
use core::str::FromStr;

use crate::motion::Motion;
use crate::params::SimulationParameters;

/// One instant of the simulation, with every derived quantity filled in.
///
/// A `PhysicsState` can only be built whole through
/// [`from_motion`](Self::from_motion), which computes the Cartesian position,
/// speed, forces and acceleration from the integrated variables. There are
/// no setters, so a snapshot never drifts out of agreement with itself.
/// It is `Copy`: each subscriber gets its own.
///
/// # Example
///
/// ```rust
/// use pendulum::{Motion, Parameter, PhysicsState, SimulationParameters};
///
/// let params = SimulationParameters::default();
/// let state = PhysicsState::from_motion(0.0, Motion::at_rest(&params), &params);
///
/// assert_eq!(state.spring_length(), 1.5);
/// assert_eq!(state.velocity(), 0.0);
/// assert_eq!(state.value(Parameter::SpringForce), 25.0);
/// assert_eq!(state.parameter("Spring length (m)"), 1.5);
/// assert_eq!(state.parameter("no such thing"), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PhysicsState {
    time: f64,
    angle: f64,
    angular_velocity: f64,
    spring_length: f64,
    radial_velocity: f64,
    x: f64,
    y: f64,
    velocity: f64,
    spring_force: f64,
    gravity_force: f64,
    acceleration: f64,
}

impl PhysicsState {
    /// Builds a snapshot from the integrated variables at simulated `time`.
    pub fn from_motion(time: f64, motion: Motion, params: &SimulationParameters) -> Self {
        let (x, y) = motion.position();
        Self {
            time,
            angle: motion.angle,
            angular_velocity: motion.angular_velocity,
            spring_length: motion.spring_length,
            radial_velocity: motion.radial_velocity,
            x,
            y,
            velocity: motion.speed(),
            spring_force: params.spring_constant * (motion.spring_length - params.natural_length),
            gravity_force: params.mass * params.gravity,
            acceleration: motion.acceleration(params),
        }
    }

    /// Simulated time (s).
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Angle from the downward vertical (rad).
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Angular velocity (rad/s).
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Spring length (m).
    pub fn spring_length(&self) -> f64 {
        self.spring_length
    }

    /// Rate of change of the spring length (m/s).
    pub fn radial_velocity(&self) -> f64 {
        self.radial_velocity
    }

    /// Horizontal bob position (m).
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Vertical bob position, positive downward (m).
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Bob speed (m/s).
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Spring force `k·(R − R0)` (N). Positive when stretched.
    pub fn spring_force(&self) -> f64 {
        self.spring_force
    }

    /// Weight `m·g` (N).
    pub fn gravity_force(&self) -> f64 {
        self.gravity_force
    }

    /// Acceleration magnitude (m/s²).
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// The integrated variables this snapshot was built from.
    pub fn motion(&self) -> Motion {
        Motion {
            spring_length: self.spring_length,
            radial_velocity: self.radial_velocity,
            angle: self.angle,
            angular_velocity: self.angular_velocity,
        }
    }

    /// Reads one field by [`Parameter`].
    pub fn value(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Time => self.time,
            Parameter::Angle => self.angle,
            Parameter::AngularVelocity => self.angular_velocity,
            Parameter::SpringLength => self.spring_length,
            Parameter::RadialVelocity => self.radial_velocity,
            Parameter::X => self.x,
            Parameter::Y => self.y,
            Parameter::Velocity => self.velocity,
            Parameter::SpringForce => self.spring_force,
            Parameter::GravityForce => self.gravity_force,
            Parameter::Acceleration => self.acceleration,
        }
    }

    /// Reads one field by label or key, as chart consumers select them.
    ///
    /// Unknown names read as `0.0`.
    pub fn parameter(&self, name: &str) -> f64 {
        name.parse::<Parameter>()
            .map_or(0.0, |parameter| self.value(parameter))
    }
}

impl fmt::Display for PhysicsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:.3}, angle={:.3}, R={:.3}, v={:.3}",
            self.time, self.angle, self.spring_length, self.velocity
        )
    }
}

/// A named, chartable field of [`PhysicsState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Parameter {
    Time,
    Angle,
    AngularVelocity,
    SpringLength,
    RadialVelocity,
    X,
    Y,
    Velocity,
    SpringForce,
    GravityForce,
    Acceleration,
}

impl Parameter {
    /// Every parameter, time first.
    pub const ALL: [Parameter; 11] = [
        Parameter::Time,
        Parameter::Angle,
        Parameter::AngularVelocity,
        Parameter::SpringLength,
        Parameter::RadialVelocity,
        Parameter::X,
        Parameter::Y,
        Parameter::Velocity,
        Parameter::SpringForce,
        Parameter::GravityForce,
        Parameter::Acceleration,
    ];

    /// The parameters offered for plotting against time, in display order.
    pub const SELECTABLE: [Parameter; 10] = [
        Parameter::Angle,
        Parameter::AngularVelocity,
        Parameter::SpringLength,
        Parameter::RadialVelocity,
        Parameter::X,
        Parameter::Y,
        Parameter::Velocity,
        Parameter::SpringForce,
        Parameter::GravityForce,
        Parameter::Acceleration,
    ];

    /// Human-readable label with units.
    pub fn label(self) -> &'static str {
        match self {
            Self::Time => "Time (s)",
            Self::Angle => "Angle (rad)",
            Self::AngularVelocity => "Angular velocity (rad/s)",
            Self::SpringLength => "Spring length (m)",
            Self::RadialVelocity => "Radial velocity (m/s)",
            Self::X => "X (m)",
            Self::Y => "Y (m)",
            Self::Velocity => "Velocity (m/s)",
            Self::SpringForce => "Spring force (N)",
            Self::GravityForce => "Gravity force (N)",
            Self::Acceleration => "Acceleration (m/s²)",
        }
    }

    /// Short snake_case key, for command lines and config files.
    pub fn key(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Angle => "angle",
            Self::AngularVelocity => "angular_velocity",
            Self::SpringLength => "spring_length",
            Self::RadialVelocity => "radial_velocity",
            Self::X => "x",
            Self::Y => "y",
            Self::Velocity => "velocity",
            Self::SpringForce => "spring_force",
            Self::GravityForce => "gravity_force",
            Self::Acceleration => "acceleration",
        }
    }

    /// Looks a parameter up by its exact label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }

    /// Looks a parameter up by its key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a name matches neither a label nor a key.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown parameter: {0}")]
pub struct UnknownParameter(pub String);

impl FromStr for Parameter {
    type Err = UnknownParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
            .or_else(|| Self::from_key(s))
            .ok_or_else(|| UnknownParameter(s.to_string()))
    }
}
