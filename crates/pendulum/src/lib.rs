#![forbid(unsafe_code)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::use_self)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]

//! # Pendulum
//!
//! Physics of a spring pendulum: a point mass on an elastic spring, free to
//! swing about a fixed pivot and to stretch at the same time.
//!
//! Pendulum provides:
//! - **SimulationParameters**: mass, stiffness, lengths, release angle,
//!   damping and gravity
//! - **Motion**: the four integrated variables and the quantities derived
//!   from them (position, speed, acceleration, energy)
//! - **rk4_step**: one classical Runge-Kutta step of the equations of motion
//! - **Simulation**: a deterministic fixed-step stepper
//! - **PhysicsState**: an immutable, self-consistent snapshot, readable by
//!   named [`Parameter`]
//!
//! ## Example
//!
//! ```rust
//! use pendulum::{Parameter, Simulation, SimulationParameters};
//!
//! let params = SimulationParameters::default();
//! let mut sim = Simulation::new(params);
//!
//! // One simulated second at the default 1 ms step
//! sim.advance(1000);
//!
//! let state = sim.snapshot();
//! let length = state.value(Parameter::SpringLength);
//!
//! // The spring oscillates around its stretched equilibrium
//! assert!((length - params.equilibrium_length(state.angle())).abs() < 0.5);
//! ```
//!
//! ## Coordinates
//!
//! The pivot sits at the origin and the angle is measured from the downward
//! vertical, so `x = R·sin(φ)` and `y = R·cos(φ)` with `y` growing downward.

mod motion;
mod params;
mod simulation;
mod state;

pub use motion::{MIN_SPRING_LENGTH, Motion, StateVector, TIME_STEP, derivatives, rk4_step};
pub use params::{
    Constraint, DEFAULT_DAMPING, DEFAULT_GRAVITY, DEFAULT_INITIAL_ANGLE, DEFAULT_INITIAL_LENGTH,
    DEFAULT_MASS, DEFAULT_NATURAL_LENGTH, DEFAULT_SPRING_CONSTANT, ParameterError,
    SimulationParameters,
};
pub use simulation::Simulation;
pub use state::{Parameter, PhysicsState, UnknownParameter};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::motion::{Motion, TIME_STEP, rk4_step};
    pub use crate::params::SimulationParameters;
    pub use crate::simulation::Simulation;
    pub use crate::state::{Parameter, PhysicsState};
}
