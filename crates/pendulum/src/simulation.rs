//! Deterministic fixed-step simulation of one spring pendulum.

use crate::motion::{Motion, TIME_STEP, rk4_step};
use crate::params::SimulationParameters;
use crate::state::PhysicsState;

/// Simulated time plus the integrated variables, advanced in fixed steps.
///
/// `Simulation` has no notion of wall-clock time; it is what a real-time
/// driver calls into, and what offline tools use directly. Two simulations
/// built from the same parameters and stepped the same number of times end
/// in bit-identical states.
///
/// # Example
///
/// ```rust
/// use pendulum::{Simulation, SimulationParameters};
///
/// let mut sim = Simulation::new(SimulationParameters::default());
/// sim.advance(1000); // one simulated second
///
/// let state = sim.snapshot();
/// assert!((state.time() - 1.0).abs() < 1e-9);
/// assert!(state.spring_length() >= 0.1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    params: SimulationParameters,
    time_step: f64,
    time: f64,
    motion: Motion,
    steps: u64,
}

impl Simulation {
    /// Creates a simulation at rest at the parameters' initial conditions.
    pub fn new(params: SimulationParameters) -> Self {
        Self::with_time_step(params, TIME_STEP)
    }

    /// Creates a simulation with a non-default integration step.
    pub fn with_time_step(params: SimulationParameters, time_step: f64) -> Self {
        Self {
            params,
            time_step,
            time: 0.0,
            motion: Motion::at_rest(&params),
            steps: 0,
        }
    }

    /// Returns to `t = 0` at the current parameters' initial conditions.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.motion = Motion::at_rest(&self.params);
        self.steps = 0;
    }

    /// Replaces the parameters and resets.
    pub fn set_parameters(&mut self, params: SimulationParameters) {
        self.params = params;
        self.reset();
    }

    /// Performs one RK4 step.
    pub fn step(&mut self) {
        self.motion = rk4_step(self.motion, &self.params, self.time_step);
        self.time += self.time_step;
        self.steps += 1;
    }

    /// Performs `steps` consecutive RK4 steps.
    pub fn advance(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Steps until simulated time reaches `time` (no-op if already past it).
    pub fn advance_to(&mut self, time: f64) {
        let remaining = self.steps_for(time - self.time + self.time_step * 1e-6);
        self.advance(remaining);
    }

    /// Number of whole steps that fit in `simulated` seconds.
    ///
    /// Negative and `NaN` durations yield zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn steps_for(&self, simulated: f64) -> u64 {
        (simulated / self.time_step) as u64
    }

    /// The snapshot of the current instant.
    pub fn snapshot(&self) -> PhysicsState {
        PhysicsState::from_motion(self.time, self.motion, &self.params)
    }

    /// Total mechanical energy at the current instant.
    pub fn energy(&self) -> f64 {
        self.motion.mechanical_energy(&self.params)
    }

    /// The active parameters.
    pub fn parameters(&self) -> SimulationParameters {
        self.params
    }

    /// Simulated time (s).
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The integration step (s).
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// The integrated variables.
    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Steps taken since the last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationParameters::default())
    }
}
