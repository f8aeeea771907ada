//! Equations of motion and the classical Runge-Kutta stepper.
//!
//! The bob hangs from a fixed pivot at the origin on a Hookean spring. Its
//! configuration is described in polar coordinates: spring length `R` and
//! angle `φ` measured from the downward vertical. Newton's second law in
//! those coordinates, with uniform gravity and linear damping on both
//! degrees of freedom, gives
//!
//! ```text
//! R'' = R·φ'² − (k/m)·(R − R0) + g·cos(φ) − (c/m)·R'
//! φ'' = −(g/R)·sin(φ) − 2·(R'/R)·φ' − (c/m)·φ'
//! ```
//!
//! The four first-order components `y = [R, R', φ, φ']` are advanced with one
//! fixed-step RK4 update per call to [`rk4_step`]:
//!
//! ```text
//! k1 = f(y)
//! k2 = f(y + dt/2·k1)
//! k3 = f(y + dt/2·k2)
//! k4 = f(y + dt·k3)
//! y' = y + dt/6·(k1 + 2·k2 + 2·k3 + k4)
//! ```

use crate::params::SimulationParameters;

/// Integration step in simulated seconds.
pub const TIME_STEP: f64 = 0.001;

/// Shortest spring length the stepper will produce (m).
///
/// The angular equation divides by `R`; clamping keeps a collapsing spring
/// away from that singularity.
pub const MIN_SPRING_LENGTH: f64 = 0.1;

/// First-order state vector `[R, R', φ, φ']`.
pub type StateVector = [f64; 4];

/// The four integrated variables of the pendulum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    /// Spring length `R` (m).
    pub spring_length: f64,
    /// Rate of change of the spring length `R'` (m/s).
    pub radial_velocity: f64,
    /// Angle `φ` from the downward vertical (rad).
    pub angle: f64,
    /// Angular velocity `φ'` (rad/s).
    pub angular_velocity: f64,
}

impl Motion {
    /// The bob released from rest at the parameters' initial length and angle.
    pub fn at_rest(params: &SimulationParameters) -> Self {
        Self {
            spring_length: params.initial_length,
            radial_velocity: 0.0,
            angle: params.initial_angle,
            angular_velocity: 0.0,
        }
    }

    /// Packs the variables in `[R, R', φ, φ']` order.
    #[inline]
    pub fn to_vector(self) -> StateVector {
        [
            self.spring_length,
            self.radial_velocity,
            self.angle,
            self.angular_velocity,
        ]
    }

    /// Unpacks a `[R, R', φ, φ']` vector.
    #[inline]
    pub fn from_vector(y: StateVector) -> Self {
        Self {
            spring_length: y[0],
            radial_velocity: y[1],
            angle: y[2],
            angular_velocity: y[3],
        }
    }

    /// Cartesian position of the bob `(x, y)`, with `y` pointing down.
    pub fn position(&self) -> (f64, f64) {
        let (sin, cos) = self.angle.sin_cos();
        (self.spring_length * sin, self.spring_length * cos)
    }

    /// Cartesian velocity of the bob `(vx, vy)`.
    pub fn velocity(&self) -> (f64, f64) {
        let (sin, cos) = self.angle.sin_cos();
        let r = self.spring_length;
        let dr = self.radial_velocity;
        let dphi = self.angular_velocity;
        (dr * sin + r * dphi * cos, dr * cos - r * dphi * sin)
    }

    /// Speed of the bob, `√(vx² + vy²)`.
    pub fn speed(&self) -> f64 {
        let (vx, vy) = self.velocity();
        (vx * vx + vy * vy).sqrt()
    }

    /// Undamped radial acceleration `R·φ'² − (k/m)(R − R0) + g·cos(φ)`.
    pub fn radial_acceleration(&self, params: &SimulationParameters) -> f64 {
        let r = self.spring_length;
        let dphi = self.angular_velocity;
        r * dphi * dphi - (params.spring_constant / params.mass) * (r - params.natural_length)
            + params.gravity * self.angle.cos()
    }

    /// Tangential acceleration term `−g·sin(φ)·R`.
    pub fn tangential_acceleration(&self, params: &SimulationParameters) -> f64 {
        -params.gravity * self.angle.sin() * self.spring_length
    }

    /// Magnitude of the radial and tangential acceleration terms.
    pub fn acceleration(&self, params: &SimulationParameters) -> f64 {
        let radial = self.radial_acceleration(params);
        let tangential = self.tangential_acceleration(params);
        (radial * radial + tangential * tangential).sqrt()
    }

    /// Kinetic energy `½m(R'² + R²φ'²)`.
    pub fn kinetic_energy(&self, params: &SimulationParameters) -> f64 {
        let r = self.spring_length;
        let dr = self.radial_velocity;
        let dphi = self.angular_velocity;
        0.5 * params.mass * (dr * dr + r * r * dphi * dphi)
    }

    /// Elastic plus gravitational potential energy.
    ///
    /// The elastic term is zero at the natural length; the gravitational term
    /// is zero at the pivot height and decreases downward.
    pub fn potential_energy(&self, params: &SimulationParameters) -> f64 {
        let stretch = self.spring_length - params.natural_length;
        0.5 * params.spring_constant * stretch * stretch
            - params.mass * params.gravity * self.spring_length * self.angle.cos()
    }

    /// Total mechanical energy.
    pub fn mechanical_energy(&self, params: &SimulationParameters) -> f64 {
        self.kinetic_energy(params) + self.potential_energy(params)
    }
}

/// Right-hand side of the equations of motion.
///
/// Maps `[R, R', φ, φ']` to `[R', R'', φ', φ'']`.
pub fn derivatives(y: &StateVector, params: &SimulationParameters) -> StateVector {
    let [r, dr, phi, dphi] = *y;
    let m = params.mass;
    let k = params.spring_constant;
    let r0 = params.natural_length;
    let g = params.gravity;
    let c = params.damping;

    let d2r = r * dphi * dphi - (k / m) * (r - r0) + g * phi.cos() - (c / m) * dr;
    let d2phi = -g * phi.sin() / r - 2.0 * (dr / r) * dphi - (c / m) * dphi;

    [dr, d2r, dphi, d2phi]
}

/// Advances `motion` by one RK4 step of length `dt`.
///
/// The resulting spring length is floored at [`MIN_SPRING_LENGTH`]; the
/// other components are returned as computed.
pub fn rk4_step(motion: Motion, params: &SimulationParameters, dt: f64) -> Motion {
    let y = motion.to_vector();
    let half = dt / 2.0;

    let k1 = derivatives(&y, params);
    let k2 = derivatives(&offset(&y, &k1, half), params);
    let k3 = derivatives(&offset(&y, &k2, half), params);
    let k4 = derivatives(&offset(&y, &k3, dt), params);

    let sixth = dt / 6.0;
    let mut next = [0.0; 4];
    for i in 0..4 {
        next[i] = y[i] + (k1[i] + k2[i] * 2.0 + k3[i] * 2.0 + k4[i]) * sixth;
    }
    next[0] = next[0].max(MIN_SPRING_LENGTH);

    Motion::from_vector(next)
}

#[inline]
fn offset(y: &StateVector, slope: &StateVector, h: f64) -> StateVector {
    [
        y[0] + slope[0] * h,
        y[1] + slope[1] * h,
        y[2] + slope[2] * h,
        y[3] + slope[3] * h,
    ]
}
