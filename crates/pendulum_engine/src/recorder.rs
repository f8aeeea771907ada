//! Bounded history of one parameter, for charting.

use std::collections::VecDeque;

use parking_lot::Mutex;
use pendulum::{Parameter, PhysicsState};

use crate::observer::SimulationObserver;

/// Default number of points a [`SeriesRecorder`] keeps.
pub const DEFAULT_SERIES_CAPACITY: usize = 500;

/// Extent of the points held by a [`SeriesRecorder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesBounds {
    pub min_time: f64,
    pub max_time: f64,
    pub min_value: f64,
    pub max_value: f64,
}

/// Keeps a bounded `(time, value)` history of one [`Parameter`].
///
/// This is the data side of a time chart: each snapshot appends one point,
/// the oldest point is dropped once `capacity` is reached, and a reset
/// clears the history so the chart starts over from `t = 0`.
///
/// # Example
///
/// ```rust
/// use pendulum::{Motion, Parameter, PhysicsState, SimulationParameters};
/// use pendulum_engine::{SeriesRecorder, SimulationObserver};
///
/// let params = SimulationParameters::default();
/// let recorder = SeriesRecorder::with_capacity(Parameter::SpringLength, 2);
///
/// for t in [0.0, 0.1, 0.2] {
///     recorder.on_state_update(PhysicsState::from_motion(t, Motion::at_rest(&params), &params));
/// }
///
/// assert_eq!(recorder.points(), vec![(0.1, 1.5), (0.2, 1.5)]);
///
/// recorder.on_simulation_reset();
/// assert!(recorder.is_empty());
/// ```
#[derive(Debug)]
pub struct SeriesRecorder {
    parameter: Parameter,
    capacity: usize,
    points: Mutex<VecDeque<(f64, f64)>>,
}

impl SeriesRecorder {
    /// Records `parameter` with the default capacity of 500 points.
    pub fn new(parameter: Parameter) -> Self {
        Self::with_capacity(parameter, DEFAULT_SERIES_CAPACITY)
    }

    /// Records `parameter`, keeping at most `capacity` points (at least one).
    pub fn with_capacity(parameter: Parameter, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            parameter,
            capacity,
            points: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// The recorded parameter.
    pub fn parameter(&self) -> Parameter {
        self.parameter
    }

    /// Maximum number of points kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// A copy of the recorded points, oldest first.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.points.lock().iter().copied().collect()
    }

    /// The most recent point.
    pub fn last(&self) -> Option<(f64, f64)> {
        self.points.lock().back().copied()
    }

    /// Number of recorded points.
    pub fn len(&self) -> usize {
        self.points.lock().len()
    }

    /// True when nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.points.lock().is_empty()
    }

    /// Drops every recorded point.
    pub fn clear(&self) {
        self.points.lock().clear();
    }

    /// Time and value extent of the recorded points, ignoring non-finite
    /// values. `None` when there is nothing finite to bound.
    pub fn bounds(&self) -> Option<SeriesBounds> {
        let points = self.points.lock();
        let mut finite = points
            .iter()
            .filter(|(t, v)| t.is_finite() && v.is_finite());
        let &(t0, v0) = finite.next()?;
        let initial = SeriesBounds {
            min_time: t0,
            max_time: t0,
            min_value: v0,
            max_value: v0,
        };
        Some(finite.fold(initial, |b, &(t, v)| SeriesBounds {
            min_time: b.min_time.min(t),
            max_time: b.max_time.max(t),
            min_value: b.min_value.min(v),
            max_value: b.max_value.max(v),
        }))
    }
}

impl SimulationObserver for SeriesRecorder {
    fn on_state_update(&self, state: PhysicsState) {
        let mut points = self.points.lock();
        if points.len() == self.capacity {
            points.pop_front();
        }
        points.push_back((state.time(), state.value(self.parameter)));
    }

    fn on_simulation_reset(&self) {
        self.clear();
    }
}
