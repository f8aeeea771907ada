//! Observer capability set and ready-made adapters.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use pendulum::PhysicsState;

/// Receives snapshots and lifecycle notifications from a
/// [`SimulationEngine`](crate::SimulationEngine).
///
/// All callbacks run on the engine thread, one subscriber after another.
/// They should return quickly: a slow subscriber delays the next pass for
/// everyone. Consumers that need to act on another thread (a UI thread,
/// an async task) should forward events, as [`ChannelObserver`] does.
///
/// Only [`on_state_update`](Self::on_state_update) is required; the
/// lifecycle callbacks default to doing nothing.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use pendulum::PhysicsState;
/// use pendulum_engine::SimulationObserver;
///
/// #[derive(Default)]
/// struct FrameCounter(AtomicUsize);
///
/// impl SimulationObserver for FrameCounter {
///     fn on_state_update(&self, _state: PhysicsState) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait SimulationObserver: Send + Sync {
    /// A new snapshot is available.
    fn on_state_update(&self, state: PhysicsState);

    /// The simulation went from stopped to running.
    fn on_simulation_started(&self) {}

    /// The simulation went from running to stopped.
    fn on_simulation_stopped(&self) {}

    /// The simulation returned to its initial conditions. A state update
    /// carrying the reset snapshot follows immediately.
    fn on_simulation_reset(&self) {}
}

/// One observer callback, as a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationEvent {
    /// See [`SimulationObserver::on_state_update`].
    StateUpdate(PhysicsState),
    /// See [`SimulationObserver::on_simulation_started`].
    Started,
    /// See [`SimulationObserver::on_simulation_stopped`].
    Stopped,
    /// See [`SimulationObserver::on_simulation_reset`].
    Reset,
}

impl SimulationEvent {
    /// The snapshot, for state updates.
    pub fn state(&self) -> Option<&PhysicsState> {
        match self {
            Self::StateUpdate(state) => Some(state),
            _ => None,
        }
    }
}

/// Forwards every callback into an [`mpsc`] channel.
///
/// This moves delivery off the engine thread: the engine only pays for a
/// channel send, and the receiving side handles events on whatever thread
/// owns the [`Receiver`]. Events from a receiver that has been dropped are
/// discarded.
///
/// # Example
///
/// ```rust,no_run
/// use pendulum_engine::{ChannelObserver, SimulationEngine, SimulationEvent};
///
/// let engine = SimulationEngine::new()?;
/// let (observer, events) = ChannelObserver::new();
/// engine.subscribe(observer);
/// engine.start();
///
/// for event in events.iter().take(10) {
///     if let SimulationEvent::StateUpdate(state) = event {
///         println!("{state}");
///     }
/// }
/// # Ok::<(), pendulum_engine::Error>(())
/// ```
#[derive(Debug)]
pub struct ChannelObserver {
    tx: Sender<SimulationEvent>,
}

impl ChannelObserver {
    /// Creates an observer and the receiving end of its channel.
    pub fn new() -> (Arc<Self>, Receiver<SimulationEvent>) {
        let (tx, rx) = mpsc::channel();
        (Arc::new(Self { tx }), rx)
    }

    /// Wraps an existing sender.
    pub fn from_sender(tx: Sender<SimulationEvent>) -> Arc<Self> {
        Arc::new(Self { tx })
    }

    fn send(&self, event: SimulationEvent) {
        let _ = self.tx.send(event);
    }
}

impl SimulationObserver for ChannelObserver {
    fn on_state_update(&self, state: PhysicsState) {
        self.send(SimulationEvent::StateUpdate(state));
    }

    fn on_simulation_started(&self) {
        self.send(SimulationEvent::Started);
    }

    fn on_simulation_stopped(&self) {
        self.send(SimulationEvent::Stopped);
    }

    fn on_simulation_reset(&self) {
        self.send(SimulationEvent::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pendulum::{Motion, SimulationParameters};

    fn state_at(time: f64, spring_length: f64) -> PhysicsState {
        let params = SimulationParameters::default();
        let motion = Motion {
            spring_length,
            ..Motion::at_rest(&params)
        };
        PhysicsState::from_motion(time, motion, &params)
    }

    #[test]
    fn test_channel_observer_forwards_in_order() {
        let (observer, rx) = ChannelObserver::new();
        let state = state_at(0.5, 1.2);

        observer.on_simulation_started();
        observer.on_state_update(state);
        observer.on_simulation_stopped();
        observer.on_simulation_reset();

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                SimulationEvent::Started,
                SimulationEvent::StateUpdate(state),
                SimulationEvent::Stopped,
                SimulationEvent::Reset,
            ]
        );
        assert_eq!(events[1].state(), Some(&state));
        assert_eq!(events[0].state(), None);
    }

    #[test]
    fn test_channel_observer_survives_dropped_receiver() {
        let (observer, rx) = ChannelObserver::new();
        drop(rx);
        observer.on_state_update(state_at(0.0, 1.0));
        observer.on_simulation_reset();
    }
}
