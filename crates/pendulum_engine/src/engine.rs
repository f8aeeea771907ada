//! The background simulation engine.

use std::collections::VecDeque;
use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use parking_lot::{Condvar, Mutex, RwLock};
use pendulum::{Simulation, SimulationParameters};
use tracing::{debug, info, trace, warn};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::observer::SimulationObserver;
use crate::subscribers::{SubscriberList, panic_message};

/// Lifecycle notifications waiting for the loop to deliver them.
#[derive(Debug, Clone, Copy)]
enum Notice {
    Started,
    Stopped,
    Reset(SimulationParameters),
}

#[derive(Debug, Default)]
struct Control {
    pending: VecDeque<Notice>,
}

/// State shared between the engine handle and its loop thread.
struct Shared {
    control: Mutex<Control>,
    wake: Condvar,
    running: AtomicBool,
    alive: AtomicBool,
    /// Speed multiplier stored as `f64` bits.
    speed: AtomicU64,
    params: RwLock<SimulationParameters>,
    subscribers: SubscriberList,
    config: EngineConfig,
}

impl Shared {
    fn speed(&self) -> f64 {
        f64::from_bits(self.speed.load(Ordering::Acquire))
    }

    /// Queues a notice for the loop and wakes it.
    ///
    /// Runs `update` under the control lock, so flag transitions and their
    /// notices are observed by the loop together. Nothing happens after
    /// shutdown.
    fn command(&self, update: impl FnOnce(&mut Control) -> bool) -> bool {
        let mut control = self.control.lock();
        if !self.alive.load(Ordering::Acquire) {
            return false;
        }
        let queued = update(&mut control);
        drop(control);
        if queued {
            self.wake.notify_one();
        }
        queued
    }
}

/// A spring pendulum integrated in real time on a background thread.
///
/// The engine owns the authoritative simulation state. While running it
/// advances the physics by `elapsed wall time × speed` every broadcast
/// interval (16 ms by default) and hands one [`PhysicsState`] snapshot to
/// every subscriber. Commands may be issued from any thread; they change
/// flags or queue work for the loop and return immediately.
///
/// The engine starts stopped. Dropping it shuts the thread down.
///
/// # Lifecycle
///
/// | Command | Effect | Notification |
/// |---------|--------|--------------|
/// | [`start`](Self::start) | stopped → running | `on_simulation_started` once per transition |
/// | [`stop`](Self::stop) | running → stopped | `on_simulation_stopped` once per transition |
/// | [`reset`](Self::reset) | back to initial conditions, run state kept | `on_simulation_reset`, then one state update |
/// | [`set_parameters`](Self::set_parameters) | new parameters, then reset | as for `reset` |
/// | [`shutdown`](Self::shutdown) | terminal; later commands are ignored | none |
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use pendulum_engine::{ChannelObserver, SimulationEngine, SimulationEvent};
///
/// let engine = SimulationEngine::new()?;
/// let (observer, events) = ChannelObserver::new();
/// engine.subscribe(observer);
///
/// engine.set_simulation_speed(2.0);
/// engine.start();
///
/// while let Ok(event) = events.recv_timeout(Duration::from_secs(1)) {
///     if let SimulationEvent::StateUpdate(state) = event {
///         if state.time() > 5.0 {
///             break;
///         }
///     }
/// }
///
/// engine.shutdown();
/// # Ok::<(), pendulum_engine::Error>(())
/// ```
///
/// [`PhysicsState`]: pendulum::PhysicsState
pub struct SimulationEngine {
    shared: Arc<Shared>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl SimulationEngine {
    /// Spawns an engine with the default configuration and parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the background thread cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Spawns an engine with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration does not
    /// validate, or [`Error::Spawn`] if the background thread cannot be
    /// created.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let speed = config.clamp_speed(config.initial_speed);
        let simulation = Simulation::with_time_step(config.parameters, config.time_step);
        let shared = Arc::new(Shared {
            control: Mutex::new(Control::default()),
            wake: Condvar::new(),
            running: AtomicBool::new(false),
            alive: AtomicBool::new(true),
            speed: AtomicU64::new(speed.to_bits()),
            params: RwLock::new(config.parameters),
            subscribers: SubscriberList::new(),
            config,
        });

        let loop_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(shared.config.thread_name.clone())
            .spawn(move || run_loop(&loop_shared, simulation))
            .map_err(Error::Spawn)?;

        info!(
            thread = %shared.config.thread_name,
            time_step = shared.config.time_step,
            broadcast_interval = ?shared.config.broadcast_interval,
            speed,
            "Simulation engine spawned"
        );

        Ok(Self {
            shared,
            thread: Mutex::new(Some(handle)),
        })
    }

    /// Starts (or resumes) the simulation. No-op if already running.
    pub fn start(&self) {
        let started = self.shared.command(|control| {
            if self.shared.running.swap(true, Ordering::AcqRel) {
                return false;
            }
            control.pending.push_back(Notice::Started);
            true
        });
        if started {
            info!("Simulation started");
        }
    }

    /// Pauses the simulation. No-op if already stopped.
    pub fn stop(&self) {
        let stopped = self.shared.command(|control| {
            if !self.shared.running.swap(false, Ordering::AcqRel) {
                return false;
            }
            control.pending.push_back(Notice::Stopped);
            true
        });
        if stopped {
            info!("Simulation stopped");
        }
    }

    /// Returns the simulation to its initial conditions.
    ///
    /// The run state is kept: a running simulation keeps running from
    /// `t = 0`. Subscribers get `on_simulation_reset` followed by a state
    /// update carrying the reset snapshot.
    pub fn reset(&self) {
        let queued = self.shared.command(|control| {
            let params = *self.shared.params.read();
            control.pending.push_back(Notice::Reset(params));
            true
        });
        if queued {
            debug!("Simulation reset requested");
        }
    }

    /// Replaces the physical parameters and resets.
    ///
    /// Parameters are not validated here; values outside their physical
    /// range are accepted and show up as non-finite snapshot values. Use
    /// [`try_set_parameters`](Self::try_set_parameters) to reject them.
    pub fn set_parameters(&self, params: SimulationParameters) {
        let queued = self.shared.command(|control| {
            *self.shared.params.write() = params;
            control.pending.push_back(Notice::Reset(params));
            true
        });
        if queued {
            debug!(%params, "Simulation parameters replaced");
        }
    }

    /// Validates `params`, then behaves like
    /// [`set_parameters`](Self::set_parameters).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameters`] naming the first out-of-range
    /// field. The current parameters are left untouched.
    pub fn try_set_parameters(&self, params: SimulationParameters) -> Result<()> {
        params.validate()?;
        self.set_parameters(params);
        Ok(())
    }

    /// A copy of the current parameters.
    pub fn parameters(&self) -> SimulationParameters {
        *self.shared.params.read()
    }

    /// True while the simulation is running.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// True until [`shutdown`](Self::shutdown).
    pub fn is_alive(&self) -> bool {
        self.shared.alive.load(Ordering::Acquire)
    }

    /// Sets the speed multiplier, clamped to the configured range
    /// (`[0.1, 10.0]` by default). `NaN` selects the minimum.
    ///
    /// The multiplier scales how much simulated time passes per wall-clock
    /// interval; the integration step stays fixed.
    pub fn set_simulation_speed(&self, speed: f64) {
        if !self.is_alive() {
            return;
        }
        let clamped = self.shared.config.clamp_speed(speed);
        self.shared.speed.store(clamped.to_bits(), Ordering::Release);
        debug!(requested = speed, speed = clamped, "Simulation speed set");
    }

    /// The current speed multiplier.
    pub fn simulation_speed(&self) -> f64 {
        self.shared.speed()
    }

    /// Adds an observer. Returns `false` if this exact `Arc` is already
    /// subscribed or the engine has shut down.
    pub fn subscribe(&self, observer: Arc<dyn SimulationObserver>) -> bool {
        if !self.is_alive() {
            return false;
        }
        let added = self.shared.subscribers.add(observer);
        debug!(added, total = self.shared.subscribers.len(), "Subscribe");
        added
    }

    /// Removes an observer by identity. Returns `false` if it was not
    /// subscribed.
    ///
    /// Safe to call from inside a callback, including for the observer
    /// being called.
    pub fn unsubscribe<O: SimulationObserver + ?Sized>(&self, observer: &Arc<O>) -> bool {
        let removed = self.shared.subscribers.remove(observer);
        debug!(removed, total = self.shared.subscribers.len(), "Unsubscribe");
        removed
    }

    /// Number of current subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.len()
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    /// Stops the loop and waits for the thread to exit.
    ///
    /// Terminal and idempotent. Pending notifications are discarded and
    /// every subscriber is released. When called from a subscriber
    /// callback the thread is not joined (it exits once the callback
    /// returns).
    pub fn shutdown(&self) {
        {
            let _control = self.shared.control.lock();
            if !self.shared.alive.swap(false, Ordering::AcqRel) {
                return;
            }
            self.shared.running.store(false, Ordering::Release);
        }
        self.shared.wake.notify_all();

        let handle = self.thread.lock().take();
        if let Some(handle) = handle {
            if handle.thread().id() == thread::current().id() {
                debug!("Shutdown requested from the simulation thread, not joining");
            } else {
                join_loop(handle);
            }
        }
        self.shared.subscribers.clear();
        info!("Simulation engine shut down");
    }
}

impl Drop for SimulationEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("running", &self.is_running())
            .field("alive", &self.is_alive())
            .field("speed", &self.simulation_speed())
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

/// Waits for the loop thread, reporting a panic instead of dropping it.
fn join_loop(handle: JoinHandle<()>) {
    if let Err(payload) = handle.join() {
        warn!(
            reason = panic_message(payload.as_ref()),
            "Simulation thread panicked"
        );
    }
}

/// Body of the simulation thread.
///
/// Each pass delivers queued notices, integrates and broadcasts if a
/// broadcast interval has elapsed, then sleeps for at most one yield
/// interval. Commands wake the sleep early.
fn run_loop(shared: &Shared, mut simulation: Simulation) {
    let config = &shared.config;
    let mut last_broadcast = Instant::now();
    debug!("Simulation loop entered");

    loop {
        let (notices, running) = {
            let mut control = shared.control.lock();
            if !shared.alive.load(Ordering::Acquire) {
                break;
            }
            (
                mem::take(&mut control.pending),
                shared.running.load(Ordering::Acquire),
            )
        };

        for notice in notices {
            match notice {
                Notice::Started => {
                    last_broadcast = Instant::now();
                    shared
                        .subscribers
                        .broadcast("started", |o| o.on_simulation_started());
                }
                Notice::Stopped => {
                    shared
                        .subscribers
                        .broadcast("stopped", |o| o.on_simulation_stopped());
                }
                Notice::Reset(params) => {
                    simulation.set_parameters(params);
                    last_broadcast = Instant::now();
                    let state = simulation.snapshot();
                    shared
                        .subscribers
                        .broadcast("reset", |o| o.on_simulation_reset());
                    shared
                        .subscribers
                        .broadcast("state_update", |o| o.on_state_update(state));
                }
            }
        }

        if running {
            // Time spent integrating and in callbacks counts toward the next interval
            let now = Instant::now();
            let elapsed = now.saturating_duration_since(last_broadcast);
            if elapsed >= config.broadcast_interval {
                let simulated = elapsed.as_secs_f64() * shared.speed();
                let steps = simulation.steps_for(simulated);
                simulation.advance(steps);
                let state = simulation.snapshot();
                trace!(steps, time = state.time(), "Broadcasting snapshot");
                shared
                    .subscribers
                    .broadcast("state_update", |o| o.on_state_update(state));
                last_broadcast = now;
            }
        } else {
            last_broadcast = Instant::now();
        }

        let mut control = shared.control.lock();
        if shared.alive.load(Ordering::Acquire) && control.pending.is_empty() {
            shared.wake.wait_for(&mut control, config.yield_interval);
        }
    }

    debug!(time = simulation.time(), steps = simulation.steps(), "Simulation loop exited");
}
