#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]

//! # Pendulum Engine
//!
//! Runs a [`pendulum`] simulation in real time on a dedicated thread and
//! fans its snapshots out to any number of observers.
//!
//! Pendulum Engine provides:
//! - **SimulationEngine**: the background loop plus thread-safe
//!   start/stop/reset/parameter/speed commands
//! - **SimulationObserver**: the callback trait subscribers implement
//! - **ChannelObserver**: forwards callbacks into an `mpsc` channel
//! - **SeriesRecorder**: a bounded `(time, value)` history for charting
//! - **EngineConfig**: broadcast cadence, speed range and step size
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pendulum::Parameter;
//! use pendulum_engine::{SeriesRecorder, SimulationEngine};
//!
//! let engine = SimulationEngine::new()?;
//! let chart = Arc::new(SeriesRecorder::new(Parameter::SpringLength));
//! engine.subscribe(chart.clone());
//!
//! engine.start();
//! std::thread::sleep(Duration::from_secs(2));
//! engine.stop();
//!
//! for (t, r) in chart.points() {
//!     println!("{t:.3}\t{r:.4}");
//! }
//! # Ok::<(), pendulum_engine::Error>(())
//! ```
//!
//! ## Threading
//!
//! Every observer callback runs on the engine thread. Snapshots are `Copy`
//! values, so each subscriber gets its own. Lifecycle notifications
//! (`started`, `stopped`, `reset`) are always delivered before the next
//! state update that follows the command that caused them.

mod config;
mod engine;
mod error;
mod observer;
mod recorder;
mod subscribers;
#[cfg(test)]
mod testing;

pub use config::{BROADCAST_INTERVAL, EngineConfig, MAX_SPEED, MIN_SPEED, YIELD_INTERVAL};
pub use engine::SimulationEngine;
pub use error::{Error, Result};
pub use observer::{ChannelObserver, SimulationEvent, SimulationObserver};
pub use recorder::{DEFAULT_SERIES_CAPACITY, SeriesBounds, SeriesRecorder};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::engine::SimulationEngine;
    pub use crate::observer::{ChannelObserver, SimulationEvent, SimulationObserver};
    pub use crate::recorder::SeriesRecorder;
    pub use pendulum::prelude::*;
}
