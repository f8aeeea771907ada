//! Subcommand implementations.

use std::io::Write;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use pendulum::Simulation;
use pendulum_engine::{ChannelObserver, EngineConfig, SimulationEngine, SimulationEvent};
use tracing::{debug, info};

use crate::cli::{IntegrateArgs, RunArgs};
use crate::config::Settings;
use crate::output::SnapshotWriter;

/// Longest offline integration accepted, in simulated seconds.
pub const MAX_UNTIL: f64 = 100_000.0;

/// Runs the real-time engine for `args.duration` wall seconds.
///
/// The engine is reset before it starts, so the first printed snapshot is
/// the release state at `t = 0`.
///
/// # Errors
///
/// Returns an error for a duration that is not positive or does not fit the
/// clock, if the engine cannot be spawned, or if writing fails.
pub fn run(settings: &Settings, args: &RunArgs, out: impl Write) -> Result<()> {
    if !(args.duration.is_finite() && args.duration > 0.0) {
        bail!("--duration must be a positive number of seconds, got {}", args.duration);
    }

    let Some(deadline) = Duration::try_from_secs_f64(args.duration)
        .ok()
        .and_then(|duration| Instant::now().checked_add(duration))
    else {
        bail!("--duration {} is too large", args.duration);
    };

    let config = EngineConfig::default()
        .parameters(settings.parameters)
        .initial_speed(args.speed.unwrap_or(settings.speed));
    let engine = SimulationEngine::with_config(config).context("failed to start simulation engine")?;
    let (observer, events) = ChannelObserver::new();
    engine.subscribe(observer);

    let mut writer = SnapshotWriter::new(out, args.output.format, &args.output.columns);
    let every = u64::from(args.every);
    let mut updates = 0u64;

    engine.reset();
    engine.start();
    info!(
        duration = args.duration,
        speed = engine.simulation_speed(),
        "Running simulation"
    );

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        match events.recv_timeout(remaining) {
            Ok(SimulationEvent::StateUpdate(state)) => {
                if updates % every == 0 {
                    writer.write(&state)?;
                }
                updates += 1;
            }
            Ok(event) => debug!(?event, "Lifecycle event"),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
        }
    }

    engine.stop();
    engine.shutdown();
    info!(updates, printed = writer.rows(), "Simulation finished");
    writer.finish()?;
    Ok(())
}

/// Integrates offline to `args.until` simulated seconds, printing a sample
/// every `args.sample` seconds (plus the initial state).
///
/// # Errors
///
/// Returns an error for invalid time arguments (including `until` beyond
/// [`MAX_UNTIL`]) or if writing fails.
pub fn integrate(settings: &Settings, args: &IntegrateArgs, out: impl Write) -> Result<()> {
    if !(args.until.is_finite() && args.until >= 0.0) {
        bail!("--until must be a non-negative number of seconds, got {}", args.until);
    }
    if args.until > MAX_UNTIL {
        bail!("--until must be at most {MAX_UNTIL} seconds, got {}", args.until);
    }
    if !(args.sample.is_finite() && args.sample > 0.0) {
        bail!("--sample must be a positive number of seconds, got {}", args.sample);
    }

    let mut simulation = Simulation::new(settings.parameters);
    let total = simulation.steps_for(args.until + simulation.time_step() * 1e-6);
    let per_sample = simulation
        .steps_for(args.sample + simulation.time_step() * 1e-6)
        .max(1);
    debug!(total, per_sample, "Integrating offline");

    let mut writer = SnapshotWriter::new(out, args.output.format, &args.output.columns);
    writer.write(&simulation.snapshot())?;
    while simulation.steps() < total {
        let chunk = per_sample.min(total - simulation.steps());
        simulation.advance(chunk);
        writer.write(&simulation.snapshot())?;
    }

    info!(
        steps = simulation.steps(),
        samples = writer.rows(),
        energy = simulation.energy(),
        "Integration finished"
    );
    writer.finish()?;
    Ok(())
}
