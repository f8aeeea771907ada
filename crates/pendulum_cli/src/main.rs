#![forbid(unsafe_code)]
#![allow(clippy::float_cmp)]

//! # spring-pendulum
//!
//! Headless driver for the spring pendulum engine.
//!
//! ## Usage
//!
//! ```bash
//! spring-pendulum run --duration 5 --speed 2   # real time, printed as it runs
//! spring-pendulum integrate --until 30         # offline, deterministic
//! spring-pendulum parameters                   # column names
//! ```

mod cli;
mod commands;
mod config;
mod output;

use std::io;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::Settings;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(&cli);

    if let Command::Parameters = cli.command {
        return output::write_parameter_list(io::stdout().lock());
    }

    let settings = Settings::resolve(&cli)?;
    tracing::debug!(parameters = %settings.parameters, speed = settings.speed, "Resolved settings");

    let stdout = io::stdout().lock();
    match &cli.command {
        Command::Run(args) => commands::run(&settings, args, stdout),
        Command::Integrate(args) => commands::integrate(&settings, args, stdout),
        Command::Parameters => Ok(()),
    }
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` wins over
/// `-v`.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().as_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
