//! Command-line interface for `spring-pendulum`.
//!
//! # Examples
//!
//! ```bash
//! # Three wall-clock seconds of the default pendulum
//! spring-pendulum run --duration 3
//!
//! # Ten simulated seconds, offline, as JSON lines
//! spring-pendulum --damping 0 integrate --until 10 --format json
//!
//! # Parameters from a file, one override on top
//! spring-pendulum -c pendulum.toml --mass 2 run --speed 4
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pendulum::Parameter;

/// Spring pendulum simulator.
///
/// A mass on an elastic spring, swinging and stretching under gravity,
/// integrated with fixed-step RK4.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "spring-pendulum",
    author,
    version,
    about = "Spring pendulum simulator"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    ///
    /// `RUST_LOG` takes precedence when set
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// TOML configuration file
    ///
    /// Holds a `[parameters]` table and an `[engine]` table; every key is
    /// optional
    #[arg(long, short = 'c', env = "SPRING_PENDULUM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ParameterOverrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Physical parameters given on the command line. Each one overrides the
/// configuration file.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ParameterOverrides {
    /// Bob mass (kg)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub mass: Option<f64>,

    /// Spring constant (N/m)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub stiffness: Option<f64>,

    /// Natural spring length (m)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub natural_length: Option<f64>,

    /// Spring length at release (m)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub initial_length: Option<f64>,

    /// Release angle from the downward vertical (rad)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub initial_angle: Option<f64>,

    /// Damping coefficient (kg/s)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub damping: Option<f64>,

    /// Gravitational acceleration (m/s²)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub gravity: Option<f64>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the real-time engine and print its snapshots
    Run(RunArgs),

    /// Integrate offline, as fast as possible, and print samples
    Integrate(IntegrateArgs),

    /// List the parameters that can be shown as columns
    Parameters,
}

/// Arguments for `run`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Wall-clock seconds to run for
    #[arg(long, short = 'd', default_value_t = 2.0)]
    pub duration: f64,

    /// Speed multiplier, clamped to [0.1, 10] (overrides the config file)
    #[arg(long, short = 's', allow_negative_numbers = true)]
    pub speed: Option<f64>,

    /// Print every N-th snapshot
    #[arg(long, short = 'e', default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub every: u32,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for `integrate`.
#[derive(Args, Debug, Clone)]
pub struct IntegrateArgs {
    /// Simulated seconds to integrate
    #[arg(long, short = 'u', default_value_t = 10.0)]
    pub until: f64,

    /// Simulated seconds between printed samples
    #[arg(long, default_value_t = 0.1)]
    pub sample: f64,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// How snapshots are printed.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Columns shown by the table format, by key or label
    ///
    /// Time is always the first column
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "angle,spring_length,velocity,acceleration"
    )]
    pub columns: Vec<Parameter>,
}

/// Snapshot output formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Aligned text columns
    #[default]
    Table,
    /// One JSON object per snapshot
    Json,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get log level based on verbosity.
    #[must_use]
    pub const fn log_level(&self) -> LogLevel {
        match self.verbose {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Log level for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Only show warnings and errors
    Warn,
    /// Show info messages
    Info,
    /// Show debug messages
    Debug,
    /// Show all messages including trace
    Trace,
}

impl LogLevel {
    /// The matching `tracing` filter directive.
    #[must_use]
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}
