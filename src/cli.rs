//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate dynamic help text for the driver argument
fn driver_help() -> String {
    format!(
        "Driver to use, optionally with options (name:key=value,...) [available: {}]",
        oceanctl_session::driver_names_short()
    )
}

#[derive(Parser)]
#[command(name = "oceanctl")]
#[command(author, version, about = "Ocean Optics spectrometer control", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (TOML)
    /// Defaults to ./oceanctl.toml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Device options shared across commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DeviceArgs {
    #[arg(short, long, help = driver_help())]
    pub driver: Option<String>,

    /// Spectrometer number as shown by `list` (1-based)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), conflicts_with = "serial")]
    pub device: Option<u32>,

    /// Spectrometer serial number
    #[arg(long)]
    pub serial: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List supported drivers
    ListDrivers,

    /// List attached spectrometers
    List {
        #[arg(short, long, help = driver_help())]
        driver: Option<String>,
    },

    /// Show device configuration
    Info {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Acquire a single spectrum
    Acquire {
        #[command(flatten)]
        device: DeviceArgs,

        /// Integration time in microseconds
        #[arg(short = 't', long)]
        integration_time: Option<u32>,

        /// Print a summary instead of the full table
        #[arg(long)]
        summary: bool,
    },

    /// Acquire and average several spectra
    Average {
        #[command(flatten)]
        device: DeviceArgs,

        /// Number of spectra to average
        #[arg(short = 'n', long, default_value_t = 2, allow_negative_numbers = true)]
        samples: i64,

        /// Integration time in microseconds
        #[arg(short = 't', long)]
        integration_time: Option<u32>,

        /// Print a summary instead of the full table
        #[arg(long)]
        summary: bool,
    },
}
