//! flash-run
//!
//! Build, flash and run firmware for an ESP32 development board in one go.
//!
//! # Steps
//!
//! 1. Read `cargo metadata` for the project to find the firmware package
//! 2. Locate the board's USB serial device
//! 3. `cargo build` for the device target
//! 4. Flash the binary with `espflash`
//! 5. Send an input file over the serial line (terminated by EOT) and print
//!    what the firmware writes back
//!
//! # Usage
//!
//! ```bash
//! # Solve day 1 with the default target and release profile
//! flash-run day_1 inputs/day01.txt
//!
//! # Debug build on an explicit port
//! flash-run day_1 inputs/day01.txt --profile dev -p /dev/ttyACM0
//! ```
//!
//! Defaults can also be set in `<project_dir>/flash-run.toml`.

mod cargo;
mod command;
mod config;
mod error;
mod flash;
mod pipeline;
mod serial;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use config::{FileConfig, Overrides, RunConfig};

/// flash-run
///
/// Build, flash and run embedded firmware with input over serial
#[derive(Parser)]
#[command(name = "flash-run")]
#[command(author = "Prasanna Gautam")]
#[command(version = "0.1.0")]
#[command(about = "Build, flash and run embedded firmware with input over serial")]
struct Cli {
    /// Cargo project (or workspace member) containing the firmware
    project_dir: PathBuf,

    /// File whose contents are sent to the device
    input_file: PathBuf,

    #[arg(long, help = format!("Compilation target [default: {}]", config::DEFAULT_TARGET))]
    target: Option<String>,

    #[arg(long, help = format!("Cargo profile [default: {}]", config::DEFAULT_PROFILE))]
    profile: Option<String>,

    /// Serial port path (skips auto-detection)
    #[arg(short, long)]
    port: Option<PathBuf>,

    #[arg(short, long, help = format!("Baud rate [default: {}]", config::DEFAULT_BAUD_RATE))]
    baud: Option<u32>,

    /// Configuration file [default: <PROJECT_DIR>/flash-run.toml if present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let file = FileConfig::discover(cli.config.as_deref(), &cli.project_dir)?;
    let overrides = Overrides {
        target: cli.target,
        profile: cli.profile,
        port: cli.port,
        baud_rate: cli.baud,
    };
    let config = RunConfig::resolve(cli.project_dir, cli.input_file, file, overrides);
    log::debug!("{:?}", config);

    pipeline::run(&config, &mut pipeline::Toolchain)
}
