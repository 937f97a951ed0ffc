//! The build, flash, run sequence
//!
//! Each step either completes or aborts the run; nothing is retried.

use crate::cargo::{self, Metadata};
use crate::config::RunConfig;
use crate::flash;
use crate::serial::{self, PortConfig};
use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// The external actions a run is made of
pub trait Steps {
    fn metadata(&mut self, config: &RunConfig) -> Result<Metadata>;
    fn find_port(&mut self, config: &RunConfig) -> Result<PathBuf>;
    fn build(&mut self, config: &RunConfig) -> Result<()>;
    fn flash(
        &mut self,
        config: &RunConfig,
        artifact_dir: &Path,
        package: &str,
        port: &Path,
    ) -> Result<()>;
    fn monitor(&mut self, config: &RunConfig, port: &Path) -> Result<()>;
}

/// Steps backed by cargo, espflash and a real serial port
pub struct Toolchain;

impl Steps for Toolchain {
    fn metadata(&mut self, config: &RunConfig) -> Result<Metadata> {
        cargo::read_metadata(&config.cargo, &config.project_dir)
    }

    fn find_port(&mut self, config: &RunConfig) -> Result<PathBuf> {
        match &config.port {
            Some(port) => Ok(port.clone()),
            None => serial::find_serial_port(&config.device_dir, &config.port_prefix),
        }
    }

    fn build(&mut self, config: &RunConfig) -> Result<()> {
        cargo::build(&config.cargo, &config.project_dir, &config.target, &config.profile)
    }

    fn flash(
        &mut self,
        config: &RunConfig,
        artifact_dir: &Path,
        package: &str,
        port: &Path,
    ) -> Result<()> {
        flash::flash(&config.flasher, artifact_dir, package, port)
    }

    fn monitor(&mut self, config: &RunConfig, port: &Path) -> Result<()> {
        let port_config = PortConfig::new(port)
            .with_baud_rate(config.baud_rate)
            .with_timeout(config.read_timeout);
        serial::run_monitor(port_config, &config.input_file)
    }
}

/// Run every step in order, stopping at the first failure
pub fn run<S: Steps + ?Sized>(config: &RunConfig, steps: &mut S) -> Result<()> {
    let metadata = steps.metadata(config)?;
    let package = cargo::firmware_package(&metadata, &config.shared_package)?;
    let artifact_dir = cargo::artifact_dir(
        metadata.target_directory.as_std_path(),
        &config.target,
        &config.profile,
    );
    let port = steps.find_port(config)?;

    log::info!(
        "Package {}, port {}, target {} ({})",
        package.name,
        port.display(),
        config.target,
        config.profile
    );

    println!("{}", "# Compiling".cyan().bold());
    steps.build(config)?;
    println!();

    println!("{}", "# Flashing".cyan().bold());
    steps.flash(config, &artifact_dir, &package.name, &port)?;
    println!();

    println!("{}", "# Connecting".cyan().bold());
    steps.monitor(config, &port)?;
    println!();

    Ok(())
}
