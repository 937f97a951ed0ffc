//! Run configuration
//!
//! Settings come from three layers: command-line flags, an optional
//! `flash-run.toml` and built-in defaults. The merged result is a single
//! [`RunConfig`] handed to every step.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default compilation target (ESP32-C3)
pub const DEFAULT_TARGET: &str = "riscv32imc-unknown-none-elf";
/// Default cargo profile
pub const DEFAULT_PROFILE: &str = "release";
/// Library package shared by all firmware crates in the workspace
pub const DEFAULT_SHARED_PACKAGE: &str = "aoc-common";
/// Directory scanned for serial devices
pub const DEFAULT_DEVICE_DIR: &str = "/dev";
/// File name prefix of USB CDC modem devices on macOS
pub const DEFAULT_PORT_PREFIX: &str = "tty.usbmodem";
pub const DEFAULT_BAUD_RATE: u32 = 115200;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;
/// Name of the configuration file looked up in the project directory
pub const CONFIG_FILE_NAME: &str = "flash-run.toml";

/// Contents of a `flash-run.toml`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub target: Option<String>,
    pub profile: Option<String>,
    pub shared_package: Option<String>,
    pub port: Option<PathBuf>,
    pub device_dir: Option<PathBuf>,
    pub port_prefix: Option<String>,
    pub baud_rate: Option<u32>,
    pub read_timeout_ms: Option<u64>,
    pub cargo: Option<String>,
    pub flasher: Option<String>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Load `explicit` if given, otherwise `<project_dir>/flash-run.toml` when
    /// it exists. A missing implicit file yields the empty configuration.
    pub fn discover(explicit: Option<&Path>, project_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let implicit = project_dir.join(CONFIG_FILE_NAME);
        if implicit.is_file() {
            log::debug!("Using config file {}", implicit.display());
            Self::load(&implicit)
        } else {
            Ok(Self::default())
        }
    }
}

/// Settings given on the command line; `None` means "not specified"
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub target: Option<String>,
    pub profile: Option<String>,
    pub port: Option<PathBuf>,
    pub baud_rate: Option<u32>,
}

/// Fully resolved settings for one build-flash-run cycle
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub project_dir: PathBuf,
    pub input_file: PathBuf,
    pub target: String,
    pub profile: String,
    pub shared_package: String,
    /// Explicit port; skips device discovery when set
    pub port: Option<PathBuf>,
    pub device_dir: PathBuf,
    pub port_prefix: String,
    pub baud_rate: u32,
    pub read_timeout: Duration,
    pub cargo: String,
    pub flasher: String,
}

impl RunConfig {
    /// Merge the layers: command line wins over file, file over defaults
    pub fn resolve(
        project_dir: PathBuf,
        input_file: PathBuf,
        file: FileConfig,
        cli: Overrides,
    ) -> Self {
        Self {
            project_dir,
            input_file,
            target: cli
                .target
                .or(file.target)
                .unwrap_or_else(|| DEFAULT_TARGET.to_string()),
            profile: cli
                .profile
                .or(file.profile)
                .unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
            shared_package: file
                .shared_package
                .unwrap_or_else(|| DEFAULT_SHARED_PACKAGE.to_string()),
            port: cli.port.or(file.port),
            device_dir: file
                .device_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DEVICE_DIR)),
            port_prefix: file
                .port_prefix
                .unwrap_or_else(|| DEFAULT_PORT_PREFIX.to_string()),
            baud_rate: cli
                .baud_rate
                .or(file.baud_rate)
                .unwrap_or(DEFAULT_BAUD_RATE),
            read_timeout: Duration::from_millis(
                file.read_timeout_ms.unwrap_or(DEFAULT_READ_TIMEOUT_MS),
            ),
            cargo: file.cargo.unwrap_or_else(|| "cargo".to_string()),
            flasher: file.flasher.unwrap_or_else(|| "espflash".to_string()),
        }
    }
}
