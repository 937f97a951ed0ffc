//! Serial port discovery and connection management
//!
//! Handles locating the USB modem device the board enumerates as and
//! opening it for the monitor session.

use crate::error::RunError;
use anyhow::{Context, Result};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for serial port connection
#[derive(Debug, Clone)]
pub struct PortConfig {
    /// Serial port path (e.g., /dev/tty.usbmodem1423)
    pub port_path: PathBuf,
    /// Baud rate (ignored by USB CDC devices)
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    /// Read timeout; a read that sees no data for this long returns short
    pub timeout: Duration,
}

impl PortConfig {
    /// 8N1, no flow control, 115200 baud, one second read timeout
    pub fn new(port_path: impl Into<PathBuf>) -> Self {
        Self {
            port_path: port_path.into(),
            baud_rate: crate::config::DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            timeout: Duration::from_millis(crate::config::DEFAULT_READ_TIMEOUT_MS),
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// An open serial port. The port is closed when this value is dropped.
pub struct SerialConnection {
    port: Box<dyn SerialPort>,
    config: PortConfig,
}

impl SerialConnection {
    /// Open a serial connection with the given configuration
    pub fn open(config: PortConfig) -> Result<Self> {
        let path = config.port_path.to_string_lossy();
        let port = serialport::new(path.as_ref(), config.baud_rate)
            .data_bits(config.data_bits)
            .parity(config.parity)
            .stop_bits(config.stop_bits)
            .flow_control(config.flow_control)
            .timeout(config.timeout)
            .open()
            .with_context(|| format!("Failed to open serial port: {}", path))?;

        log::debug!(
            "Opened {} at {} baud, timeout {:?}",
            path,
            config.baud_rate,
            config.timeout
        );

        Ok(Self { port, config })
    }

    pub fn config(&self) -> &PortConfig {
        &self.config
    }
}

impl Read for SerialConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

impl Drop for SerialConnection {
    fn drop(&mut self) {
        log::debug!("Closing {}", self.config.port_path.display());
    }
}

/// Pick the first name in `names` starting with `prefix`, in the order given
pub fn select_port<I, S>(dir: &Path, names: I, prefix: &str) -> Result<PathBuf, RunError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut matches = names.into_iter().filter_map(|name| {
        let name: &str = name.as_ref();
        name.starts_with(prefix).then(|| name.to_string())
    });

    let first = matches.next().ok_or_else(|| RunError::PortNotFound {
        dir: dir.to_path_buf(),
        prefix: prefix.to_string(),
    })?;

    let others: Vec<String> = matches.collect();
    if !others.is_empty() {
        log::warn!(
            "Several serial devices match {}*, using {} (ignoring {})",
            prefix,
            first,
            others.join(", ")
        );
    }

    Ok(dir.join(first))
}

/// Scan `dir` for a device whose name starts with `prefix`
pub fn find_serial_port(dir: &Path, prefix: &str) -> Result<PathBuf> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list device directory: {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    let port = select_port(dir, names, prefix)?;
    log::debug!("Found serial port {}", port.display());
    Ok(port)
}
