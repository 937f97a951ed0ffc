//! Failures that end a run
//!
//! Spawn, parse and I/O failures travel as `anyhow::Error` with context; the
//! conditions below are the ones callers (and tests) need to tell apart.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    /// Every package in the workspace metadata is the shared library
    #[error("no package other than `{shared}` found in cargo metadata")]
    PackageNotFound { shared: String },

    /// Nothing in the device directory carries the USB modem prefix
    #[error("no serial device matching `{prefix}*` found in {}", dir.display())]
    PortNotFound { dir: PathBuf, prefix: String },

    /// An external tool ran but exited unsuccessfully
    #[error("`{command}` failed with {status}")]
    CommandFailed { command: String, status: ExitStatus },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_not_found_message() {
        let err = RunError::PortNotFound {
            dir: PathBuf::from("/dev"),
            prefix: "tty.usbmodem".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no serial device matching `tty.usbmodem*` found in /dev"
        );
    }
}
