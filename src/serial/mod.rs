//! Serial link to the development board
//!
//! This module provides functionality for:
//! - Finding the USB modem device the board enumerates as
//! - Opening it with a read timeout
//! - Exchanging input and output with the running firmware

pub mod monitor;
pub mod port;

pub use monitor::run_monitor;
pub use port::{find_serial_port, PortConfig, SerialConnection};
