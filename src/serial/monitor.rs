//! Serial session with the flashed firmware
//!
//! The firmware prints a banner, then reads its puzzle input from the
//! serial line until it sees an End-of-Transmission byte, then prints its
//! answer. The session mirrors that:
//! - Print whatever the device has already written
//! - Send the input file followed by EOT
//! - Print whatever the device writes back

use crate::serial::{PortConfig, SerialConnection};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// ASCII End-of-Transmission
pub const EOT: u8 = 0x04;

/// Read up to and including the next `\n`.
///
/// Returns early with whatever has arrived when a read times out or yields
/// no bytes, so the result is unterminated exactly when the device went quiet.
/// The port's own timeout bounds each single-byte read; `line_timeout` bounds
/// the whole line, so a device that streams without ever sending `\n` cannot
/// hold the call open.
pub fn read_line<R: Read + ?Sized>(port: &mut R, line_timeout: Duration) -> io::Result<Vec<u8>> {
    let deadline = Instant::now() + line_timeout;
    let mut line = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        match port.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                line.push(byte[0]);
                if byte[0] == b'\n' {
                    break;
                }
            }
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(ref e)
                if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) =>
            {
                break
            }
            Err(e) => return Err(e),
        }

        if Instant::now() >= deadline {
            log::debug!("Line read hit its {:?} deadline", line_timeout);
            break;
        }
    }

    Ok(line)
}

/// Copy complete lines from `port` to `console` until a read comes back
/// without a trailing newline. The unterminated remainder is printed too.
///
/// Returns the number of bytes printed.
pub fn drain<P, W>(port: &mut P, console: &mut W, line_timeout: Duration) -> Result<usize>
where
    P: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut total = 0;

    loop {
        let line = read_line(port, line_timeout).context("Failed to read from serial port")?;
        total += line.len();

        console.write_all(String::from_utf8_lossy(&line).as_bytes())?;
        console.flush()?;

        if !line.ends_with(b"\n") {
            break;
        }
    }

    log::debug!("Drained {} byte(s) from device", total);
    Ok(total)
}

/// Drain, send `input` terminated by [`EOT`], drain again
pub fn exchange<P, W>(
    port: &mut P,
    input: &[u8],
    console: &mut W,
    line_timeout: Duration,
) -> Result<()>
where
    P: Read + Write + ?Sized,
    W: Write + ?Sized,
{
    drain(port, console, line_timeout)?;

    writeln!(console, "{}", "Sending input".cyan())?;
    port.write_all(input).context("Failed to write input to serial port")?;
    port.write_all(&[EOT]).context("Failed to write EOT to serial port")?;
    port.flush().context("Failed to flush serial port")?;
    log::debug!("Sent {} byte(s) plus EOT", input.len());

    drain(port, console, line_timeout)?;
    Ok(())
}

/// Open the port and run the exchange with the contents of `input_file`,
/// printing device output to `console`. The port is closed on return,
/// whether or not the exchange succeeded.
pub fn run_session<W: Write + ?Sized>(
    config: PortConfig,
    input_file: &Path,
    console: &mut W,
) -> Result<()> {
    let input = fs::read_to_string(input_file)
        .with_context(|| format!("Failed to read input file: {}", input_file.display()))?;

    let line_timeout = config.timeout;
    let mut connection = SerialConnection::open(config)?;
    log::info!(
        "Connected to {} at {} baud",
        connection.config().port_path.display(),
        connection.config().baud_rate
    );

    exchange(&mut connection, input.as_bytes(), console, line_timeout)
}

/// [`run_session`] against stdout
pub fn run_monitor(config: PortConfig, input_file: &Path) -> Result<()> {
    let stdout = io::stdout();
    let mut console = stdout.lock();
    run_session(config, input_file, &mut console)
}
