//! Flashing firmware with espflash

use crate::command;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::Command;

/// Build the `<flasher> flash --port <port> <firmware>` invocation
pub fn flash_command(flasher: &str, port: &Path, firmware: &Path) -> Command {
    let mut cmd = Command::new(flasher);
    cmd.arg("flash").arg("--port").arg(port).arg(firmware);
    cmd
}

/// Write `<artifact_dir>/<package>` to the device on `port`
pub fn flash(flasher: &str, artifact_dir: &Path, package: &str, port: &Path) -> Result<()> {
    let firmware = artifact_dir.join(package);
    println!("Flashing {}", firmware.display().to_string().white().bold());

    command::run(&mut flash_command(flasher, port, &firmware))
}
