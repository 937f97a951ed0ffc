//! Firmware build

use crate::command;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Compile the project for `target` with `profile`
pub fn build(cargo: &str, project_dir: &Path, target: &str, profile: &str) -> Result<()> {
    let mut cmd = Command::new(cargo);
    cmd.args(["build", "--target", target, "--profile", profile])
        .current_dir(project_dir);

    command::run(&mut cmd)
}

/// Directory cargo writes `profile` artifacts to
///
/// The built-in `dev` and `test` profiles land in `debug`, `bench` in
/// `release`; custom profiles use their own name.
pub fn profile_dir(profile: &str) -> &str {
    match profile {
        "dev" | "test" => "debug",
        "bench" => "release",
        other => other,
    }
}

/// `<target_directory>/<target>/<profile dir>`
pub fn artifact_dir(target_directory: &Path, target: &str, profile: &str) -> PathBuf {
    target_directory.join(target).join(profile_dir(profile))
}
