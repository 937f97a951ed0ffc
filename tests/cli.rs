//! End-to-end tests for the flash-run binary.
//!
//! External tools are replaced with small shell scripts named through
//! `flash-run.toml`, so these run without cargo targets or hardware.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn flash_run() -> Command {
    cargo_bin_cmd!("flash-run")
}

#[cfg(unix)]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Write single-line `cargo metadata --no-deps` output for a workspace with
/// one binary package per name and return its path.
#[cfg(unix)]
fn write_metadata(dir: &Path, names: &[&str]) -> std::path::PathBuf {
    let packages: Vec<String> = names
        .iter()
        .map(|n| {
            format!(
                r#"{{"name":"{n}","version":"0.1.0","id":"path+file:///p/{n}#0.1.0","license":null,"license_file":null,"description":null,"source":null,"dependencies":[],"targets":[{{"kind":["bin"],"crate_types":["bin"],"name":"{n}","src_path":"/p/{n}/src/main.rs","edition":"2021","doc":true,"doctest":false,"test":true}}],"features":{{}},"manifest_path":"/p/{n}/Cargo.toml","metadata":null,"publish":null,"authors":[],"categories":[],"keywords":[],"readme":null,"repository":null,"homepage":null,"documentation":null,"edition":"2021","links":null,"default_run":null}}"#
            )
        })
        .collect();
    let members: Vec<String> = names
        .iter()
        .map(|n| format!(r#""path+file:///p/{n}#0.1.0""#))
        .collect();

    let path = dir.join("metadata.json");
    fs::write(
        &path,
        format!(
            r#"{{"packages":[{}],"workspace_members":[{}],"resolve":null,"target_directory":"/p/target","version":1,"workspace_root":"/p","metadata":null}}"#,
            packages.join(","),
            members.join(",")
        ),
    )
    .unwrap();
    path
}

#[test]
fn help_flag_works() {
    flash_run()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--target"))
        .stdout(predicate::str::contains("--profile"));
}

#[test]
fn help_shows_defaults() {
    flash_run()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[default: riscv32imc-unknown-none-elf]",
        ))
        .stdout(predicate::str::contains("[default: release]"))
        .stdout(predicate::str::contains("[default: 115200]"));
}

#[test]
fn missing_positionals_rejected() {
    flash_run()
        .assert()
        .failure()
        .stderr(predicate::str::contains("<PROJECT_DIR>"));

    flash_run().arg("day_1").assert().failure();
}

#[test]
fn missing_project_dir_fails() {
    flash_run()
        .args(["/nonexistent/project", "/nonexistent/input.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read metadata"));
}

#[test]
fn invalid_config_file_fails() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join("flash-run.toml"), "baud = \"fast\"\n").unwrap();

    flash_run()
        .arg(project.path())
        .arg(project.path().join("input.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration file"));
}

#[cfg(unix)]
#[test]
fn build_failure_skips_flash_and_monitor() {
    let project = TempDir::new().unwrap();
    let dir = project.path();
    let marker = dir.join("flashed");

    let metadata = write_metadata(dir, &["aoc-common", "day01"]);

    write_script(
        &dir.join("fake-cargo"),
        &format!(
            r#"case "$1" in
  metadata) cat {} ;;
  build) echo "error: could not compile day01" >&2; exit 101 ;;
esac"#,
            metadata.display()
        ),
    );
    write_script(&dir.join("fake-espflash"), &format!("touch {}", marker.display()));
    fs::write(
        dir.join("flash-run.toml"),
        format!(
            "cargo = \"{}\"\nflasher = \"{}\"\nport = \"/dev/null\"\n",
            dir.join("fake-cargo").display(),
            dir.join("fake-espflash").display()
        ),
    )
    .unwrap();
    fs::write(dir.join("input.txt"), "3   4\n").unwrap();

    flash_run()
        .arg(dir)
        .arg(dir.join("input.txt"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("# Compiling"))
        .stdout(predicate::str::contains("# Flashing").not())
        .stdout(predicate::str::contains("# Connecting").not())
        .stderr(predicate::str::contains("failed with"));

    assert!(!marker.exists());
}

#[cfg(unix)]
#[test]
fn only_shared_package_fails_before_build() {
    let project = TempDir::new().unwrap();
    let dir = project.path();

    let metadata = write_metadata(dir, &["aoc-common"]);

    write_script(
        &dir.join("fake-cargo"),
        &format!(
            r#"case "$1" in
  metadata) cat {} ;;
  *) exit 1 ;;
esac"#,
            metadata.display()
        ),
    );
    fs::write(
        dir.join("flash-run.toml"),
        format!("cargo = \"{}\"\n", dir.join("fake-cargo").display()),
    )
    .unwrap();

    flash_run()
        .arg(dir)
        .arg(dir.join("input.txt"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("# Compiling").not())
        .stderr(predicate::str::contains("no package other than `aoc-common`"));
}
