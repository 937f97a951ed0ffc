//! Workspace metadata from `cargo metadata`

use crate::error::RunError;
use anyhow::{Context, Result};
use cargo_metadata::{Metadata, MetadataCommand, Package};
use std::path::Path;

/// First package that is not the shared library
pub fn firmware_package<'a>(metadata: &'a Metadata, shared: &str) -> Result<&'a Package, RunError> {
    let mut candidates = metadata.packages.iter().filter(|p| p.name != shared);

    let package = candidates.next().ok_or_else(|| RunError::PackageNotFound {
        shared: shared.to_string(),
    })?;

    let rest: Vec<&str> = candidates.map(|p| p.name.as_str()).collect();
    if !rest.is_empty() {
        log::warn!(
            "Several firmware packages found, using {} (ignoring {})",
            package.name,
            rest.join(", ")
        );
    }

    Ok(package)
}

/// Query metadata for the project without resolving dependencies
pub fn read_metadata(cargo: &str, project_dir: &Path) -> Result<Metadata> {
    let metadata = MetadataCommand::new()
        .cargo_path(cargo)
        .current_dir(project_dir)
        .no_deps()
        .exec()
        .with_context(|| format!("Failed to read metadata for {}", project_dir.display()))?;

    log::debug!(
        "Target directory {}, {} package(s)",
        metadata.target_directory,
        metadata.packages.len()
    );

    Ok(metadata)
}

/// `cargo metadata --no-deps` output for a workspace at `/p` with one
/// binary package per name
#[cfg(test)]
pub fn fixture_json(names: &[&str]) -> String {
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

    format!(
        r#"{{"packages":[{}],"workspace_members":[{}],"workspace_default_members":[{}],"resolve":null,"target_directory":"/p/target","version":1,"workspace_root":"/p","metadata":null}}"#,
        packages.join(","),
        members.join(","),
        members.join(",")
    )
}

#[cfg(test)]
pub fn fixture(names: &[&str]) -> Metadata {
    MetadataCommand::parse(fixture_json(names)).unwrap()
}
