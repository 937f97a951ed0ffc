//! cargo integration
//!
//! - Reading workspace metadata to locate the firmware package
//! - Building it for the device target

pub mod build;
pub mod metadata;

pub use build::{artifact_dir, build};
pub use cargo_metadata::Metadata;
pub use metadata::{firmware_package, read_metadata};
