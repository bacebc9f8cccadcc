//! Provisioning engine for odostack environments.
//!
//! This crate ties the schema models to the filesystem and the external
//! orchestration tool: environment layout planning, artifact rendering,
//! the `ComposeRunner` abstraction over docker-compose, and the teardown
//! flow (locate, terminate, reap).

pub mod layout;
pub mod provision;
pub mod runner;
pub mod teardown;

pub use layout::{default_work_root, EnvironmentLayout, WORK_DIR_NAME};
pub use provision::{render_artifacts, ProvisionedStack, Provisioner};
pub use runner::{select_runner, ComposeRunner, DockerCompose, MockRunner};
pub use teardown::{
    default_targets, locate_stacks, reap_work_dir, targets_for, teardown, FailedStack,
    StackHandle, TeardownReport,
};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] odostack_schema::ManifestError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("descriptor serialization failed: {0}")]
    Descriptor(#[from] serde_yaml::Error),
    #[error("failed to create layout at {path}: {source}")]
    Layout {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("docker-compose failed in {dir}: {detail}")]
    Compose { dir: PathBuf, detail: String },
    #[error("unknown runner '{0}' (expected: compose, mock)")]
    UnknownRunner(String),
}
