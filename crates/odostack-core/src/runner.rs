use crate::CoreError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

const COMPOSE_BIN: &str = "docker-compose";

/// Drives the external orchestration tool against one stack directory.
///
/// The target directory is always passed explicitly; implementations must
/// not change the process-wide working directory, so parallel invocation
/// stays possible.
pub trait ComposeRunner: Send + Sync {
    fn name(&self) -> &str;

    /// `up --detach` against the descriptor in `dir`.
    fn up(&self, dir: &Path) -> Result<(), CoreError>;

    /// `down --volumes` against the descriptor in `dir`.
    fn down(&self, dir: &Path) -> Result<(), CoreError>;
}

/// The real runner: invokes the `docker-compose` binary, inheriting the
/// standard streams, and blocks until it exits.
#[derive(Debug, Default)]
pub struct DockerCompose;

impl DockerCompose {
    pub fn new() -> Self {
        Self
    }

    fn run(dir: &Path, args: &[&str]) -> Result<(), CoreError> {
        debug!("running {COMPOSE_BIN} {} in {}", args.join(" "), dir.display());
        let status = Command::new(COMPOSE_BIN)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| CoreError::Compose {
                dir: dir.to_path_buf(),
                detail: format!("failed to launch {COMPOSE_BIN}: {e}"),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(CoreError::Compose {
                dir: dir.to_path_buf(),
                detail: format!(
                    "{COMPOSE_BIN} {} exited with code {}",
                    args.join(" "),
                    status.code().unwrap_or(1)
                ),
            })
        }
    }
}

impl ComposeRunner for DockerCompose {
    fn name(&self) -> &'static str {
        "compose"
    }

    fn up(&self, dir: &Path) -> Result<(), CoreError> {
        Self::run(dir, &["up", "--detach"])
    }

    fn down(&self, dir: &Path) -> Result<(), CoreError> {
        Self::run(dir, &["down", "--volumes"])
    }
}

/// In-memory runner for tests: records every invocation and fails on
/// directories it was told to fail on.
#[derive(Debug, Default)]
pub struct MockRunner {
    calls: Mutex<Vec<(String, PathBuf)>>,
    fail_up: Mutex<HashSet<PathBuf>>,
    fail_down: Mutex<HashSet<PathBuf>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_up_in(&self, dir: impl Into<PathBuf>) {
        self.fail_up
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(dir.into());
    }

    pub fn fail_down_in(&self, dir: impl Into<PathBuf>) {
        self.fail_down
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(dir.into());
    }

    /// Every `(operation, dir)` pair seen so far, in invocation order.
    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, op: &str, dir: &Path, failures: &Mutex<HashSet<PathBuf>>) -> Result<(), CoreError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((op.to_owned(), dir.to_path_buf()));
        let should_fail = failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(dir);
        if should_fail {
            Err(CoreError::Compose {
                dir: dir.to_path_buf(),
                detail: format!("mock {op} failure"),
            })
        } else {
            Ok(())
        }
    }
}

impl ComposeRunner for MockRunner {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn up(&self, dir: &Path) -> Result<(), CoreError> {
        self.record("up", dir, &self.fail_up)
    }

    fn down(&self, dir: &Path) -> Result<(), CoreError> {
        self.record("down", dir, &self.fail_down)
    }
}

pub fn select_runner(name: &str) -> Result<Box<dyn ComposeRunner>, CoreError> {
    match name {
        "compose" => Ok(Box::new(DockerCompose::new())),
        "mock" => Ok(Box::new(MockRunner::new())),
        other => Err(CoreError::UnknownRunner(other.to_owned())),
    }
}
