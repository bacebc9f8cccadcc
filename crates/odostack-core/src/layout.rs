use crate::CoreError;
use odostack_schema::{StackProfile, COMPOSE_FILE, CONF_FILE};
use std::fs;
use std::path::{Path, PathBuf};

/// Conventional name of the top-level work directory holding all generated
/// environments. Also the directory the teardown reaper removes.
pub const WORK_DIR_NAME: &str = "odostack-work";

/// Directory skeleton for one provisioned stack: the per-version root under
/// the work root, with `addons/` and `config/` beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentLayout {
    root: PathBuf,
}

impl EnvironmentLayout {
    /// Plan the layout for one stack: `work_root/<app><version>`.
    pub fn for_stack(work_root: impl AsRef<Path>, profile: &StackProfile) -> Self {
        Self {
            root: work_root.as_ref().join(profile.app_container()),
        }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn addons_dir(&self) -> PathBuf {
        self.root.join("addons")
    }

    #[inline]
    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    #[inline]
    pub fn compose_path(&self) -> PathBuf {
        self.root.join(COMPOSE_FILE)
    }

    #[inline]
    pub fn conf_path(&self) -> PathBuf {
        self.config_dir().join(CONF_FILE)
    }

    /// Create the skeleton. Idempotent: existing directories and missing
    /// parents are both fine; any other filesystem fault is fatal.
    pub fn create(&self) -> Result<(), CoreError> {
        for dir in [self.addons_dir(), self.config_dir()] {
            fs::create_dir_all(&dir).map_err(|source| CoreError::Layout {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Default work root when no override is given: `odostack-work` under the
/// current working directory.
pub fn default_work_root() -> PathBuf {
    std::env::current_dir()
        .map(|cwd| cwd.join(WORK_DIR_NAME))
        .unwrap_or_else(|_| PathBuf::from(WORK_DIR_NAME))
}
