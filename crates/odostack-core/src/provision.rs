use crate::layout::EnvironmentLayout;
use crate::runner::ComposeRunner;
use crate::CoreError;
use odostack_schema::{ComposeFile, OdooConf, StackProfile, VersionTag};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// What `up` reports back for one successfully launched stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedStack {
    pub version: VersionTag,
    pub app_container: String,
    pub web_port: String,
    pub root: PathBuf,
    pub addons_dir: PathBuf,
}

/// Sequential provisioning flow: plan the layout, render the artifacts,
/// launch the stack. The first failure aborts the whole run; remaining
/// versions are not attempted and nothing is rolled back.
pub struct Provisioner<'a> {
    work_root: PathBuf,
    runner: &'a dyn ComposeRunner,
}

impl<'a> Provisioner<'a> {
    pub fn new(work_root: impl Into<PathBuf>, runner: &'a dyn ComposeRunner) -> Self {
        Self {
            work_root: work_root.into(),
            runner,
        }
    }

    #[inline]
    pub fn work_root(&self) -> &Path {
        &self.work_root
    }

    pub fn provision(&self, profile: &StackProfile) -> Result<ProvisionedStack, CoreError> {
        let layout = EnvironmentLayout::for_stack(&self.work_root, profile);
        layout.create()?;
        render_artifacts(&layout, profile)?;

        info!("starting {} containers", profile.app_container());
        self.runner.up(layout.root())?;
        info!("{} containers started", profile.app_container());

        Ok(ProvisionedStack {
            version: profile.version.clone(),
            app_container: profile.app_container(),
            web_port: profile.web_port(),
            root: layout.root().to_path_buf(),
            addons_dir: layout.addons_dir(),
        })
    }

    pub fn provision_all(
        &self,
        profiles: &[StackProfile],
    ) -> Result<Vec<ProvisionedStack>, CoreError> {
        profiles.iter().map(|p| self.provision(p)).collect()
    }
}

/// Render both artifacts for one stack and write them to their canonical
/// paths, truncating any existing content. Pure overwrite: a second render
/// with the same profile produces identical bytes.
pub fn render_artifacts(
    layout: &EnvironmentLayout,
    profile: &StackProfile,
) -> Result<(), CoreError> {
    let descriptor = ComposeFile::for_stack(profile).to_yaml()?;
    fs::write(layout.compose_path(), descriptor)?;

    let conf = OdooConf::for_stack(profile).render();
    fs::write(layout.conf_path(), conf)?;
    Ok(())
}
