use crate::layout::WORK_DIR_NAME;
use crate::runner::ComposeRunner;
use odostack_schema::{VersionTag, COMPOSE_FILE};
use serde::Serialize;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A directory believed to hold a previously provisioned stack, discovered
/// by scanning the filesystem at teardown time. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackHandle {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedStack {
    pub dir: PathBuf,
    pub error: String,
}

/// Outcome of one teardown run. Failures are recorded, never propagated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    pub stopped: Vec<PathBuf>,
    pub failed: Vec<FailedStack>,
    pub work_dir: PathBuf,
    pub work_dir_removed: bool,
}

/// Expected parent-path convention for one version: `odostack-work/<app><v>`.
pub fn targets_for<'a>(
    app_name: &str,
    versions: impl IntoIterator<Item = &'a VersionTag>,
) -> Vec<String> {
    versions
        .into_iter()
        .map(|v| format!("{WORK_DIR_NAME}/{app_name}{v}"))
        .collect()
}

/// Fallback target set when no manifest is available at teardown time.
pub fn default_targets() -> Vec<String> {
    let versions = [VersionTag::new("11"), VersionTag::new("14")];
    targets_for("odoo", &versions)
}

/// Recursively find every descriptor under `search_root` whose parent path
/// matches one of the expected naming conventions.
///
/// The match is structural: each target is decomposed into path segments
/// which must appear as a contiguous run of exact components in the parent
/// path. A directory merely containing the target text inside a longer
/// component (e.g. `prefixwork/app11x`) does not match. Unreadable entries
/// are skipped; the scan itself never fails. Duplicate results are possible
/// when the same directory is reachable via multiple filesystem entries.
pub fn locate_stacks(search_root: &Path, targets: &[String]) -> Vec<StackHandle> {
    let mut descriptors = Vec::new();
    walk(search_root, &mut descriptors);

    let segmented: Vec<Vec<&str>> = targets
        .iter()
        .map(|t| t.split('/').filter(|s| !s.is_empty()).collect())
        .collect();

    descriptors
        .into_iter()
        .filter_map(|file| file.parent().map(Path::to_path_buf))
        .filter(|parent| {
            segmented
                .iter()
                .any(|needle| path_contains_segments(parent, needle))
        })
        .map(|dir| StackHandle { dir })
        .collect()
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("skipping unreadable directory {}: {e}", dir.display());
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, out);
        } else if path.file_name() == Some(OsStr::new(COMPOSE_FILE)) {
            out.push(path);
        }
    }
}

fn path_contains_segments(path: &Path, needle: &[&str]) -> bool {
    if needle.is_empty() {
        return false;
    }
    let components: Vec<&OsStr> = path.components().map(|c| c.as_os_str()).collect();
    components
        .windows(needle.len())
        .any(|window| window.iter().zip(needle).all(|(c, n)| *c == OsStr::new(n)))
}

/// Locate every matching stack, stop and purge each one, then reap the work
/// directory. Per-stack failures are logged and recorded; the run always
/// completes and reports overall success.
pub fn teardown(
    search_root: &Path,
    targets: &[String],
    runner: &dyn ComposeRunner,
) -> TeardownReport {
    info!(
        "searching for {COMPOSE_FILE} files under {}",
        search_root.display()
    );
    let handles = locate_stacks(search_root, targets);

    let mut report = TeardownReport {
        work_dir: search_root.join(WORK_DIR_NAME),
        ..TeardownReport::default()
    };

    for handle in handles {
        info!(
            "stopping containers and removing volumes in {}",
            handle.dir.display()
        );
        match runner.down(&handle.dir) {
            Ok(()) => report.stopped.push(handle.dir),
            Err(e) => {
                warn!("teardown failed in {}: {e}", handle.dir.display());
                report.failed.push(FailedStack {
                    dir: handle.dir,
                    error: e.to_string(),
                });
            }
        }
    }

    report.work_dir_removed = reap_work_dir(search_root);
    report
}

/// Best-effort removal of the conventional work directory under
/// `search_root`. The name is fixed by convention, not derived from the
/// matches found during the scan, so when the scan root differs from where
/// the environments were created this removal quietly fails and is only
/// logged.
pub fn reap_work_dir(search_root: &Path) -> bool {
    let dir = search_root.join(WORK_DIR_NAME);
    match fs::remove_dir_all(&dir) {
        Ok(()) => {
            info!("removed {}", dir.display());
            true
        }
        Err(e) => {
            warn!("failed to remove {}: {e}", dir.display());
            false
        }
    }
}
