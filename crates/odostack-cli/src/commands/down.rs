use super::{json_pretty, resolve_search_root, EXIT_SUCCESS};
use console::Style;
use dialoguer::Confirm;
use odostack_core::{default_targets, targets_for, teardown, ComposeRunner};
use odostack_schema::parse_manifest_file;
use std::io::{stderr, stdin, IsTerminal};
use std::path::Path;

pub fn run(
    manifest_path: &Path,
    search_root_flag: Option<&Path>,
    yes: bool,
    runner: &dyn ComposeRunner,
    json: bool,
) -> Result<u8, String> {
    let search_root = resolve_search_root(search_root_flag);

    // The manifest narrows the target set; without one, fall back to the
    // conventional versions.
    let targets = if manifest_path.exists() {
        let manifest =
            parse_manifest_file(manifest_path).map_err(|e| format!("manifest error: {e}"))?;
        let versions: Vec<_> = manifest.profiles().iter().map(|p| p.version.clone()).collect();
        targets_for(&manifest.app.name, &versions)
    } else {
        default_targets()
    };

    let is_tty = stdin().is_terminal() && stderr().is_terminal();
    if !yes && is_tty {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "stop and purge all matching stacks under {}?",
                search_root.display()
            ))
            .default(false)
            .interact()
            .map_err(|e| format!("prompt failed: {e}"))?;
        if !proceed {
            return Err("teardown cancelled".to_owned());
        }
    }

    let report = teardown(&search_root, &targets, runner);

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        let green = Style::new().green();
        let red = Style::new().red();
        for dir in &report.stopped {
            println!("{} stopped {}", green.apply_to("✓"), dir.display());
        }
        for failure in &report.failed {
            println!(
                "{} {}: {}",
                red.apply_to("✗"),
                failure.dir.display(),
                failure.error
            );
        }
        if report.work_dir_removed {
            println!("removed {}", report.work_dir.display());
        } else {
            println!("left {} in place", report.work_dir.display());
        }
        println!("{}", green.apply_to("environments uninstalled"));
    }
    Ok(EXIT_SUCCESS)
}
