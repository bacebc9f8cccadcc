use super::{json_pretty, resolve_work_root, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use console::Style;
use odostack_core::{ComposeRunner, ProvisionedStack, Provisioner};
use odostack_schema::parse_manifest_file;
use std::path::Path;

pub fn run(
    manifest_path: &Path,
    work_root_flag: Option<&Path>,
    runner: &dyn ComposeRunner,
    json: bool,
) -> Result<u8, String> {
    let manifest = parse_manifest_file(manifest_path).map_err(|e| format!("manifest error: {e}"))?;
    let work_root = resolve_work_root(work_root_flag);

    let provisioner = Provisioner::new(&work_root, runner);
    let mut stacks = Vec::new();
    for profile in manifest.profiles() {
        let pb = if json {
            None
        } else {
            Some(spinner(&format!(
                "starting {} containers...",
                profile.app_container()
            )))
        };
        match provisioner.provision(&profile) {
            Ok(stack) => {
                if let Some(ref pb) = pb {
                    spin_ok(pb, &format!("{} containers started", stack.app_container));
                }
                stacks.push(stack);
            }
            Err(e) => {
                if let Some(ref pb) = pb {
                    spin_fail(pb, &format!("{} failed to start", profile.app_container()));
                }
                return Err(e.to_string());
            }
        }
    }

    if json {
        let payload = serde_json::json!({
            "work_root": work_root,
            "stacks": stacks,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        print_report(&stacks);
    }
    Ok(EXIT_SUCCESS)
}

/// Human-readable summary of the launched stacks. Pure formatting; the only
/// consumer of layout paths for display.
fn print_report(stacks: &[ProvisionedStack]) {
    let green = Style::new().green().bold();
    let cyan = Style::new().cyan();
    let dim = Style::new().dim();

    println!();
    println!("{}", green.apply_to("development environment ready"));
    for stack in stacks {
        println!();
        println!(
            "  {} {}",
            stack.app_container,
            cyan.apply_to(format!("http://localhost:{}", stack.web_port))
        );
        println!(
            "    custom modules: {}",
            stack.addons_dir.display()
        );
        println!(
            "    {}",
            dim.apply_to(format!("logs: docker logs -f {}", stack.app_container))
        );
    }
}
