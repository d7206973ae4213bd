//! The application's systemd service.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, info};

use crate::error::Result;
use crate::runner::{RunContext, StepEffect};
use crate::shell::{CommandRunner, CommandSpec};
use crate::ui::UserInterface;
use crate::unit::ServiceUnit;

/// Stop the service if a previous install left it running.
pub fn stop_previous(
    ctx: &RunContext,
    runner: &mut dyn CommandRunner,
    _ui: &mut dyn UserInterface,
) -> Result<StepEffect> {
    let name = &ctx.config.app.name;
    let probe = CommandSpec::new("systemctl")
        .args(["is-active", "--quiet"])
        .arg(name.as_str());

    if !runner.run(&probe)?.success {
        return Ok(StepEffect::Skipped(format!("{} is not running", name)));
    }

    runner.run_checked(&CommandSpec::new("systemctl").args(["stop", name.as_str()]))?;
    Ok(StepEffect::DoneWith(format!("stopped {}", name)))
}

/// Write the unit file, then reload, enable and restart the service.
pub fn register_service(
    ctx: &RunContext,
    runner: &mut dyn CommandRunner,
    ui: &mut dyn UserInterface,
) -> Result<StepEffect> {
    let app = &ctx.config.app;
    let unit = ServiceUnit::for_app(&ctx.config, &ctx.user.name);
    let text = unit.render()?;
    let path = ctx.config.paths.unit_path(app);

    if ctx.dry_run {
        ui.message(&format!("    Would write {}:", path.display()));
        for line in text.lines() {
            ui.message(&format!("      {}", line));
        }
    } else {
        write_unit_file(&path, &text)?;
        info!("Wrote {}", path.display());
    }

    let unit_name = app.unit_file_name();
    runner.run_checked(&CommandSpec::new("systemctl").arg("daemon-reload"))?;
    runner.run_checked(&CommandSpec::new("systemctl").args(["enable", unit_name.as_str()]))?;
    runner.run_checked(&CommandSpec::new("systemctl").args(["restart", unit_name.as_str()]))?;

    Ok(StepEffect::DoneWith(path.display().to_string()))
}

/// Replace the unit file atomically (write a sibling, then rename).
pub fn write_unit_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let staging = path.with_extension("service.tmp");
    fs::write(&staging, text).with_context(|| format!("Failed to write {}", staging.display()))?;
    set_unit_permissions(&staging)?;
    fs::rename(&staging, path)
        .with_context(|| format!("Failed to move unit into place at {}", path.display()))?;
    debug!("Unit file {} is {} bytes", path.display(), text.len());
    Ok(())
}

#[cfg(unix)]
fn set_unit_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_unit_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
