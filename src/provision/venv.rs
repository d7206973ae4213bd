//! Isolated Python runtime for the application.

use anyhow::anyhow;

use crate::error::Result;
use crate::runner::{RunContext, StepEffect};
use crate::shell::{CommandRunner, CommandSpec};
use crate::ui::UserInterface;

/// Create the virtual environment and install the dependency manifest,
/// all as the invoking user.
pub fn create_venv(
    ctx: &RunContext,
    runner: &mut dyn CommandRunner,
    _ui: &mut dyn UserInterface,
) -> Result<StepEffect> {
    let paths = &ctx.config.paths;
    let venv = paths.venv_path();
    let manifest = paths.manifest_path();

    // In a dry run nothing was copied yet; look at the source instead.
    let manifest_on_disk = if ctx.dry_run {
        ctx.source_dir.join(&paths.manifest)
    } else {
        manifest.clone()
    };
    if !manifest_on_disk.is_file() {
        return Err(anyhow!(
            "dependency manifest {} not found",
            manifest_on_disk.display()
        )
        .into());
    }

    let python = paths.venv_bin("python");
    let commands = [
        CommandSpec::new("python3")
            .args(["-m", "venv"])
            .path_arg(&venv),
        CommandSpec::new(python.to_string_lossy())
            .args(["-m", "pip", "install", "--upgrade", "pip"]),
        CommandSpec::new(python.to_string_lossy())
            .args(["-m", "pip", "install", "-r"])
            .path_arg(&manifest),
    ];

    for spec in commands {
        let spec = as_invoking_user(ctx, spec);
        runner.run_checked(&spec)?;
    }

    Ok(StepEffect::DoneWith(format!(
        "{} installed into {}",
        paths.manifest.display(),
        venv.display()
    )))
}

fn as_invoking_user(ctx: &RunContext, spec: CommandSpec) -> CommandSpec {
    spec.as_user(ctx.user.name.clone())
        .env("HOME", ctx.user.home.to_string_lossy())
        .cwd(ctx.install_dir())
}
