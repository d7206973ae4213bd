//! Model-runtime engine: install, activate, pull the model.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::runner::{RunContext, StepEffect};
use crate::shell::{CommandRunner, CommandSpec};
use crate::ui::UserInterface;

/// Install the engine with its official script, unless it is already on `PATH`.
pub fn install_engine(
    ctx: &RunContext,
    runner: &mut dyn CommandRunner,
    _ui: &mut dyn UserInterface,
) -> Result<StepEffect> {
    let engine = &ctx.config.engine;
    if let Some(path) = runner.locate(&engine.binary) {
        return Ok(StepEffect::Skipped(format!(
            "{} already installed at {}",
            engine.binary,
            path.display()
        )));
    }

    // Held until the script has run; dropping it removes the file.
    let script = if ctx.dry_run {
        None
    } else {
        Some(
            tempfile::Builder::new()
                .prefix(&format!("{}-install-", engine.binary))
                .suffix(".sh")
                .tempfile()?,
        )
    };
    let script_path = script
        .as_ref()
        .map(|f| f.path().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(format!("{}-install.sh", engine.binary)));

    download_script(runner, &engine.install_url, &script_path)?;
    runner.run_checked(&CommandSpec::new("sh").path_arg(&script_path))?;
    debug!("Ran {} from {}", script_path.display(), engine.install_url);

    Ok(StepEffect::DoneWith(format!("from {}", engine.install_url)))
}

fn download_script(runner: &mut dyn CommandRunner, url: &str, dest: &Path) -> Result<()> {
    let curl = CommandSpec::new("curl")
        .args(["-fsSL", url, "-o"])
        .path_arg(dest);
    runner.run_checked(&curl)?;
    Ok(())
}

/// `systemctl enable <engine>`.
pub fn enable_engine(
    ctx: &RunContext,
    runner: &mut dyn CommandRunner,
    _ui: &mut dyn UserInterface,
) -> Result<StepEffect> {
    let service = &ctx.config.engine.service;
    runner.run_checked(&CommandSpec::new("systemctl").args(["enable", service.as_str()]))?;
    Ok(StepEffect::Done)
}

/// `systemctl start <engine>`.
pub fn start_engine(
    ctx: &RunContext,
    runner: &mut dyn CommandRunner,
    _ui: &mut dyn UserInterface,
) -> Result<StepEffect> {
    let service = &ctx.config.engine.service;
    runner.run_checked(&CommandSpec::new("systemctl").args(["start", service.as_str()]))?;
    Ok(StepEffect::Done)
}

/// Pull the model the application asks the engine for.
pub fn pull_model(
    ctx: &RunContext,
    runner: &mut dyn CommandRunner,
    _ui: &mut dyn UserInterface,
) -> Result<StepEffect> {
    let engine = &ctx.config.engine;
    runner.run_checked(
        &CommandSpec::new(engine.binary.as_str()).args(["pull", engine.model.as_str()]),
    )?;
    Ok(StepEffect::DoneWith(engine.model.clone()))
}
