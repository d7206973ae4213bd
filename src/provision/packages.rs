//! System package installation.

use anyhow::anyhow;

use crate::config::PackagesConfig;
use crate::error::Result;
use crate::host::PackageManager;
use crate::runner::{RunContext, StepEffect};
use crate::shell::CommandRunner;
use crate::ui::UserInterface;

/// Refresh the package index, then install the Python toolchain and curl.
pub fn install_packages(
    ctx: &RunContext,
    runner: &mut dyn CommandRunner,
    _ui: &mut dyn UserInterface,
) -> Result<StepEffect> {
    let manager = resolve_manager(&ctx.config.packages, &*runner)?;
    let names = ctx.config.packages.resolve_names(manager);

    runner.run_checked(&manager.refresh_command())?;
    runner.run_checked(&manager.install_command(&names))?;

    Ok(StepEffect::DoneWith(format!(
        "{} via {}",
        names.join(" "),
        manager
    )))
}

/// The configured manager, or the first one found on the host.
pub fn resolve_manager(
    config: &PackagesConfig,
    runner: &dyn CommandRunner,
) -> Result<PackageManager> {
    if let Some(manager) = config.manager {
        return Ok(manager);
    }

    PackageManager::detect(|binary| runner.locate(binary).is_some()).ok_or_else(|| {
        let supported: Vec<_> = PackageManager::ALL.iter().map(|m| m.binary()).collect();
        anyhow!(
            "no supported package manager found (looked for {}); set packages.manager",
            supported.join(", ")
        )
        .into()
    })
}
