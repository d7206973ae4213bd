//! The provisioning plan.
//!
//! [`plan`] builds the fixed, ordered list of steps that turn a bare host
//! into one serving the vision API; [`install`] checks the preconditions and
//! drives that list through the [`Orchestrator`].
//!
//! # Example
//!
//! ```
//! use provisioner::config::InstallerConfig;
//! use provisioner::provision::{plan, steps};
//! use provisioner::runner::Fatality;
//!
//! let plan = plan(&InstallerConfig::default());
//! assert_eq!(plan[0].name(), steps::INSTALL_PACKAGES);
//! assert_eq!(plan[0].fatality(), Fatality::Fatal);
//! assert_eq!(plan.last().unwrap().name(), steps::SUMMARIZE);
//! ```

pub mod engine;
pub mod packages;
pub mod payload;
pub mod service;
pub mod summary;
pub mod venv;

use std::path::Path;

use tracing::info;

use crate::config::{validate, InstallerConfig};
use crate::error::Result;
use crate::host::{Preflight, UserLookup};
use crate::runner::{Orchestrator, RunContext, RunReport, Step};
use crate::shell::CommandRunner;
use crate::ui::UserInterface;

/// Step names, as they appear in logs, errors and `plan --json`.
pub mod steps {
    pub const INSTALL_PACKAGES: &str = "install-packages";
    pub const STOP_SERVICE: &str = "stop-service";
    pub const RESET_INSTALL_DIR: &str = "reset-install-dir";
    pub const COPY_PAYLOAD: &str = "copy-payload";
    pub const CREATE_VENV: &str = "create-venv";
    pub const INSTALL_ENGINE: &str = "install-engine";
    pub const ENABLE_ENGINE: &str = "enable-engine";
    pub const START_ENGINE: &str = "start-engine";
    pub const PULL_MODEL: &str = "pull-model";
    pub const REGISTER_SERVICE: &str = "register-service";
    pub const SUMMARIZE: &str = "summarize";
}

/// The ordered provisioning steps for `config`.
pub fn plan(config: &InstallerConfig) -> Vec<Step> {
    let app = &config.app.name;
    let engine = &config.engine;

    vec![
        Step::fatal(
            steps::INSTALL_PACKAGES,
            "Installing system packages",
            packages::install_packages,
        ),
        Step::best_effort(
            steps::STOP_SERVICE,
            format!("Stopping running {} service", app),
            service::stop_previous,
        ),
        Step::fatal(
            steps::RESET_INSTALL_DIR,
            format!("Resetting {}", config.paths.install_dir.display()),
            payload::reset_install_dir,
        ),
        Step::fatal(
            steps::COPY_PAYLOAD,
            "Copying application files",
            payload::copy_payload,
        ),
        Step::fatal(
            steps::CREATE_VENV,
            "Creating Python virtual environment",
            venv::create_venv,
        ),
        Step::best_effort(
            steps::INSTALL_ENGINE,
            format!("Installing {}", engine.binary),
            engine::install_engine,
        ),
        Step::best_effort(
            steps::ENABLE_ENGINE,
            format!("Enabling {} service", engine.service),
            engine::enable_engine,
        ),
        Step::best_effort(
            steps::START_ENGINE,
            format!("Starting {} service", engine.service),
            engine::start_engine,
        ),
        Step::best_effort(
            steps::PULL_MODEL,
            format!("Pulling model {}", engine.model),
            engine::pull_model,
        ),
        Step::fatal(
            steps::REGISTER_SERVICE,
            format!("Registering {} service", app),
            service::register_service,
        ),
        Step::best_effort(steps::SUMMARIZE, "Summary", summary::summarize),
    ]
}

/// Provision the host.
///
/// Preconditions are checked before anything is printed or run. The
/// returned report lists every step that ran; a fatal failure comes back
/// as the error, naming the step.
pub fn install(
    preflight: &Preflight,
    users: &dyn UserLookup,
    config: InstallerConfig,
    cwd: &Path,
    runner: &mut dyn CommandRunner,
    ui: &mut dyn UserInterface,
) -> Result<RunReport> {
    let user = preflight.verify(users)?;
    validate(&config)?;
    info!("Provisioning {} for user {}", config.app.name, user.name);

    let orchestrator = Orchestrator::new(plan(&config));
    let ctx = RunContext::new(user, config, cwd, runner.is_dry_run());

    let header = if ctx.dry_run {
        format!("Provisioning {} (dry run)", ctx.config.app.name)
    } else {
        format!("Provisioning {}", ctx.config.app.name)
    };
    ui.show_header(&header);

    let mut report = orchestrator.execute(&ctx, runner, ui);
    ui.show_run_summary(&report);

    match report.take_failure() {
        Some(err) => Err(err),
        None => Ok(report),
    }
}
