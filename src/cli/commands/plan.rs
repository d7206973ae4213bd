//! Plan command implementation.
//!
//! The `provisioner plan` command lists the steps a run would take, in
//! order, without touching the host.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::cli::args::PlanArgs;
use crate::config::load_config;
use crate::error::Result;
use crate::provision::plan;
use crate::runner::{Fatality, Orchestrator, PlannedStep};
use crate::ui::{ProvisionerTheme, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The plan command implementation.
pub struct PlanCommand {
    cwd: PathBuf,
    config_path: Option<PathBuf>,
    args: PlanArgs,
}

impl PlanCommand {
    /// Create a new plan command.
    pub fn new(cwd: &Path, config_path: Option<&Path>, args: PlanArgs) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    fn planned(&self) -> Result<Vec<PlannedStep>> {
        let config = load_config(self.config_path.as_deref(), &self.cwd)?;
        Ok(Orchestrator::new(plan(&config)).describe())
    }
}

impl Command for PlanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let steps = self.planned()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&steps).context("Failed to encode plan")?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        let theme = ProvisionerTheme::detect();
        for step in &steps {
            let marker = match step.fatality {
                Fatality::Fatal => theme.error.apply_to(step.fatality.to_string()),
                Fatality::BestEffort => theme.dim.apply_to(step.fatality.to_string()),
            };
            ui.message(&format!(
                "  {:>2}. {} {} {}",
                step.index,
                theme.highlight.apply_to(&step.title),
                theme.dim.apply_to(format!("({})", step.name)),
                marker
            ));
        }

        Ok(CommandResult::success())
    }
}
