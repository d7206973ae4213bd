//! Run command implementation.
//!
//! The `provisioner run` command provisions the host. It is also what a
//! bare `provisioner` does.

use std::path::{Path, PathBuf};

use crate::cli::args::RunArgs;
use crate::config::load_config;
use crate::error::Result;
use crate::host::{require_elevated, Preflight, SystemUsers, UserLookup};
use crate::provision::install;
use crate::shell::{CommandRunner, DryRunRunner, SystemRunner};
use crate::ui::{format_duration, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    cwd: PathBuf,
    config_path: Option<PathBuf>,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(cwd: &Path, config_path: Option<&Path>, args: RunArgs) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Run against explicit host facts and an explicit runner.
    pub fn run_with(
        &self,
        preflight: &Preflight,
        users: &dyn UserLookup,
        runner: &mut dyn CommandRunner,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        // A non-root caller hears about sudo before any config problem.
        require_elevated(preflight.elevated)?;
        let config = load_config(self.config_path.as_deref(), &self.cwd)?;

        let report = install(preflight, users, config, &self.cwd, runner, ui)?;

        let advisories = report.advisories().count();
        if advisories > 0 {
            ui.warning(&format!(
                "Finished in {} with {} optional step(s) failing",
                format_duration(report.total_duration),
                advisories
            ));
        }
        Ok(CommandResult::success())
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let preflight = Preflight::detect();

        if self.args.dry_run {
            let mut runner = DryRunRunner::new(true);
            self.run_with(&preflight, &SystemUsers, &mut runner, ui)
        } else {
            let mut runner = SystemRunner::new(ui.output_mode().shows_command_output());
            self.run_with(&preflight, &SystemUsers, &mut runner, ui)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProvisionError;
    use crate::host::user::tests::{alice, FakeUsers};
    use crate::host::InvokerEnv;
    use crate::shell::MockRunner;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn unprivileged_run_mentions_sudo() {
        let temp = TempDir::new().unwrap();
        let cmd = RunCommand::new(temp.path(), None, RunArgs::default());
        let mut runner = MockRunner::new();
        let mut ui = MockUI::new();

        let err = cmd
            .run_with(
                &Preflight::default(),
                &FakeUsers(vec![alice()]),
                &mut runner,
                &mut ui,
            )
            .unwrap_err();

        assert!(matches!(err, ProvisionError::PermissionDenied { .. }));
        assert!(err.to_string().contains("sudo"));
        assert!(runner.history().is_empty());
    }

    #[test]
    fn privilege_checked_before_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("provisioner.yml"), "app: [not a map").unwrap();
        let cmd = RunCommand::new(temp.path(), None, RunArgs::default());

        let err = cmd
            .run_with(
                &Preflight::default(),
                &FakeUsers(vec![alice()]),
                &mut MockRunner::new(),
                &mut MockUI::new(),
            )
            .unwrap_err();

        assert!(matches!(err, ProvisionError::PermissionDenied { .. }));
    }

    #[test]
    fn missing_explicit_config_is_reported() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");
        let cmd = RunCommand::new(temp.path(), Some(missing.as_path()), RunArgs::default());
        let preflight = Preflight {
            elevated: true,
            invoker: InvokerEnv {
                sudo_user: Some("alice".into()),
                pkexec_uid: None,
            },
        };

        let err = cmd
            .run_with(
                &preflight,
                &FakeUsers(vec![alice()]),
                &mut MockRunner::new(),
                &mut MockUI::new(),
            )
            .unwrap_err();

        assert!(matches!(err, ProvisionError::ConfigNotFound { .. }));
    }
}
