//! Unit command implementation.
//!
//! The `provisioner unit` command prints the systemd unit a run would
//! install, so it can be reviewed without root.

use std::path::{Path, PathBuf};

use crate::cli::args::UnitArgs;
use crate::config::{load_config, validate};
use crate::error::{ProvisionError, Result};
use crate::ui::UserInterface;
use crate::unit::ServiceUnit;

use super::dispatcher::{Command, CommandResult};

/// The unit command implementation.
pub struct UnitCommand {
    cwd: PathBuf,
    config_path: Option<PathBuf>,
    args: UnitArgs,
}

impl UnitCommand {
    /// Create a new unit command.
    pub fn new(cwd: &Path, config_path: Option<&Path>, args: UnitArgs) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Render the unit for the resolved service account.
    pub fn render(&self) -> Result<String> {
        let config = load_config(self.config_path.as_deref(), &self.cwd)?;
        validate(&config)?;

        let user = service_user(
            self.args.user.clone(),
            env_var("SUDO_USER"),
            env_var("USER"),
        )?;
        ServiceUnit::for_app(&config, &user).render()
    }
}

impl Command for UnitCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        print!("{}", self.render()?);
        Ok(CommandResult::success())
    }
}

/// `--user`, then `$SUDO_USER`, then `$USER`.
fn service_user(
    explicit: Option<String>,
    sudo_user: Option<String>,
    user: Option<String>,
) -> Result<String> {
    explicit
        .or(sudo_user)
        .or(user)
        .ok_or_else(|| ProvisionError::Environment {
            message: "no service account given; pass --user NAME".to_string(),
        })
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
