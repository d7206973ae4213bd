//! Typed service-unit descriptor.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::InstallerConfig;
use crate::error::{ProvisionError, Result};

use super::escape::{check_value, escape_specifiers, quote_exec_word};

/// `Restart=` policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Never restart.
    No,
    /// Restart only after an unclean exit.
    OnFailure,
    /// Restart whenever the process exits.
    Always,
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RestartPolicy::No => "no",
            RestartPolicy::OnFailure => "on-failure",
            RestartPolicy::Always => "always",
        };
        write!(f, "{}", s)
    }
}

/// The command line of `ExecStart=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCommand {
    /// Absolute path of the executable.
    pub program: PathBuf,
    /// Arguments, one word each.
    pub args: Vec<String>,
}

impl ExecCommand {
    fn render(&self) -> Result<String> {
        if !self.program.is_absolute() {
            return Err(ProvisionError::UnitValidation {
                key: "ExecStart".to_string(),
                message: format!("'{}' is not an absolute path", self.program.display()),
            });
        }

        let program = self.program.to_string_lossy();
        check_value("ExecStart", &program)?;

        let mut words = vec![quote_exec_word(&program)];
        for arg in &self.args {
            check_value("ExecStart", arg)?;
            words.push(quote_exec_word(arg));
        }
        Ok(words.join(" "))
    }
}

/// A `.service` unit for a long-running application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUnit {
    /// `[Unit] Description=`
    pub description: String,
    /// `[Unit] After=`
    pub after: Vec<String>,
    /// `[Service] User=`
    pub user: String,
    /// `[Service] WorkingDirectory=`
    pub working_directory: PathBuf,
    /// `[Service] ExecStart=`
    pub exec_start: ExecCommand,
    /// `[Service] Restart=`
    pub restart: RestartPolicy,
    /// `[Service] RestartSec=`, in seconds.
    pub restart_sec: u32,
    /// `[Install] WantedBy=`
    pub wanted_by: Vec<String>,
}

impl ServiceUnit {
    /// The application unit: run the venv launcher as `user` from the
    /// install directory, after the network and the model engine.
    pub fn for_app(config: &InstallerConfig, user: &str) -> Self {
        let app = &config.app;
        Self {
            description: app.description.clone(),
            after: vec!["network.target".to_string(), config.engine.unit_name()],
            user: user.to_string(),
            working_directory: config.paths.install_dir.clone(),
            exec_start: ExecCommand {
                program: config.paths.venv_bin(&app.launcher),
                args: vec![
                    app.module.clone(),
                    "--host".to_string(),
                    app.host.clone(),
                    "--port".to_string(),
                    app.port.to_string(),
                ],
            },
            restart: RestartPolicy::Always,
            restart_sec: 5,
            wanted_by: vec!["multi-user.target".to_string()],
        }
    }

    /// Whether `ExecStart=` runs something inside `dir`.
    pub fn launches_from(&self, dir: &Path) -> bool {
        self.exec_start.program.starts_with(dir)
    }

    /// Serialize to systemd's INI format.
    pub fn render(&self) -> Result<String> {
        if self.user.trim().is_empty() {
            return Err(ProvisionError::UnitValidation {
                key: "User".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if !self.working_directory.is_absolute() {
            return Err(ProvisionError::UnitValidation {
                key: "WorkingDirectory".to_string(),
                message: format!(
                    "'{}' is not an absolute path",
                    self.working_directory.display()
                ),
            });
        }

        let working_directory = self.working_directory.to_string_lossy();
        let after = self.after.join(" ");
        let wanted_by = self.wanted_by.join(" ");

        check_value("Description", &self.description)?;
        check_value("After", &after)?;
        check_value("User", &self.user)?;
        check_value("WorkingDirectory", &working_directory)?;
        check_value("WantedBy", &wanted_by)?;

        let mut out = String::new();
        out.push_str("[Unit]\n");
        push_directive(&mut out, "Description", &escape_specifiers(&self.description));
        if !self.after.is_empty() {
            push_directive(&mut out, "After", &after);
        }
        out.push('\n');

        out.push_str("[Service]\n");
        push_directive(&mut out, "User", &escape_specifiers(&self.user));
        push_directive(
            &mut out,
            "WorkingDirectory",
            &escape_specifiers(&working_directory),
        );
        push_directive(&mut out, "ExecStart", &self.exec_start.render()?);
        push_directive(&mut out, "Restart", &self.restart.to_string());
        push_directive(&mut out, "RestartSec", &self.restart_sec.to_string());
        out.push('\n');

        out.push_str("[Install]\n");
        push_directive(&mut out, "WantedBy", &wanted_by);

        Ok(out)
    }
}

fn push_directive(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push('=');
    out.push_str(value);
    out.push('\n');
}
