//! The seam between provisioning steps and the host.
//!
//! Steps never spawn processes directly; they go through a
//! [`CommandRunner`]. Production code uses [`SystemRunner`], `--dry-run`
//! uses [`DryRunRunner`], and tests use [`MockRunner`](super::MockRunner).

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ProvisionError, Result};

use super::command::{execute, CommandOptions, CommandResult, CommandSpec};
use super::path::find_program;

/// Number of stderr lines kept when a checked command fails.
const STDERR_TAIL_LINES: usize = 20;

/// Runs external commands on behalf of provisioning steps.
pub trait CommandRunner {
    /// Run a command. A non-zero exit is not an error here.
    fn run(&mut self, spec: &CommandSpec) -> Result<CommandResult>;

    /// Locate a program on the search path.
    fn locate(&self, program: &str) -> Option<PathBuf> {
        find_program(program)
    }

    /// Whether commands are only being described, not executed.
    fn is_dry_run(&self) -> bool {
        false
    }

    /// Run a command and turn a non-zero exit into
    /// [`ProvisionError::CommandFailed`].
    fn run_checked(&mut self, spec: &CommandSpec) -> Result<CommandResult> {
        let result = self.run(spec)?;
        if result.success {
            return Ok(result);
        }

        let tail = result.stderr_tail(STDERR_TAIL_LINES);
        if !tail.is_empty() {
            tracing::error!("{} failed:\n{}", spec.display(), tail);
        }
        Err(ProvisionError::CommandFailed {
            command: spec.display(),
            code: result.exit_code,
        })
    }
}

/// Executes commands on the real host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    options: CommandOptions,
}

impl SystemRunner {
    /// Create a runner; `stream_output` lets command output reach the terminal.
    pub fn new(stream_output: bool) -> Self {
        Self {
            options: CommandOptions {
                capture_output: !stream_output,
            },
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, spec: &CommandSpec) -> Result<CommandResult> {
        execute(spec, &self.options)
    }
}

/// Prints commands instead of running them.
#[derive(Debug, Default)]
pub struct DryRunRunner {
    planned: Vec<CommandSpec>,
    echo: bool,
}

impl DryRunRunner {
    /// Create a dry-run runner; `echo` prints each command as it is planned.
    pub fn new(echo: bool) -> Self {
        Self {
            planned: Vec::new(),
            echo,
        }
    }

    /// Commands that would have been executed, in order.
    pub fn planned(&self) -> &[CommandSpec] {
        &self.planned
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&mut self, spec: &CommandSpec) -> Result<CommandResult> {
        if self.echo {
            println!("    Would run: {}", spec.display());
        }
        self.planned.push(spec.clone());
        Ok(CommandResult::success(
            String::new(),
            String::new(),
            Duration::ZERO,
        ))
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_runner_runs_commands() {
        let mut runner = SystemRunner::new(false);
        let result = runner.run(&CommandSpec::new("echo").arg("hi")).unwrap();
        assert!(result.success);
        assert!(result.stdout.contains("hi"));
    }

    #[test]
    fn streaming_runner_still_captures_parsed_output() {
        let temp = tempfile::TempDir::new().unwrap();
        let script = temp.path().join("hostname");
        std::fs::write(&script, "echo 10.1.2.3\n").unwrap();

        let mut runner = SystemRunner::new(true);
        let spec = CommandSpec::new("sh").path_arg(&script).arg("-I").capture();
        let result = runner.run_checked(&spec).unwrap();

        let ip = crate::host::parse_primary_ip(&result.stdout).unwrap();
        assert_eq!(ip.to_string(), "10.1.2.3");
    }

    #[test]
    fn run_checked_maps_failure() {
        let mut runner = SystemRunner::new(false);
        let spec = CommandSpec::new("sh").args(["-c", "echo boom >&2; exit 7"]);
        let err = runner.run_checked(&spec).unwrap_err();
        match err {
            ProvisionError::CommandFailed { command, code } => {
                assert!(command.starts_with("sh -c"));
                assert_eq!(code, Some(7));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn dry_run_records_without_executing() {
        let mut runner = DryRunRunner::new(false);
        let spec = CommandSpec::new("sh").args(["-c", "exit 1"]);

        let result = runner.run_checked(&spec).unwrap();

        assert!(result.success);
        assert!(runner.is_dry_run());
        assert_eq!(runner.planned(), &[spec]);
    }

    #[test]
    fn system_runner_is_not_dry_run() {
        assert!(!SystemRunner::default().is_dry_run());
    }
}
