//! Mock command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without touching the host. It
//! records every command it is asked to run and can be told which commands
//! fail, what they print, and which programs exist on the search path.
//!
//! # Example
//!
//! ```
//! use provisioner::shell::{CommandRunner, CommandSpec, MockRunner};
//!
//! let mut runner = MockRunner::new();
//! runner.fail_when("ollama pull", 1);
//!
//! assert!(runner.run_checked(&CommandSpec::new("systemctl").arg("daemon-reload")).is_ok());
//! assert!(runner.run_checked(&CommandSpec::new("ollama").args(["pull", "llava"])).is_err());
//! assert!(runner.ran("systemctl daemon-reload"));
//! ```

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ProvisionError, Result};

use super::command::{CommandResult, CommandSpec};
use super::runner::CommandRunner;

/// Mock runner that records commands instead of executing them.
#[derive(Debug, Default)]
pub struct MockRunner {
    history: Vec<CommandSpec>,
    failures: Vec<(String, i32)>,
    unstartable: Vec<String>,
    outputs: Vec<(String, String)>,
    programs: HashSet<String>,
}

impl MockRunner {
    /// Create a runner where every command succeeds with no output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands whose display line contains `pattern` exit with `code`.
    pub fn fail_when(&mut self, pattern: &str, code: i32) {
        self.failures.push((pattern.to_string(), code));
    }

    /// Commands whose display line contains `pattern` cannot be started.
    pub fn unstartable_when(&mut self, pattern: &str) {
        self.unstartable.push(pattern.to_string());
    }

    /// Commands whose display line contains `pattern` print `stdout`.
    pub fn set_output(&mut self, pattern: &str, stdout: &str) {
        self.outputs.push((pattern.to_string(), stdout.to_string()));
    }

    /// Pretend `program` is installed.
    pub fn add_program(&mut self, program: &str) {
        self.programs.insert(program.to_string());
    }

    /// Every command run so far, in order.
    pub fn history(&self) -> &[CommandSpec] {
        &self.history
    }

    /// Display lines of every command run so far.
    pub fn lines(&self) -> Vec<String> {
        self.history.iter().map(CommandSpec::display).collect()
    }

    /// Check whether any command's display line contains `pattern`.
    pub fn ran(&self, pattern: &str) -> bool {
        self.history.iter().any(|c| c.display().contains(pattern))
    }

    /// Index of the first command whose display line contains `pattern`.
    pub fn position(&self, pattern: &str) -> Option<usize> {
        self.history
            .iter()
            .position(|c| c.display().contains(pattern))
    }

    /// Clear recorded history, keeping configured behavior.
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl CommandRunner for MockRunner {
    fn run(&mut self, spec: &CommandSpec) -> Result<CommandResult> {
        let line = spec.display();
        self.history.push(spec.clone());

        if self.unstartable.iter().any(|p| line.contains(p.as_str())) {
            return Err(ProvisionError::CommandSpawn {
                command: line,
                message: "No such file or directory".to_string(),
            });
        }

        let stdout = self
            .outputs
            .iter()
            .find(|(p, _)| line.contains(p.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default();

        if let Some((_, code)) = self.failures.iter().find(|(p, _)| line.contains(p.as_str())) {
            return Ok(CommandResult::failure(
                Some(*code),
                stdout,
                format!("mock failure for {}", line),
                Duration::ZERO,
            ));
        }

        Ok(CommandResult::success(stdout, String::new(), Duration::ZERO))
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.programs
            .contains(program)
            .then(|| PathBuf::from("/usr/local/bin").join(program))
    }
}
