//! Non-interactive UI for CI/headless environments.

use crate::runner::{Fatality, RunReport, StepStatus};

use super::progress::format_duration;
use super::theme::ProvisionerTheme;
use super::{step_banner, OutputMode, SpinnerHandle, StatusKind, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Everything is written line by line so that logs captured by CI or
/// `journalctl` stay readable. Warnings and errors go to stderr.
pub struct NonInteractiveUI {
    mode: OutputMode,
    theme: ProvisionerTheme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: ProvisionerTheme::detect(),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("    {}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("    {}", self.theme.format_warning(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("    {}", self.theme.format_error(msg));
    }

    fn skipped(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("    {}", self.theme.format_skipped(msg));
        }
    }

    fn start_spinner(&mut self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(NoopSpinner {
            show: self.mode.shows_status(),
            theme: self.theme.clone(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_step(&mut self, current: usize, total: usize, title: &str) {
        if self.mode.shows_status() {
            println!("{}", step_banner(current, total, title));
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_detail() {
            println!("    {}", hint);
        }
    }

    fn show_run_summary(&mut self, report: &RunReport) {
        if !self.mode.shows_detail() {
            return;
        }

        println!();
        println!("  ┌─ Summary ──────────────────────────");
        for outcome in &report.outcomes {
            let kind = StatusKind::for_outcome(
                outcome.status,
                outcome.fatality == Fatality::BestEffort,
            );
            let right_side = match (&outcome.error, &outcome.detail) {
                (Some(err), _) => err.clone(),
                (None, Some(detail)) if outcome.status == StepStatus::Skipped => detail.clone(),
                _ => format_duration(outcome.duration),
            };
            println!("  │ {} {:<20} {}", kind.icon(), outcome.name, right_side);
        }
        println!("  ├────────────────────────────────────");
        println!(
            "  │ Total: {} · {} completed · {} skipped · {} warnings",
            format_duration(report.total_duration),
            report.count(StepStatus::Completed),
            report.count(StepStatus::Skipped),
            report.advisories().count(),
        );
        println!("  └────────────────────────────────────");
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that only prints the final line (for non-interactive mode).
struct NoopSpinner {
    show: bool,
    theme: ProvisionerTheme,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.show {
            println!("    {}", self.theme.format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("    {}", self.theme.format_error(msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.show {
            println!("    {}", self.theme.format_skipped(msg));
        }
    }
}
