//! Interactive terminal UI.

use console::Term;
use indicatif::ProgressBar;

use crate::runner::{Fatality, RunReport, StepStatus};

use super::progress::format_duration;
use super::{
    NonInteractiveUI, OutputMode, ProgressSpinner, ProvisionerTheme, SpinnerHandle, StatusKind,
    UserInterface,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: ProvisionerTheme,
    mode: OutputMode,
    active: Option<ProgressBar>,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            term: Term::stdout(),
            theme: ProvisionerTheme::detect(),
            mode,
            active: None,
        }
    }

    /// Print a line without tearing the running spinner.
    fn write_line(&self, line: &str) {
        match self.active.as_ref().filter(|bar| !bar.is_finished()) {
            Some(bar) => bar.suspend(|| self.term.write_line(line).ok()),
            None => self.term.write_line(line).ok(),
        };
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            self.write_line(msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            self.write_line(&format!("    {}", self.theme.format_success(msg)));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            self.write_line(&format!("    {}", self.theme.format_warning(msg)));
        }
    }

    fn error(&mut self, msg: &str) {
        self.write_line(&format!("    {}", self.theme.format_error(msg)));
    }

    fn skipped(&mut self, msg: &str) {
        if self.mode.shows_status() {
            self.write_line(&format!("    {}", self.theme.format_skipped(msg)));
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let spinner = if self.mode.shows_spinners() {
            ProgressSpinner::new(message, self.theme.clone())
        } else {
            ProgressSpinner::hidden()
        };
        self.active = Some(spinner.bar_clone());
        Box::new(spinner)
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            self.write_line(&format!("\n{}\n", self.theme.format_header(title)));
        }
    }

    fn show_step(&mut self, current: usize, total: usize, title: &str) {
        if self.mode.shows_status() {
            self.write_line(&self.theme.format_step(current, total, title));
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_detail() {
            self.write_line(&format!("    {}", self.theme.hint.apply_to(hint)));
        }
    }

    fn show_run_summary(&mut self, report: &RunReport) {
        if !self.mode.shows_detail() {
            return;
        }

        let b = &self.theme.border;
        let mut lines = vec![
            String::new(),
            format!(
                "  {} {}",
                b.apply_to("┌─"),
                b.apply_to("Summary ──────────────────────────")
            ),
        ];

        for outcome in &report.outcomes {
            let kind = StatusKind::for_outcome(
                outcome.status,
                outcome.fatality == Fatality::BestEffort,
            );
            let right_side = match (&outcome.error, &outcome.detail) {
                (Some(err), _) => self.theme.warning.apply_to(err).to_string(),
                (None, Some(detail)) if outcome.status == StepStatus::Skipped => {
                    self.theme.dim.apply_to(detail).to_string()
                }
                _ => self
                    .theme
                    .duration
                    .apply_to(format_duration(outcome.duration))
                    .to_string(),
            };
            lines.push(format!(
                "  {} {} {:<20} {}",
                b.apply_to("│"),
                kind.styled(&self.theme),
                outcome.name,
                right_side
            ));
        }

        lines.push(format!(
            "  {}",
            b.apply_to("├────────────────────────────────────")
        ));
        lines.push(format!(
            "  {} Total: {} {} {} completed {} {} skipped {} {} warnings",
            b.apply_to("│"),
            self.theme
                .duration
                .apply_to(format_duration(report.total_duration)),
            self.theme.dim.apply_to("·"),
            report.count(StepStatus::Completed),
            self.theme.dim.apply_to("·"),
            report.count(StepStatus::Skipped),
            self.theme.dim.apply_to("·"),
            report.advisories().count(),
        ));
        lines.push(format!(
            "  {}",
            b.apply_to("└────────────────────────────────────")
        ));

        for line in lines {
            self.write_line(&line);
        }
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() && !crate::shell::is_ci() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
