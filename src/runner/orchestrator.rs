//! The driver loop that executes a plan of steps.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::ProvisionError;
use crate::shell::CommandRunner;
use crate::ui::{format_duration, SpinnerHandle, UserInterface};

use super::context::RunContext;
use super::report::{RunReport, StepOutcome, StepStatus};
use super::step::{Fatality, Step, StepEffect};

/// A step as listed by `provisioner plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    /// 1-based position.
    pub index: usize,
    pub name: String,
    pub title: String,
    pub fatality: Fatality,
}

/// Runs an ordered list of steps exactly once each.
///
/// Steps run in declared order. A failing [`Fatality::Fatal`] step ends the
/// run before the next step starts; a failing [`Fatality::BestEffort`] step
/// is logged, recorded, and the run moves on.
#[derive(Debug)]
pub struct Orchestrator {
    steps: Vec<Step>,
}

impl Orchestrator {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// The plan without running it.
    pub fn describe(&self) -> Vec<PlannedStep> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| PlannedStep {
                index: i + 1,
                name: step.name().to_string(),
                title: step.title().to_string(),
                fatality: step.fatality(),
            })
            .collect()
    }

    /// Execute every step against the host.
    ///
    /// The returned report carries the aborting error in
    /// [`RunReport::failure`] when a fatal step failed.
    pub fn execute(
        &self,
        ctx: &RunContext,
        runner: &mut dyn CommandRunner,
        ui: &mut dyn UserInterface,
    ) -> RunReport {
        let started = Instant::now();
        let total = self.steps.len();
        let mut report = RunReport::default();

        for (index, step) in self.steps.iter().enumerate() {
            ui.show_step(index + 1, total, step.title());
            info!("Starting step {} ({}/{})", step.name(), index + 1, total);

            // Dry-run output is printed line by line; a spinner would overwrite it.
            let spinner = if runner.is_dry_run() {
                None
            } else {
                Some(ui.start_spinner(step.title()))
            };

            let step_started = Instant::now();
            let result = step.perform(ctx, runner, ui);
            let duration = step_started.elapsed();

            let mut outcome = StepOutcome {
                name: step.name().to_string(),
                title: step.title().to_string(),
                fatality: step.fatality(),
                status: StepStatus::Completed,
                duration,
                error: None,
                detail: None,
            };

            match result {
                Ok(effect) => {
                    let (status, detail) = match effect {
                        StepEffect::Done => (StepStatus::Completed, None),
                        StepEffect::DoneWith(note) => (StepStatus::Completed, Some(note)),
                        StepEffect::Skipped(reason) => (StepStatus::Skipped, Some(reason)),
                    };
                    let line = finish_line(step.title(), detail.as_deref(), duration);
                    finish(spinner, ui, status, &line);
                    info!("Step {} finished: {:?}", step.name(), status);

                    outcome.status = status;
                    outcome.detail = detail;
                    report.outcomes.push(outcome);
                }
                Err(err) => {
                    let message = err.to_string();
                    finish(
                        spinner,
                        ui,
                        StepStatus::Failed,
                        &format!("{} failed", step.title()),
                    );

                    outcome.status = StepStatus::Failed;
                    outcome.error = Some(message.clone());
                    report.outcomes.push(outcome);

                    match step.fatality() {
                        Fatality::Fatal => {
                            error!("Step {} failed: {}", step.name(), message);
                            report.failure = Some(match err {
                                fatal @ ProvisionError::FatalStep { .. } => fatal,
                                _ => ProvisionError::FatalStep {
                                    step: step.name().to_string(),
                                    message,
                                },
                            });
                            break;
                        }
                        Fatality::BestEffort => {
                            let advisory = ProvisionError::Advisory {
                                step: step.name().to_string(),
                                message,
                            };
                            warn!("{}", advisory);
                            ui.warning(&format!("{}; continuing", advisory));
                        }
                    }
                }
            }
        }

        report.total_duration = started.elapsed();
        report
    }
}

fn finish_line(title: &str, detail: Option<&str>, duration: Duration) -> String {
    match detail {
        Some(detail) => format!("{}: {} ({})", title, detail, format_duration(duration)),
        None => format!("{} ({})", title, format_duration(duration)),
    }
}

fn finish(
    spinner: Option<Box<dyn SpinnerHandle>>,
    ui: &mut dyn UserInterface,
    status: StepStatus,
    line: &str,
) {
    match (spinner, status) {
        (Some(mut s), StepStatus::Completed) => s.finish_success(line),
        (Some(mut s), StepStatus::Skipped) => s.finish_skipped(line),
        (Some(mut s), StepStatus::Failed) => s.finish_error(line),
        (None, StepStatus::Completed) => ui.success(line),
        (None, StepStatus::Skipped) => ui.skipped(line),
        (None, StepStatus::Failed) => ui.error(line),
    }
}
