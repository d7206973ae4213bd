//! What happened during a run.

use std::time::Duration;

use crate::error::ProvisionError;

use super::step::Fatality;

/// Final state of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Ran and succeeded.
    Completed,
    /// Ran and failed.
    Failed,
    /// Nothing needed doing.
    Skipped,
}

/// Result of one executed step.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub name: String,
    pub title: String,
    pub fatality: Fatality,
    pub status: StepStatus,
    pub duration: Duration,
    /// Failure message, for failed steps.
    pub error: Option<String>,
    /// Short note (what was installed, why it was skipped).
    pub detail: Option<String>,
}

/// Outcomes of every step that ran, in execution order.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per executed step.
    pub outcomes: Vec<StepOutcome>,
    /// Wall time of the whole run.
    pub total_duration: Duration,
    /// The error that aborted the run, if a fatal step failed.
    pub failure: Option<ProvisionError>,
}

impl RunReport {
    /// No fatal step failed.
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }

    /// Outcome of the step called `name`.
    pub fn outcome(&self, name: &str) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    /// Best-effort steps that failed.
    pub fn advisories(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == StepStatus::Failed && o.fatality == Fatality::BestEffort)
    }

    pub fn count(&self, status: StepStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Step names in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.outcomes.iter().map(|o| o.name.as_str()).collect()
    }

    /// Hand back the fatal error, if any, keeping the report.
    pub fn take_failure(&mut self) -> Option<ProvisionError> {
        self.failure.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, fatality: Fatality, status: StepStatus) -> StepOutcome {
        StepOutcome {
            name: name.to_string(),
            title: name.to_string(),
            fatality,
            status,
            duration: Duration::ZERO,
            error: None,
            detail: None,
        }
    }

    #[test]
    fn empty_report_is_success() {
        assert!(RunReport::default().success());
    }

    #[test]
    fn advisories_are_failed_best_effort_steps() {
        let report = RunReport {
            outcomes: vec![
                outcome("a", Fatality::Fatal, StepStatus::Completed),
                outcome("b", Fatality::BestEffort, StepStatus::Failed),
                outcome("c", Fatality::BestEffort, StepStatus::Skipped),
            ],
            ..Default::default()
        };
        let names: Vec<_> = report.advisories().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["b"]);
        assert_eq!(report.count(StepStatus::Skipped), 1);
        assert_eq!(report.step_names(), vec!["a", "b", "c"]);
        assert!(report.success());
    }

    #[test]
    fn failure_makes_report_unsuccessful() {
        let mut report = RunReport {
            failure: Some(ProvisionError::FatalStep {
                step: "create-venv".into(),
                message: "boom".into(),
            }),
            ..Default::default()
        };
        assert!(!report.success());
        assert!(report.take_failure().is_some());
        assert!(report.success());
    }
}
