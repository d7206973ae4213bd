//! Step descriptors.

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::shell::CommandRunner;
use crate::ui::UserInterface;

use super::context::RunContext;

/// What happens to the run when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fatality {
    /// Failure aborts the run.
    Fatal,
    /// Failure is logged and the run continues.
    BestEffort,
}

impl fmt::Display for Fatality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fatality::Fatal => write!(f, "fatal"),
            Fatality::BestEffort => write!(f, "best-effort"),
        }
    }
}

/// What a successful step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEffect {
    /// The step did its work.
    Done,
    /// The step did its work; the note is shown next to it.
    DoneWith(String),
    /// Nothing needed doing.
    Skipped(String),
}

/// The side effect of a step.
pub type StepAction =
    Box<dyn Fn(&RunContext, &mut dyn CommandRunner, &mut dyn UserInterface) -> Result<StepEffect>>;

/// One provisioning step.
pub struct Step {
    name: String,
    title: String,
    fatality: Fatality,
    action: StepAction,
}

impl Step {
    /// Describe a step.
    pub fn new<F>(
        name: impl Into<String>,
        title: impl Into<String>,
        fatality: Fatality,
        action: F,
    ) -> Self
    where
        F: Fn(&RunContext, &mut dyn CommandRunner, &mut dyn UserInterface) -> Result<StepEffect>
            + 'static,
    {
        Self {
            name: name.into(),
            title: title.into(),
            fatality,
            action: Box::new(action),
        }
    }

    /// A [`Fatality::Fatal`] step.
    pub fn fatal<F>(name: impl Into<String>, title: impl Into<String>, action: F) -> Self
    where
        F: Fn(&RunContext, &mut dyn CommandRunner, &mut dyn UserInterface) -> Result<StepEffect>
            + 'static,
    {
        Self::new(name, title, Fatality::Fatal, action)
    }

    /// A [`Fatality::BestEffort`] step.
    pub fn best_effort<F>(name: impl Into<String>, title: impl Into<String>, action: F) -> Self
    where
        F: Fn(&RunContext, &mut dyn CommandRunner, &mut dyn UserInterface) -> Result<StepEffect>
            + 'static,
    {
        Self::new(name, title, Fatality::BestEffort, action)
    }

    /// Label used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Banner text.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fatality(&self) -> Fatality {
        self.fatality
    }

    /// Perform the step's side effect.
    pub fn perform(
        &self,
        ctx: &RunContext,
        runner: &mut dyn CommandRunner,
        ui: &mut dyn UserInterface,
    ) -> Result<StepEffect> {
        (self.action)(ctx, runner, ui)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("fatality", &self.fatality)
            .finish_non_exhaustive()
    }
}
