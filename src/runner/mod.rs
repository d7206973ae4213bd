//! Step execution orchestration.

pub mod context;
pub mod orchestrator;
pub mod report;
pub mod step;

pub use context::RunContext;
pub use orchestrator::{Orchestrator, PlannedStep};
pub use report::{RunReport, StepOutcome, StepStatus};
pub use step::{Fatality, Step, StepAction, StepEffect};
