//! Status icons for step outcomes.

use crate::runner::StepStatus;

use super::theme::ProvisionerTheme;

/// Canonical status kinds used in run summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Step completed.
    Success,
    /// Fatal step failed.
    Failed,
    /// Nothing needed doing.
    Skipped,
    /// Best-effort step failed; the run went on.
    Warning,
}

impl StatusKind {
    /// Map a step outcome; failures of optional steps are warnings.
    pub fn for_outcome(status: StepStatus, advisory: bool) -> Self {
        match status {
            StepStatus::Completed => Self::Success,
            StepStatus::Skipped => Self::Skipped,
            StepStatus::Failed if advisory => Self::Warning,
            StepStatus::Failed => Self::Failed,
        }
    }

    /// Unicode icon.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Failed => "✗",
            Self::Skipped => "○",
            Self::Warning => "⚠",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &ProvisionerTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Skipped => theme.dim.apply_to(icon).to_string(),
            Self::Warning => theme.warning.apply_to(icon).to_string(),
        }
    }
}
