//! Preconditions checked before any step runs.
//!
//! Nothing in this module mutates the host. If a check fails the run ends
//! here, before the first banner is printed.

use crate::error::Result;

use super::privilege::{is_elevated, require_elevated};
use super::user::{resolve_invoking_user, InvokerEnv, InvokingUser, UserLookup};

/// Snapshot of the ambient facts the preconditions depend on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preflight {
    /// Effective UID is 0.
    pub elevated: bool,
    /// Who elevated the process.
    pub invoker: InvokerEnv,
}

impl Preflight {
    /// Capture the current process's privileges and invoker variables.
    pub fn detect() -> Self {
        Self {
            elevated: is_elevated(),
            invoker: InvokerEnv::from_process(),
        }
    }

    /// Check privileges first, then resolve the invoking user.
    pub fn verify(&self, users: &dyn UserLookup) -> Result<InvokingUser> {
        require_elevated(self.elevated)?;
        resolve_invoking_user(&self.invoker, users)
    }
}
