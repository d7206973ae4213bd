//! Privilege checks.

use crate::error::{ProvisionError, Result};

/// Check if running as root.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Fail with [`ProvisionError::PermissionDenied`] unless `elevated`.
pub fn require_elevated(elevated: bool) -> Result<()> {
    if elevated {
        return Ok(());
    }

    Err(ProvisionError::PermissionDenied {
        message: "this installer changes system packages and services. \
                  Re-run it with sudo: sudo provisioner"
            .to_string(),
    })
}
