//! Ambient state shared by every step of a run.

use std::path::{Path, PathBuf};

use crate::config::InstallerConfig;
use crate::host::InvokingUser;

/// Facts captured once before the first step; steps only read them.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Account that owns the installation.
    pub user: InvokingUser,

    /// Resolved configuration.
    pub config: InstallerConfig,

    /// Directory whose contents become the install directory.
    pub source_dir: PathBuf,

    /// Describe mutations instead of performing them.
    pub dry_run: bool,
}

impl RunContext {
    /// Capture the context; the payload source falls back to `cwd`.
    pub fn new(user: InvokingUser, config: InstallerConfig, cwd: &Path, dry_run: bool) -> Self {
        let source_dir = config.paths.source_or(cwd).to_path_buf();
        Self {
            user,
            config,
            source_dir,
            dry_run,
        }
    }

    pub fn install_dir(&self) -> &Path {
        &self.config.paths.install_dir
    }
}
