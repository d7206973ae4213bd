//! Provisioner - idempotent single-host installer for the cupom vision API.
//!
//! One run installs the system packages, lays the application down in its
//! install directory with its own Python virtual environment, brings up the
//! Ollama model runtime with the required model, and registers the
//! application as a systemd service. Running it again converges to the
//! same state.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`host`] - Privileges, the invoking user, package managers, addresses
//! - [`provision`] - The ordered provisioning steps
//! - [`runner`] - Step descriptors and the driver loop that executes them
//! - [`shell`] - External command execution behind the `CommandRunner` seam
//! - [`ui`] - Banners, spinners, and terminal output
//! - [`unit`] - Typed systemd service units
//!
//! # Example
//!
//! ```
//! use provisioner::config::InstallerConfig;
//! use provisioner::unit::ServiceUnit;
//!
//! let unit = ServiceUnit::for_app(&InstallerConfig::default(), "alice");
//! let text = unit.render().unwrap();
//! assert!(text.contains("User=alice\n"));
//! assert!(text.contains("WorkingDirectory=/opt/cupom-api\n"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod provision;
pub mod runner;
pub mod shell;
pub mod ui;
pub mod unit;

pub use error::{ProvisionError, Result};
