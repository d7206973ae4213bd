//! systemd service-unit generation.
//!
//! The unit is built as a [`ServiceUnit`] value and serialized with
//! escaping; no raw value is ever spliced into the file text.
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
//! assert!(text.contains("Restart=always\n"));
//! ```

pub mod descriptor;
pub mod escape;

pub use descriptor::{ExecCommand, RestartPolicy, ServiceUnit};
pub use escape::{check_value, escape_specifiers, quote_exec_word};
