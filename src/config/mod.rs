//! Configuration loading, parsing, and validation.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use provisioner::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("provisioner.yml"), "app:\n  port: 9000\n").unwrap();
//!
//! let config = load_config(None, temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.app.port, 9000);
//! ```
//!
//! # Configuration File Locations
//!
//! Without `--config`, the working directory is searched for:
//! 1. `provisioner.yml`
//! 2. `.provisioner/config.yml`
//!
//! If neither exists, the built-in defaults are used.

pub mod loader;
pub mod schema;
pub mod validator;

// Schema re-exports
pub use schema::{
    AppConfig, EngineConfig, InstallerConfig, PackagesConfig, PathsConfig, PayloadConfig,
};

// Loader re-exports
pub use loader::{discover_config, load_config, load_config_file, parse_config, CONFIG_CANDIDATES};

// Validator re-exports
pub use validator::{validate, validate_config, ValidationError};
