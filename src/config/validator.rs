//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - The install directory is absolute and never `/`
//! - Names that end up in unit files or command lines are well-formed
//! - Paths inside the install directory stay inside it
//! - The port is usable

use crate::config::schema::InstallerConfig;
use crate::error::{ProvisionError, Result};
use regex::Regex;
use std::path::{Component, Path};
use std::sync::LazyLock;

// --- Compiled regexes (one-time via LazyLock) ---

static UNIT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9:_.@-]*$").unwrap());

static ASGI_MODULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*:[A-Za-z_][A-Za-z0-9_.()]*$").unwrap()
});

static PROGRAM_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.+-]*$").unwrap());

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Dotted config key the error refers to
    pub field: String,
}

impl ValidationError {
    fn new(rule: &str, field: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
            field: field.to_string(),
        }
    }
}

/// Validate a configuration and return all errors.
///
/// This function collects all validation errors rather than stopping
/// at the first one, allowing users to fix multiple issues at once.
pub fn validate_config(config: &InstallerConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_app(config));
    errors.extend(validate_paths(config));
    errors.extend(validate_engine(config));
    errors.extend(validate_packages(config));

    errors
}

fn validate_app(config: &InstallerConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let app = &config.app;

    if !UNIT_NAME.is_match(&app.name) || app.name.ends_with(".service") {
        errors.push(ValidationError::new(
            "unit-name",
            "app.name",
            format!(
                "'{}' is not a valid service name (letters, digits, ':', '_', '.', '@', '-')",
                app.name
            ),
        ));
    }

    if !ASGI_MODULE.is_match(&app.module) {
        errors.push(ValidationError::new(
            "asgi-module",
            "app.module",
            format!("'{}' must look like 'module:attribute'", app.module),
        ));
    }

    if !PROGRAM_NAME.is_match(&app.launcher) {
        errors.push(ValidationError::new(
            "program-name",
            "app.launcher",
            format!("'{}' must be a bare executable name", app.launcher),
        ));
    }

    if app.host.trim().is_empty() || app.host.chars().any(char::is_whitespace) {
        errors.push(ValidationError::new(
            "listen-host",
            "app.host",
            "listen address must be a single non-empty word",
        ));
    }

    if app.port == 0 {
        errors.push(ValidationError::new(
            "listen-port",
            "app.port",
            "port must be between 1 and 65535",
        ));
    }

    if !app.docs_path.starts_with('/') {
        errors.push(ValidationError::new(
            "docs-path",
            "app.docs_path",
            format!("'{}' must start with '/'", app.docs_path),
        ));
    }

    if app.description.contains(['\n', '\r']) || app.description.ends_with('\\') {
        errors.push(ValidationError::new(
            "single-line",
            "app.description",
            "description must fit on one line and not end with a backslash",
        ));
    }

    errors
}

fn validate_paths(config: &InstallerConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let paths = &config.paths;

    if !paths.install_dir.is_absolute() {
        errors.push(ValidationError::new(
            "absolute-path",
            "paths.install_dir",
            format!("'{}' must be absolute", paths.install_dir.display()),
        ));
    } else if paths.install_dir.parent().is_none() || has_parent_refs(&paths.install_dir) {
        errors.push(ValidationError::new(
            "unsafe-install-dir",
            "paths.install_dir",
            format!(
                "'{}' cannot be wiped safely; pick a dedicated directory",
                paths.install_dir.display()
            ),
        ));
    }

    if !paths.unit_dir.is_absolute() {
        errors.push(ValidationError::new(
            "absolute-path",
            "paths.unit_dir",
            format!("'{}' must be absolute", paths.unit_dir.display()),
        ));
    }

    if let Some(source) = &paths.source_dir {
        if !source.is_absolute() {
            errors.push(ValidationError::new(
                "absolute-path",
                "paths.source_dir",
                format!("'{}' must be absolute", source.display()),
            ));
        }
    }

    for (field, value) in [("paths.venv_dir", &paths.venv_dir), ("paths.manifest", &paths.manifest)] {
        if !is_contained_relative(value) {
            errors.push(ValidationError::new(
                "relative-path",
                field,
                format!(
                    "'{}' must be a relative path inside the install directory",
                    value.display()
                ),
            ));
        }
    }

    errors
}

fn validate_engine(config: &InstallerConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let engine = &config.engine;

    if !PROGRAM_NAME.is_match(&engine.binary) {
        errors.push(ValidationError::new(
            "program-name",
            "engine.binary",
            format!("'{}' must be a bare executable name", engine.binary),
        ));
    }

    if !UNIT_NAME.is_match(&engine.service) {
        errors.push(ValidationError::new(
            "unit-name",
            "engine.service",
            format!("'{}' is not a valid service name", engine.service),
        ));
    }

    if !(engine.install_url.starts_with("https://") || engine.install_url.starts_with("http://"))
    {
        errors.push(ValidationError::new(
            "install-url",
            "engine.install_url",
            format!("'{}' must be an http(s) URL", engine.install_url),
        ));
    }

    if engine.model.trim().is_empty() || engine.model.chars().any(char::is_whitespace) {
        errors.push(ValidationError::new(
            "model-name",
            "engine.model",
            "model must be a single non-empty word",
        ));
    }

    errors
}

fn validate_packages(config: &InstallerConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(names) = &config.packages.names {
        if names.is_empty() {
            errors.push(ValidationError::new(
                "package-list",
                "packages.names",
                "package list is empty; omit it to use the defaults",
            ));
        }
        for name in names {
            if name.trim().is_empty() || name.starts_with('-') {
                errors.push(ValidationError::new(
                    "package-name",
                    "packages.names",
                    format!("'{}' is not a package name", name),
                ));
            }
        }
    }

    errors
}

fn has_parent_refs(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
}

fn is_contained_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)))
}

/// Validate configuration, returning an error if invalid.
pub fn validate(config: &InstallerConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        Err(ProvisionError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
