//! Configuration schema definitions.
//!
//! This module contains the structs that map to the YAML configuration
//! file. Every field has a default, so an empty file (or no file at all)
//! describes the stock installation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::host::PackageManager;

/// Root configuration structure for `provisioner.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    /// The web application being installed.
    pub app: AppConfig,

    /// Filesystem locations.
    pub paths: PathsConfig,

    /// Model-runtime engine.
    pub engine: EngineConfig,

    /// System packages.
    pub packages: PackagesConfig,

    /// What gets copied into the install directory.
    pub payload: PayloadConfig,
}

/// The web application and how its server is launched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Service name; also the unit file's stem.
    pub name: String,

    /// Unit `Description=`.
    pub description: String,

    /// ASGI application path passed to the launcher (`module:attribute`).
    pub module: String,

    /// Launcher executable inside the virtual environment's `bin/`.
    pub launcher: String,

    /// Listen address.
    pub host: String,

    /// Listen port.
    pub port: u16,

    /// Path of the interactive API docs, for the summary URL.
    pub docs_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "cupom-api".to_string(),
            description: "Processador de Cupons Fiscais - IA Vision".to_string(),
            module: "main:app".to_string(),
            launcher: "uvicorn".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            docs_path: "/docs".to_string(),
        }
    }
}

impl AppConfig {
    /// Unit file name, e.g. `cupom-api.service`.
    pub fn unit_file_name(&self) -> String {
        format!("{}.service", self.name)
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Target install directory. Wiped and recreated on every run.
    pub install_dir: PathBuf,

    /// Payload to copy; `None` means the current working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,

    /// Where the service manager looks for unit files.
    pub unit_dir: PathBuf,

    /// Virtual environment directory, relative to `install_dir`.
    pub venv_dir: PathBuf,

    /// Dependency manifest, relative to `install_dir`.
    pub manifest: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("/opt/cupom-api"),
            source_dir: None,
            unit_dir: PathBuf::from("/etc/systemd/system"),
            venv_dir: PathBuf::from("venv"),
            manifest: PathBuf::from("requirements.txt"),
        }
    }
}

impl PathsConfig {
    /// Absolute path of the virtual environment.
    pub fn venv_path(&self) -> PathBuf {
        self.install_dir.join(&self.venv_dir)
    }

    /// Absolute path of an executable inside the virtual environment.
    pub fn venv_bin(&self, program: &str) -> PathBuf {
        self.venv_path().join("bin").join(program)
    }

    /// Absolute path of the dependency manifest after the payload copy.
    pub fn manifest_path(&self) -> PathBuf {
        self.install_dir.join(&self.manifest)
    }

    /// Absolute path of the unit file for `app`.
    pub fn unit_path(&self, app: &AppConfig) -> PathBuf {
        self.unit_dir.join(app.unit_file_name())
    }

    /// The payload source, falling back to `cwd`.
    pub fn source_or<'a>(&'a self, cwd: &'a Path) -> &'a Path {
        self.source_dir.as_deref().unwrap_or(cwd)
    }
}

/// The model-runtime engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Engine CLI looked up on `PATH`.
    pub binary: String,

    /// Engine's systemd service.
    pub service: String,

    /// Official install script.
    pub install_url: String,

    /// Model pulled after the engine is up.
    pub model: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: "ollama".to_string(),
            service: "ollama".to_string(),
            install_url: "https://ollama.com/install.sh".to_string(),
            model: "qwen32b-custom".to_string(),
        }
    }
}

impl EngineConfig {
    /// Unit name used for `After=` ordering.
    pub fn unit_name(&self) -> String {
        format!("{}.service", self.service)
    }
}

/// System packages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackagesConfig {
    /// Package manager; detected from the host when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<PackageManager>,

    /// Packages to install; the manager's defaults when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
}

impl PackagesConfig {
    /// Packages to install with `manager`.
    pub fn resolve_names(&self, manager: PackageManager) -> Vec<String> {
        match &self.names {
            Some(names) => names.clone(),
            None => manager
                .default_packages()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// What gets copied into the install directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PayloadConfig {
    /// Entry names skipped anywhere in the source tree (e.g. `.git`).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl PayloadConfig {
    /// Whether an entry with this file name is excluded.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|e| e == name)
    }
}
