//! Configuration file discovery and loading.

use crate::config::schema::InstallerConfig;
use crate::error::{ProvisionError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File names probed in the working directory, in priority order.
pub const CONFIG_CANDIDATES: &[&str] = &["provisioner.yml", ".provisioner/config.yml"];

/// Find a config file under `dir`, if one exists.
pub fn discover_config(dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Parse configuration from a YAML string.
pub fn parse_config(content: &str, path: &Path) -> Result<InstallerConfig> {
    // An empty file is valid and means "all defaults".
    if content.trim().is_empty() {
        return Ok(InstallerConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| ProvisionError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<InstallerConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProvisionError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ProvisionError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Load the effective configuration.
///
/// An explicit path must exist. Without one, the working directory is
/// searched; finding nothing yields the built-in defaults.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<InstallerConfig> {
    if let Some(path) = explicit {
        tracing::debug!("loading config from {}", path.display());
        return load_config_file(path);
    }

    match discover_config(cwd) {
        Some(path) => {
            tracing::debug!("discovered config at {}", path.display());
            load_config_file(&path)
        }
        None => {
            tracing::debug!("no config file in {}, using defaults", cwd.display());
            Ok(InstallerConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_explicit_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.yml");
        let err = load_config(Some(&path), temp.path()).unwrap_err();
        assert!(matches!(err, ProvisionError::ConfigNotFound { .. }));
    }

    #[test]
    fn no_file_means_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(None, temp.path()).unwrap();
        assert_eq!(config, InstallerConfig::default());
    }

    #[test]
    fn discovers_root_file_first() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".provisioner")).unwrap();
        fs::write(temp.path().join(".provisioner/config.yml"), "app:\n  port: 1\n").unwrap();
        fs::write(temp.path().join("provisioner.yml"), "app:\n  port: 2\n").unwrap();

        let config = load_config(None, temp.path()).unwrap();
        assert_eq!(config.app.port, 2);
    }

    #[test]
    fn discovers_hidden_dir_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".provisioner")).unwrap();
        fs::write(
            temp.path().join(".provisioner/config.yml"),
            "engine:\n  model: llava\n",
        )
        .unwrap();

        let config = load_config(None, temp.path()).unwrap();
        assert_eq!(config.engine.model, "llava");
    }

    #[test]
    fn empty_file_is_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("provisioner.yml");
        fs::write(&path, "\n").unwrap();
        assert_eq!(load_config_file(&path).unwrap(), InstallerConfig::default());
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("provisioner.yml");
        fs::write(&path, "app: [unclosed").unwrap();

        let err = load_config_file(&path).unwrap_err();
        match err {
            ProvisionError::ConfigParseError { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
