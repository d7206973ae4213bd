//! System package manager detection and command construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shell::CommandSpec;

/// Supported system package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// Debian, Ubuntu.
    Apt,
    /// Fedora, RHEL.
    Dnf,
    /// Arch Linux.
    Pacman,
}

impl PackageManager {
    /// All supported managers, in detection order.
    pub const ALL: [PackageManager; 3] = [Self::Apt, Self::Dnf, Self::Pacman];

    /// Detect the host's package manager by its binary.
    pub fn detect(is_installed: impl Fn(&str) -> bool) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|pm| is_installed(pm.binary()))
    }

    /// The executable driving this manager.
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Pacman => "pacman",
        }
    }

    /// Packages providing python3, venv, pip and curl.
    pub fn default_packages(&self) -> &'static [&'static str] {
        match self {
            Self::Apt => &["python3", "python3-venv", "python3-pip", "curl"],
            Self::Dnf => &["python3", "python3-pip", "curl"],
            Self::Pacman => &["python", "python-pip", "curl"],
        }
    }

    /// Command refreshing the package index.
    ///
    /// pacman upgrades along with the sync; a bare `-Sy` would leave a
    /// partial upgrade behind once new packages are installed.
    pub fn refresh_command(&self) -> CommandSpec {
        match self {
            Self::Apt => CommandSpec::new("apt-get")
                .arg("update")
                .env("DEBIAN_FRONTEND", "noninteractive"),
            Self::Dnf => CommandSpec::new("dnf").args(["makecache", "-y"]),
            Self::Pacman => CommandSpec::new("pacman").args(["-Syu", "--noconfirm"]),
        }
    }

    /// Command installing `packages` without prompting.
    pub fn install_command<S: AsRef<str>>(&self, packages: &[S]) -> CommandSpec {
        let names = packages.iter().map(|p| p.as_ref().to_string());
        match self {
            Self::Apt => CommandSpec::new("apt-get")
                .args(["install", "-y"])
                .args(names)
                .env("DEBIAN_FRONTEND", "noninteractive"),
            Self::Dnf => CommandSpec::new("dnf").args(["install", "-y"]).args(names),
            Self::Pacman => CommandSpec::new("pacman")
                .args(["-S", "--needed", "--noconfirm"])
                .args(names),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Pacman => "pacman",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_apt() {
        let detected = PackageManager::detect(|bin| bin == "apt-get" || bin == "dnf");
        assert_eq!(detected, Some(PackageManager::Apt));
    }

    #[test]
    fn detect_falls_through_to_pacman() {
        let detected = PackageManager::detect(|bin| bin == "pacman");
        assert_eq!(detected, Some(PackageManager::Pacman));
    }

    #[test]
    fn detect_none_when_nothing_installed() {
        assert_eq!(PackageManager::detect(|_| false), None);
    }

    #[test]
    fn apt_install_is_non_interactive() {
        let cmd = PackageManager::Apt.install_command(&["python3", "curl"]);
        assert_eq!(cmd.display(), "apt-get install -y python3 curl");
        assert_eq!(
            cmd.env.get("DEBIAN_FRONTEND").map(String::as_str),
            Some("noninteractive")
        );
    }

    #[test]
    fn pacman_install_skips_installed() {
        let cmd = PackageManager::Pacman.install_command(&["python"]);
        assert_eq!(cmd.display(), "pacman -S --needed --noconfirm python");
    }

    #[test]
    fn refresh_commands() {
        assert_eq!(PackageManager::Apt.refresh_command().display(), "apt-get update");
        assert_eq!(PackageManager::Dnf.refresh_command().display(), "dnf makecache -y");
        assert_eq!(
            PackageManager::Pacman.refresh_command().display(),
            "pacman -Syu --noconfirm"
        );
    }

    #[test]
    fn default_packages_include_curl() {
        for pm in PackageManager::ALL {
            assert!(pm.default_packages().contains(&"curl"), "{pm}");
        }
    }

    #[test]
    fn deserializes_lowercase() {
        let pm: PackageManager = serde_yaml::from_str("dnf").unwrap();
        assert_eq!(pm, PackageManager::Dnf);
        assert_eq!(pm.to_string(), "dnf");
    }
}
