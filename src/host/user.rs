//! Invoking-user resolution.
//!
//! The installer runs as root, but everything the application owns (the
//! install directory, the virtual environment, the service's `User=`)
//! belongs to the person who called `sudo`. This module works out who that
//! is.

use std::path::PathBuf;

use crate::error::{ProvisionError, Result};

/// The non-elevated account that invoked the installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokingUser {
    /// Login name.
    pub name: String,
    /// Numeric user ID.
    pub uid: u32,
    /// Primary group ID.
    pub gid: u32,
    /// Home directory.
    pub home: PathBuf,
}

impl InvokingUser {
    /// `user:group` in numeric form, suitable for `chown`.
    pub fn owner_spec(&self) -> String {
        format!("{}:{}", self.uid, self.gid)
    }

    /// Whether this is the superuser.
    pub fn is_root(&self) -> bool {
        self.uid == 0
    }
}

/// Lookup into the system user database.
pub trait UserLookup {
    /// Find a user by login name.
    fn by_name(&self, name: &str) -> Option<InvokingUser>;

    /// Find a user by numeric ID.
    fn by_uid(&self, uid: u32) -> Option<InvokingUser>;
}

/// [`UserLookup`] backed by the host's passwd database.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUsers;

#[cfg(unix)]
impl UserLookup for SystemUsers {
    fn by_name(&self, name: &str) -> Option<InvokingUser> {
        match nix::unistd::User::from_name(name) {
            Ok(user) => user.map(from_nix),
            Err(e) => {
                tracing::debug!("getpwnam({}) failed: {}", name, e);
                None
            }
        }
    }

    fn by_uid(&self, uid: u32) -> Option<InvokingUser> {
        match nix::unistd::User::from_uid(nix::unistd::Uid::from_raw(uid)) {
            Ok(user) => user.map(from_nix),
            Err(e) => {
                tracing::debug!("getpwuid({}) failed: {}", uid, e);
                None
            }
        }
    }
}

#[cfg(not(unix))]
impl UserLookup for SystemUsers {
    fn by_name(&self, _name: &str) -> Option<InvokingUser> {
        None
    }

    fn by_uid(&self, _uid: u32) -> Option<InvokingUser> {
        None
    }
}

#[cfg(unix)]
fn from_nix(user: nix::unistd::User) -> InvokingUser {
    InvokingUser {
        name: user.name,
        uid: user.uid.as_raw(),
        gid: user.gid.as_raw(),
        home: user.dir,
    }
}

/// Environment variables that identify who elevated the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokerEnv {
    /// `SUDO_USER`, set by sudo.
    pub sudo_user: Option<String>,
    /// `PKEXEC_UID`, set by pkexec.
    pub pkexec_uid: Option<String>,
}

impl InvokerEnv {
    /// Read the variables from the current process environment.
    pub fn from_process() -> Self {
        Self {
            sudo_user: non_empty_var("SUDO_USER"),
            pkexec_uid: non_empty_var("PKEXEC_UID"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the invoking user from `env` through `users`.
///
/// `SUDO_USER` wins over `PKEXEC_UID`. Root is rejected: running the
/// application and its virtual environment as root is exactly what the
/// ownership hand-off exists to avoid.
pub fn resolve_invoking_user(env: &InvokerEnv, users: &dyn UserLookup) -> Result<InvokingUser> {
    let user = if let Some(name) = &env.sudo_user {
        users.by_name(name).ok_or_else(|| ProvisionError::Environment {
            message: format!("SUDO_USER '{}' is not in the user database", name),
        })?
    } else if let Some(raw) = &env.pkexec_uid {
        let uid: u32 = raw.trim().parse().map_err(|_| ProvisionError::Environment {
            message: format!("PKEXEC_UID '{}' is not a numeric user ID", raw),
        })?;
        users.by_uid(uid).ok_or_else(|| ProvisionError::Environment {
            message: format!("PKEXEC_UID {} is not in the user database", uid),
        })?
    } else {
        return Err(ProvisionError::Environment {
            message: "neither SUDO_USER nor PKEXEC_UID is set. \
                      Run the installer through sudo from your own account"
                .to_string(),
        });
    };

    if user.is_root() {
        return Err(ProvisionError::Environment {
            message: "the invoking user is root. \
                      Run the installer with sudo from a regular account"
                .to_string(),
        });
    }

    if user.home.as_os_str().is_empty() {
        return Err(ProvisionError::Environment {
            message: format!("user '{}' has no home directory", user.name),
        });
    }

    tracing::debug!(
        "invoking user: {} (uid={}, gid={}, home={})",
        user.name,
        user.uid,
        user.gid,
        user.home.display()
    );

    Ok(user)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Static user table for tests.
    pub(crate) struct FakeUsers(pub Vec<InvokingUser>);

    impl UserLookup for FakeUsers {
        fn by_name(&self, name: &str) -> Option<InvokingUser> {
            self.0.iter().find(|u| u.name == name).cloned()
        }

        fn by_uid(&self, uid: u32) -> Option<InvokingUser> {
            self.0.iter().find(|u| u.uid == uid).cloned()
        }
    }

    pub(crate) fn alice() -> InvokingUser {
        InvokingUser {
            name: "alice".to_string(),
            uid: 1000,
            gid: 1000,
            home: PathBuf::from("/home/alice"),
        }
    }

    fn root() -> InvokingUser {
        InvokingUser {
            name: "root".to_string(),
            uid: 0,
            gid: 0,
            home: PathBuf::from("/root"),
        }
    }

    fn users() -> FakeUsers {
        FakeUsers(vec![alice(), root()])
    }

    #[test]
    fn resolves_sudo_user() {
        let env = InvokerEnv {
            sudo_user: Some("alice".into()),
            pkexec_uid: None,
        };
        assert_eq!(resolve_invoking_user(&env, &users()).unwrap(), alice());
    }

    #[test]
    fn sudo_user_wins_over_pkexec() {
        let env = InvokerEnv {
            sudo_user: Some("alice".into()),
            pkexec_uid: Some("0".into()),
        };
        assert_eq!(resolve_invoking_user(&env, &users()).unwrap().name, "alice");
    }

    #[test]
    fn resolves_pkexec_uid() {
        let env = InvokerEnv {
            sudo_user: None,
            pkexec_uid: Some("1000".into()),
        };
        assert_eq!(resolve_invoking_user(&env, &users()).unwrap(), alice());
    }

    #[test]
    fn unknown_sudo_user_is_environment_error() {
        let env = InvokerEnv {
            sudo_user: Some("mallory".into()),
            pkexec_uid: None,
        };
        let err = resolve_invoking_user(&env, &users()).unwrap_err();
        assert!(matches!(err, ProvisionError::Environment { .. }));
        assert!(err.to_string().contains("mallory"));
    }

    #[test]
    fn non_numeric_pkexec_uid_is_environment_error() {
        let env = InvokerEnv {
            sudo_user: None,
            pkexec_uid: Some("abc".into()),
        };
        let err = resolve_invoking_user(&env, &users()).unwrap_err();
        assert!(matches!(err, ProvisionError::Environment { .. }));
    }

    #[test]
    fn missing_invoker_is_environment_error() {
        let err = resolve_invoking_user(&InvokerEnv::default(), &users()).unwrap_err();
        assert!(matches!(err, ProvisionError::Environment { .. }));
    }

    #[test]
    fn root_invoker_is_rejected() {
        let env = InvokerEnv {
            sudo_user: Some("root".into()),
            pkexec_uid: None,
        };
        let err = resolve_invoking_user(&env, &users()).unwrap_err();
        assert!(err.to_string().contains("root"));
    }

    #[test]
    fn owner_spec_is_numeric() {
        assert_eq!(alice().owner_spec(), "1000:1000");
    }

    #[test]
    #[cfg(unix)]
    fn system_users_finds_root() {
        let root = SystemUsers.by_uid(0).expect("uid 0 exists");
        assert!(root.is_root());
    }
}
