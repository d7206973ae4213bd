//! PATH lookup for external programs.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Find `program` on the current `PATH`.
///
/// Names containing a `/` are checked directly instead of searched.
pub fn find_program(program: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    find_program_in(program, &path_var)
}

/// Find `program` in an explicit `PATH`-style search list.
pub fn find_program_in(program: &str, path_var: &OsStr) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }

    if program.contains('/') {
        let candidate = PathBuf::from(program);
        return is_executable(&candidate).then_some(candidate);
    }

    std::env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
