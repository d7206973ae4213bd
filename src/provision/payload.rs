//! Install-directory reset and payload copy.
//!
//! Both steps end by handing the whole install directory to the invoking
//! user, so everything below it (including the virtual environment created
//! later) is owned by the account the service runs as.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use tracing::debug;

use crate::config::PayloadConfig;
use crate::error::Result;
use crate::runner::{RunContext, StepEffect};
use crate::shell::{CommandRunner, CommandSpec};
use crate::ui::UserInterface;

/// What [`copy_tree`] copied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
    pub links: usize,
}

/// Remove the install directory and recreate it empty, owned by the user.
pub fn reset_install_dir(
    ctx: &RunContext,
    runner: &mut dyn CommandRunner,
    ui: &mut dyn UserInterface,
) -> Result<StepEffect> {
    let install_dir = ctx.install_dir();
    ensure_disjoint(&ctx.source_dir, install_dir)?;

    if ctx.dry_run {
        ui.message(&format!(
            "    Would remove and recreate {}",
            install_dir.display()
        ));
    } else {
        reset_dir(install_dir)?;
    }
    assign_owner(ctx, runner)?;

    Ok(StepEffect::DoneWith(format!(
        "{} owned by {}",
        install_dir.display(),
        ctx.user.name
    )))
}

/// Copy the source tree into the install directory, then re-assign ownership.
pub fn copy_payload(
    ctx: &RunContext,
    runner: &mut dyn CommandRunner,
    ui: &mut dyn UserInterface,
) -> Result<StepEffect> {
    let install_dir = ctx.install_dir();
    ensure_disjoint(&ctx.source_dir, install_dir)?;

    if !ctx.source_dir.is_dir() {
        return Err(anyhow!(
            "payload source {} is not a directory",
            ctx.source_dir.display()
        )
        .into());
    }

    let note = if ctx.dry_run {
        ui.message(&format!(
            "    Would copy {} into {}",
            ctx.source_dir.display(),
            install_dir.display()
        ));
        format!("from {}", ctx.source_dir.display())
    } else {
        let stats = copy_tree(&ctx.source_dir, install_dir, &ctx.config.payload)?;
        format!(
            "{} files, {} directories from {}",
            stats.files,
            stats.dirs,
            ctx.source_dir.display()
        )
    };
    assign_owner(ctx, runner)?;

    Ok(StepEffect::DoneWith(note))
}

fn assign_owner(ctx: &RunContext, runner: &mut dyn CommandRunner) -> Result<()> {
    let chown = CommandSpec::new("chown")
        .arg("-R")
        .arg(ctx.user.owner_spec())
        .path_arg(ctx.install_dir());
    runner.run_checked(&chown)?;
    Ok(())
}

/// Refuse layouts where wiping or filling the install directory would
/// touch the payload source.
pub fn ensure_disjoint(source: &Path, install_dir: &Path) -> Result<()> {
    let source = resolve(source);
    let install = resolve(install_dir);

    if install.starts_with(&source) {
        return Err(anyhow!(
            "install directory {} lies inside the payload source {}",
            install.display(),
            source.display()
        )
        .into());
    }
    if source.starts_with(&install) {
        return Err(anyhow!(
            "payload source {} lies inside the install directory {}, which is wiped first",
            source.display(),
            install.display()
        )
        .into());
    }
    Ok(())
}

/// Canonicalize the longest existing ancestor and re-append the rest.
fn resolve(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut rest = Vec::new();
    loop {
        if let Ok(mut resolved) = fs::canonicalize(existing) {
            for part in rest.iter().rev() {
                resolved.push(part);
            }
            return resolved;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                existing = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Remove `dir` (whatever is there) and create it again, empty.
pub fn reset_dir(dir: &Path) -> Result<()> {
    match fs::symlink_metadata(dir) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
            debug!("Removed {}", dir.display());
        }
        Ok(_) => fs::remove_file(dir).with_context(|| format!("Failed to remove {}", dir.display()))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(())
}

/// Recursively copy the contents of `src` into the existing directory `dst`.
///
/// Symlinks are recreated, not followed. Entries whose name is listed in
/// `payload.exclude` are skipped at any depth.
pub fn copy_tree(src: &Path, dst: &Path, payload: &PayloadConfig) -> Result<CopyStats> {
    let mut stats = CopyStats::default();
    copy_dir_contents(src, dst, payload, &mut stats)?;
    Ok(stats)
}

fn copy_dir_contents(
    src: &Path,
    dst: &Path,
    payload: &PayloadConfig,
    stats: &mut CopyStats,
) -> Result<()> {
    let mut entries = fs::read_dir(src)
        .with_context(|| format!("Failed to read {}", src.display()))?
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name();
        let from = entry.path();
        if payload.is_excluded(&name.to_string_lossy()) {
            debug!("Skipping excluded {}", from.display());
            continue;
        }

        let to = dst.join(&name);
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            fs::create_dir_all(&to).with_context(|| format!("Failed to create {}", to.display()))?;
            copy_dir_contents(&from, &to, payload, stats)?;
            // after the recursion, so read-only source dirs can still be filled
            fs::set_permissions(&to, fs::metadata(&from)?.permissions())?;
            stats.dirs += 1;
        } else if file_type.is_symlink() {
            copy_symlink(&from, &to)
                .with_context(|| format!("Failed to copy link {}", from.display()))?;
            stats.links += 1;
        } else if file_type.is_file() {
            fs::copy(&from, &to).with_context(|| {
                format!("Failed to copy {} to {}", from.display(), to.display())
            })?;
            stats.files += 1;
        } else {
            debug!("Skipping special file {}", from.display());
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    let target = fs::read_link(from)?;
    std::os::unix::fs::symlink(target, to)
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InstallerConfig;
    use crate::host::user::tests::alice;
    use crate::shell::{DryRunRunner, MockRunner};
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn listing(root: &Path) -> Vec<(String, Option<String>)> {
        let mut out = Vec::new();
        walk(root, root, &mut out);
        out.sort();
        out
    }

    fn walk(root: &Path, dir: &Path, out: &mut Vec<(String, Option<String>)>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let rel = path.strip_prefix(root).unwrap().to_string_lossy().into_owned();
            let meta = fs::symlink_metadata(&path).unwrap();
            if meta.is_dir() {
                out.push((rel, None));
                walk(root, &path, out);
            } else if meta.file_type().is_symlink() {
                out.push((rel, Some(format!("-> {}", fs::read_link(&path).unwrap().display()))));
            } else {
                out.push((rel, Some(fs::read_to_string(&path).unwrap())));
            }
        }
    }

    fn payload_source() -> TempDir {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("main.py"), "app = None\n").unwrap();
        fs::write(src.path().join("requirements.txt"), "fastapi\n").unwrap();
        fs::create_dir_all(src.path().join("static/css")).unwrap();
        fs::write(src.path().join("static/css/site.css"), "body {}\n").unwrap();
        fs::create_dir_all(src.path().join(".git")).unwrap();
        fs::write(src.path().join(".git/HEAD"), "ref: main\n").unwrap();
        src
    }

    fn context(src: &Path, install: &Path, dry_run: bool) -> RunContext {
        let mut config = InstallerConfig::default();
        config.paths.install_dir = install.to_path_buf();
        config.payload.exclude = vec![".git".to_string()];
        RunContext::new(alice(), config, src, dry_run)
    }

    #[test]
    fn copy_tree_copies_nested_files_and_skips_excluded() {
        let src = payload_source();
        let dst = TempDir::new().unwrap();
        let payload = PayloadConfig {
            exclude: vec![".git".into()],
        };

        let stats = copy_tree(src.path(), dst.path(), &payload).unwrap();

        assert_eq!(stats.files, 3);
        assert_eq!(stats.dirs, 2);
        assert_eq!(
            fs::read_to_string(dst.path().join("static/css/site.css")).unwrap(),
            "body {}\n"
        );
        assert!(!dst.path().join(".git").exists());
    }

    #[cfg(unix)]
    #[test]
    fn copy_tree_recreates_symlinks() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("config.prod.py"), "DEBUG = False\n").unwrap();
        std::os::unix::fs::symlink("config.prod.py", src.path().join("config.py")).unwrap();
        let dst = TempDir::new().unwrap();

        let stats = copy_tree(src.path(), dst.path(), &PayloadConfig::default()).unwrap();

        assert_eq!(stats.links, 1);
        assert_eq!(
            fs::read_link(dst.path().join("config.py")).unwrap(),
            PathBuf::from("config.prod.py")
        );
    }

    #[test]
    fn reset_dir_empties_existing_directory() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("app");
        fs::create_dir_all(dir.join("old/nested")).unwrap();
        fs::write(dir.join("stale.txt"), "x").unwrap();

        reset_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn reset_dir_creates_missing_directory() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("a/b/app");
        reset_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn reset_dir_replaces_plain_file() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("app");
        fs::write(&dir, "not a dir").unwrap();
        reset_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn install_inside_source_is_refused() {
        let src = TempDir::new().unwrap();
        let err = ensure_disjoint(src.path(), &src.path().join("deploy")).unwrap_err();
        assert!(err.to_string().contains("inside the payload source"));
        assert!(ensure_disjoint(src.path(), src.path()).is_err());
    }

    #[test]
    fn source_inside_install_is_refused() {
        let install = TempDir::new().unwrap();
        let src = install.path().join("checkout");
        fs::create_dir_all(&src).unwrap();
        let err = ensure_disjoint(&src, install.path()).unwrap_err();
        assert!(err.to_string().contains("wiped first"));
    }

    #[test]
    fn sibling_directories_are_fine() {
        let root = TempDir::new().unwrap();
        let src = root.path().join("src");
        fs::create_dir_all(&src).unwrap();
        assert!(ensure_disjoint(&src, &root.path().join("srv/app")).is_ok());
    }

    #[test]
    fn reset_step_assigns_ownership() {
        let src = payload_source();
        let root = TempDir::new().unwrap();
        let install = root.path().join("app");
        let ctx = context(src.path(), &install, false);
        let mut runner = MockRunner::new();

        reset_install_dir(&ctx, &mut runner, &mut MockUI::new()).unwrap();

        assert!(install.is_dir());
        assert_eq!(
            runner.lines(),
            vec![format!("chown -R 1000:1000 {}", install.display())]
        );
    }

    #[test]
    fn copy_step_fails_when_chown_fails() {
        let src = payload_source();
        let root = TempDir::new().unwrap();
        let install = root.path().join("app");
        fs::create_dir_all(&install).unwrap();
        let ctx = context(src.path(), &install, false);
        let mut runner = MockRunner::new();
        runner.fail_when("chown", 1);

        assert!(copy_payload(&ctx, &mut runner, &mut MockUI::new()).is_err());
    }

    #[test]
    fn running_twice_yields_the_same_tree() {
        let src = payload_source();
        let root = TempDir::new().unwrap();
        let install = root.path().join("app");
        let ctx = context(src.path(), &install, false);
        let mut runner = MockRunner::new();
        let mut ui = MockUI::new();

        reset_install_dir(&ctx, &mut runner, &mut ui).unwrap();
        copy_payload(&ctx, &mut runner, &mut ui).unwrap();
        let first = listing(&install);

        // leftovers from a previous deployment must not survive
        fs::write(install.join("leftover.log"), "old").unwrap();

        reset_install_dir(&ctx, &mut runner, &mut ui).unwrap();
        copy_payload(&ctx, &mut runner, &mut ui).unwrap();
        let second = listing(&install);

        assert_eq!(first, second);
        assert!(first.iter().any(|(p, _)| p == "main.py"));
        assert!(!first.iter().any(|(p, _)| p.starts_with(".git")));
    }

    #[test]
    fn dry_run_leaves_filesystem_untouched() {
        let src = payload_source();
        let root = TempDir::new().unwrap();
        let install = root.path().join("app");
        fs::create_dir_all(&install).unwrap();
        fs::write(install.join("keep.txt"), "x").unwrap();
        let ctx = context(src.path(), &install, true);
        let mut runner = DryRunRunner::new(false);
        let mut ui = MockUI::new();

        reset_install_dir(&ctx, &mut runner, &mut ui).unwrap();
        copy_payload(&ctx, &mut runner, &mut ui).unwrap();

        assert!(install.join("keep.txt").exists());
        assert!(!install.join("main.py").exists());
        assert!(ui.has_message("Would remove and recreate"));
        assert!(ui.has_message("Would copy"));
        assert_eq!(runner.planned().len(), 2);
    }
}
