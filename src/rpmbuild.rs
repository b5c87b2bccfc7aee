//! Staging and invocation of the external `rpmbuild` tool.
//!
//! A build stages everything under a temporary `%_topdir` (the five
//! directories rpmbuild expects), copies the package source into
//! `SOURCES/`, writes the rendered SPEC file, runs `rpmbuild -ba`, and
//! locates the produced `.rpm` so the caller can move it to its
//! destination.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::process::Cmd;

/// File names never copied into the staged source tree.
///
/// Compiled python artifacts carry absolute paths from the build host and
/// would poison the packaged venv.
const IGNORED_EXTENSIONS: &[&str] = &["pyc", "pyo", "pyd"];
const IGNORED_DIRS: &[&str] = &["__pycache__"];

/// A failed `rpmbuild` invocation, with everything needed to debug it.
#[derive(Debug, thiserror::Error)]
#[error(
    "rpmbuild failed with exit code {code}.\n\
     command: {command}\n\
     stdout:\n{stdout}\n\
     stderr:\n{stderr}"
)]
pub struct RpmBuildError {
    pub code: i32,
    pub command: String,
    pub stdout: String,
    pub stderr: String,
}

/// Verify the rpmbuild executable is available before staging anything.
pub fn preflight() -> Result<PathBuf> {
    which::which("rpmbuild")
        .context("rpmbuild not found in PATH. Install the rpm build tools to generate packages.")
}

/// A temporary `%_topdir` for one build.
///
/// The directory and everything staged into it are removed when the value
/// is dropped, so the produced RPM must be moved out first.
pub struct BuildRoot {
    dir: TempDir,
}

impl BuildRoot {
    /// Create the topdir with the directory layout rpmbuild expects.
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("rpmsmith")
            .tempdir()
            .context("Failed to create a temporary rpmbuild topdir")?;

        for sub in ["SOURCES", "SPECS", "BUILD", "RPMS", "SRPMS"] {
            fs::create_dir(dir.path().join(sub))?;
        }

        Ok(Self { dir })
    }

    /// Absolute path of the topdir.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write the SPEC file contents into the staging area.
    ///
    /// Returns the absolute path to the written file.
    pub fn write_spec(&self, content: &str) -> Result<PathBuf> {
        let path = self.path().join("SOURCES").join("package.spec");
        fs::write(&path, content)
            .with_context(|| format!("Failed to write SPEC file {}", path.display()))?;
        Ok(path)
    }

    /// Copy the source directory into `SOURCES/`, skipping ignored files.
    ///
    /// Returns the absolute path to the copy.
    pub fn copy_source(&self, source: &Path) -> Result<PathBuf> {
        let name = source
            .file_name()
            .with_context(|| format!("Source path {} has no directory name", source.display()))?;
        let dest_root = self.path().join("SOURCES").join(name);

        for entry in WalkDir::new(source)
            .into_iter()
            .filter_entry(|entry| !is_ignored(entry.path()))
        {
            let entry = entry.with_context(|| {
                format!("Failed to walk source directory {}", source.display())
            })?;
            let relative = entry.path().strip_prefix(source)?;
            let target = dest_root.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target).with_context(|| {
                    format!("Failed to copy {} into SOURCES", entry.path().display())
                })?;
            }
        }

        Ok(dest_root)
    }

    /// Locate the RPM produced by a successful build.
    pub fn find_rpm(&self) -> Result<PathBuf> {
        let rpms_dir = self.path().join("RPMS");
        let mut rpms: Vec<PathBuf> = WalkDir::new(&rpms_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "rpm")
            })
            .map(|entry| entry.into_path())
            .collect();

        match rpms.pop() {
            Some(rpm) => Ok(rpm),
            None => bail!("rpmbuild completed but produced no RPM under {}", rpms_dir.display()),
        }
    }
}

fn is_ignored(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if IGNORED_DIRS.contains(&name) {
        return true;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IGNORED_EXTENSIONS.contains(&ext))
}

/// Run `rpmbuild -ba` against a staged SPEC file.
///
/// Quiet mode captures output and surfaces failures as [`RpmBuildError`];
/// verbose mode streams rpmbuild's output directly to the terminal.
/// Returns the path of the produced RPM inside the build root.
pub fn build(root: &BuildRoot, specfile: &Path, verbose: bool) -> Result<PathBuf> {
    let cmd = Cmd::new("rpmbuild")
        .arg("-ba")
        .arg(format!("--define=_topdir {}", root.path().display()))
        .arg_path(specfile);

    if verbose {
        cmd.error_msg("rpmbuild failed").run_interactive()?;
    } else {
        let command = cmd.command_line();
        let result = cmd.allow_fail().run()?;
        if !result.success() {
            return Err(RpmBuildError {
                code: result.code(),
                command,
                stdout: result.stdout,
                stderr: result.stderr,
            }
            .into());
        }
    }

    root.find_rpm()
}

/// Move a built RPM into the destination directory.
///
/// Returns the final artifact path. Falls back to copy-and-remove when the
/// destination is on another filesystem.
pub fn move_artifact(rpm: &Path, destination: &Path) -> Result<PathBuf> {
    fs::create_dir_all(destination).with_context(|| {
        format!("Failed to create destination {}", destination.display())
    })?;

    let file_name = rpm
        .file_name()
        .with_context(|| format!("RPM path {} has no file name", rpm.display()))?;
    let target = destination.join(file_name);

    if fs::rename(rpm, &target).is_err() {
        fs::copy(rpm, &target)
            .with_context(|| format!("Failed to move RPM to {}", target.display()))?;
        fs::remove_file(rpm)?;
    }

    Ok(target)
}
