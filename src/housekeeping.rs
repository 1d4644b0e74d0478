//! The `status` and `uninstall` commands.

use crate::config::AppConfig;
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Where packaged installs put the binary.
pub const INSTALL_PATH: &str = "/usr/local/bin/cyber-zen";

/// Local build output removed on uninstall.
pub const BUILD_DIR: &str = "build";

#[derive(Error, Debug)]
pub enum HousekeepingError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to remove {path} ({status})")]
    RemoveFailed { path: PathBuf, status: String },
}

/// Everything `status` reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub install_dir: PathBuf,
    pub version: String,
    pub platform: String,
    pub architecture: String,
    pub git_available: bool,
    pub bash_available: bool,
}

/// First executable named `program` in the `PATH` entries.
pub fn find_in_path(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let path_var = path_var?;
    env::split_paths(path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable::is_executable(candidate))
}

pub fn status_report_with_path(
    config: &AppConfig,
    version: &str,
    path_var: Option<&OsStr>,
) -> StatusReport {
    StatusReport {
        install_dir: config.install_dir().to_path_buf(),
        version: version.to_string(),
        platform: config.platform().to_string(),
        architecture: config.architecture().to_string(),
        git_available: find_in_path("git", path_var).is_some(),
        bash_available: find_in_path("bash", path_var).is_some(),
    }
}

/// Build the status report against the live `PATH`.
pub fn status_report(config: &AppConfig, version: &str) -> StatusReport {
    let path_var = env::var_os("PATH");
    status_report_with_path(config, version, path_var.as_deref())
}

/// Privileged file removal.
pub trait Remover {
    fn remove(&self, path: &Path) -> Result<(), HousekeepingError>;
}

/// [`Remover`] that shells out to `sudo rm -f`, inheriting the terminal so
/// the password prompt reaches the operator.
pub struct SudoRemover;

impl Remover for SudoRemover {
    fn remove(&self, path: &Path) -> Result<(), HousekeepingError> {
        tracing::debug!(path = %path.display(), "sudo rm -f");
        let status = Command::new("sudo")
            .arg("rm")
            .arg("-f")
            .arg(path)
            .status()
            .map_err(|source| HousekeepingError::Spawn {
                command: "sudo".to_string(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(HousekeepingError::RemoveFailed {
                path: path.to_path_buf(),
                status: status.to_string(),
            })
        }
    }
}

/// What `uninstall` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    NotInstalled { path: PathBuf },
    Removed {
        path: PathBuf,
        /// Whether a local build directory was also removed.
        build_dir_removed: bool,
    },
}

/// Remove `install_path` through `remover`, then `build_dir` if present.
///
/// A missing install is not an error. Failing to clean the build directory
/// only logs a warning.
pub fn uninstall_with(
    remover: &impl Remover,
    install_path: &Path,
    build_dir: &Path,
) -> Result<UninstallOutcome, HousekeepingError> {
    if !install_path.exists() {
        return Ok(UninstallOutcome::NotInstalled {
            path: install_path.to_path_buf(),
        });
    }

    remover.remove(install_path)?;

    let build_dir_removed = if build_dir.is_dir() {
        match std::fs::remove_dir_all(build_dir) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    path = %build_dir.display(),
                    error = %e,
                    "could not clean build directory"
                );
                false
            }
        }
    } else {
        false
    };

    Ok(UninstallOutcome::Removed {
        path: install_path.to_path_buf(),
        build_dir_removed,
    })
}

pub fn uninstall() -> Result<UninstallOutcome, HousekeepingError> {
    uninstall_with(&SudoRemover, Path::new(INSTALL_PATH), Path::new(BUILD_DIR))
}
