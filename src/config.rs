//! Application configuration.
//!
//! A single optional `config.yaml` describes where the tool is installed and
//! which platform it reports. The file is looked up in two places, first hit
//! wins:
//!
//! ```text
//! ~/.cyber-zen/config.yaml     # per-user install directory
//! ./config.yaml                # current working directory
//! ```
//!
//! ## Configuration Options
//!
//! ```yaml
//! # All options are optional - defaults shown below
//! install_dir: ~/.cyber-zen    # where the tool keeps its files
//! platform: linux              # defaults to the compile target OS
//! architecture: x86_64         # defaults to the compile target arch
//! ```
//!
//! A missing file is not an error: every field falls back to its default.
//! Unknown keys are rejected to catch typos early.
//!
//! The loaded [`AppConfig`] is built once in `main` and passed by reference
//! to the commands that need it. Nothing here is global.
//!
//! The same home directory also hosts the classifier tables used by `gcm`;
//! see [`tables_dir_candidates`].

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-user dotfile directory under `$HOME`.
pub const DOTFILE_DIR: &str = ".cyber-zen";

/// File name of the application config.
pub const CONFIG_FILE: &str = "config.yaml";

/// Directory name holding the classifier YAML tables.
pub const TABLES_DIR: &str = "configs";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Application configuration loaded from `config.yaml`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Install directory reported by `status`.
    pub install_dir: PathBuf,
    /// Operating system name, e.g. `linux`, `macos`.
    pub platform: String,
    /// CPU architecture, e.g. `x86_64`, `aarch64`.
    pub architecture: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_home(dirs::home_dir().as_deref())
    }
}

impl AppConfig {
    /// Defaults relative to the given home directory.
    ///
    /// Without a home directory the install dir falls back to the dotfile
    /// name relative to the working directory.
    pub fn with_home(home: Option<&Path>) -> Self {
        let install_dir = match home {
            Some(home) => home.join(DOTFILE_DIR),
            None => PathBuf::from(DOTFILE_DIR),
        };
        Self {
            install_dir,
            platform: std::env::consts::OS.to_string(),
            architecture: std::env::consts::ARCH.to_string(),
        }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn architecture(&self) -> &str {
        &self.architecture
    }
}

/// Candidate locations of `config.yaml`, in lookup order.
pub fn config_candidates(home: Option<&Path>, cwd: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(2);
    if let Some(home) = home {
        candidates.push(home.join(DOTFILE_DIR).join(CONFIG_FILE));
    }
    candidates.push(cwd.join(CONFIG_FILE));
    candidates
}

/// Parse a config file, filling unspecified fields from `defaults`.
fn parse_config(path: &Path, defaults: AppConfig) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // An empty document deserializes to unit; treat it as "all defaults".
    if content.trim().is_empty() {
        return Ok(defaults);
    }
    let partial: PartialConfig =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(partial.apply(defaults))
}

/// Sparse view of the config file. Keeps `AppConfig`'s home-dependent
/// defaults out of serde so tests can inject a fake home.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PartialConfig {
    install_dir: Option<PathBuf>,
    platform: Option<String>,
    architecture: Option<String>,
}

impl PartialConfig {
    fn apply(self, defaults: AppConfig) -> AppConfig {
        AppConfig {
            install_dir: self.install_dir.unwrap_or(defaults.install_dir),
            platform: self.platform.unwrap_or(defaults.platform),
            architecture: self.architecture.unwrap_or(defaults.architecture),
        }
    }
}

/// Load configuration from the first existing candidate file.
///
/// Returns defaults when no candidate exists.
pub fn load_config_from(home: Option<&Path>, cwd: &Path) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::with_home(home);
    match config_candidates(home, cwd).into_iter().find(|p| p.is_file()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            parse_config(&path, defaults)
        }
        None => Ok(defaults),
    }
}

/// Load configuration using the real home and working directories.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
        path: PathBuf::from("."),
        source,
    })?;
    load_config_from(dirs::home_dir().as_deref(), &cwd)
}

/// Candidate `configs` directories for the classifier tables, in lookup order:
/// the working directory, the executable's directory, then the home dotfile dir.
pub fn tables_dir_candidates(
    cwd: &Path,
    exe_dir: Option<&Path>,
    home: Option<&Path>,
) -> Vec<PathBuf> {
    let mut candidates = vec![cwd.join(TABLES_DIR)];
    if let Some(exe_dir) = exe_dir {
        candidates.push(exe_dir.join(TABLES_DIR));
    }
    if let Some(home) = home {
        candidates.push(home.join(DOTFILE_DIR).join(TABLES_DIR));
    }
    candidates
}

/// Pick the first existing tables directory.
///
/// When none exists the last candidate is returned anyway, so the caller's
/// load fails with a path the operator can act on.
pub fn resolve_tables_dir(cwd: &Path, exe_dir: Option<&Path>, home: Option<&Path>) -> PathBuf {
    let candidates = tables_dir_candidates(cwd, exe_dir, home);
    candidates
        .iter()
        .find(|p| p.is_dir())
        .or(candidates.last())
        .cloned()
        .unwrap_or_else(|| PathBuf::from(TABLES_DIR))
}

/// Resolve the tables directory from the live process environment.
pub fn locate_tables_dir() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    resolve_tables_dir(&cwd, exe_dir.as_deref(), dirs::home_dir().as_deref())
}
