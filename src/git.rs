//! Version-control collaborator.
//!
//! The commit-message summarizer never talks to Git directly. It reads
//! porcelain status text and asks for add/commit/push through the
//! [`GitClient`] trait, so the production [`CommandGit`] (which shells out
//! to the `git` binary) can be swapped for a library binding or, in tests,
//! a scripted fake.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("failed to run git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("git {command} failed ({status})")]
    Failed { command: String, status: String },
}

/// Operations the `gcm` flow needs from version control.
pub trait GitClient {
    /// Whether the working directory is inside a repository.
    fn is_repository(&self) -> Result<bool, GitError>;

    /// Raw `git status --porcelain` output.
    fn status_porcelain(&self) -> Result<String, GitError>;

    /// Stage every change (`git add .`).
    fn add_all(&self) -> Result<(), GitError>;

    /// Commit staged changes with `message`, bypassing local hooks.
    fn commit(&self, message: &str) -> Result<(), GitError>;

    /// Push the current branch to its upstream.
    fn push(&self) -> Result<(), GitError>;
}

/// [`GitClient`] backed by the `git` executable.
///
/// Mutating commands inherit the terminal so the operator sees Git's own
/// output (and can answer credential prompts during `push`).
#[derive(Debug, Clone)]
pub struct CommandGit {
    workdir: PathBuf,
}

impl CommandGit {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        tracing::debug!(args = ?args, workdir = %self.workdir.display(), "git");
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.workdir);
        cmd
    }

    /// Run a mutating command with inherited stdio.
    fn run_inherited(&self, args: &[&str]) -> Result<(), GitError> {
        let command = args.first().copied().unwrap_or_default().to_string();
        let status = self
            .command(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(GitError::Failed {
                command,
                status: status.to_string(),
            })
        }
    }
}

impl GitClient for CommandGit {
    fn is_repository(&self) -> Result<bool, GitError> {
        let status = self
            .command(&["rev-parse", "--git-dir"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| GitError::Spawn {
                command: "rev-parse".to_string(),
                source,
            })?;
        Ok(status.success())
    }

    fn status_porcelain(&self) -> Result<String, GitError> {
        let output = self
            .command(&["status", "--porcelain"])
            .output()
            .map_err(|source| GitError::Spawn {
                command: "status".to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(GitError::Failed {
                command: "status".to_string(),
                status: output.status.to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn add_all(&self) -> Result<(), GitError> {
        self.run_inherited(&["add", "."])
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run_inherited(&["commit", "-m", message, "--no-verify"])
    }

    fn push(&self) -> Result<(), GitError> {
        self.run_inherited(&["push"])
    }
}
