//! The `gcm` command: stage everything, commit, push.
//!
//! ```text
//! ensure_repository ──▶ message given? ──yes──────────────────────┐
//!                            │ no                                 ▼
//!                            └─▶ draft ─▶ confirm ─▶ commit_and_push
//! ```
//!
//! Each step takes a [`GitClient`], so the whole flow runs against
//! `MockGit` in tests. Loading the classifier tables only happens on the
//! drafting path: with an explicit message nothing touches `configs/`.

use crate::classify::{ClassifierTables, ClassifyError};
use crate::git::{GitClient, GitError};
use crate::summarize::{self, ChangeCounts, ChangeRecord, CommitType};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GcmError {
    #[error("current directory is not a git repository")]
    NotARepository,
    #[error(transparent)]
    Git(#[from] GitError),
    #[error("cannot draft a commit message: {0}")]
    Classify(#[from] ClassifyError),
    #[error("commit cancelled")]
    Cancelled,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A generated commit message together with what it was generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub changes: Vec<ChangeRecord>,
    pub counts: ChangeCounts,
    pub commit_type: CommitType,
    /// Wording for `commit_type` from the templates, when defined.
    pub type_description: Option<String>,
    pub message: String,
}

/// Fail with [`GcmError::NotARepository`] outside a working tree.
pub fn ensure_repository(git: &impl GitClient) -> Result<(), GcmError> {
    if git.is_repository()? {
        Ok(())
    } else {
        Err(GcmError::NotARepository)
    }
}

/// Read the working tree status and compose a commit message for it.
pub fn draft(git: &impl GitClient, tables: &ClassifierTables) -> Result<Draft, GcmError> {
    let porcelain = git.status_porcelain()?;
    let changes = summarize::classify(summarize::parse_porcelain(&porcelain), tables);
    let counts = ChangeCounts::tally(&changes);
    let commit_type = summarize::commit_type(&counts);
    let type_description = tables.description(commit_type.as_str()).map(str::to_string);
    let message = summarize::compose_message(&changes, tables);
    tracing::debug!(files = counts.total, %commit_type, "drafted commit message");
    Ok(Draft {
        changes,
        counts,
        commit_type,
        type_description,
        message,
    })
}

/// `git add .`, `git commit -m <message> --no-verify`, `git push`.
///
/// Stops at the first failing step.
pub fn commit_and_push(git: &impl GitClient, message: &str) -> Result<(), GcmError> {
    git.add_all()?;
    git.commit(message)?;
    git.push()?;
    Ok(())
}

/// Run the whole command.
///
/// `load_tables` is only called when no message was given. `confirm` sees
/// the draft and decides whether to use it; declining yields
/// [`GcmError::Cancelled`] and nothing is staged.
pub fn run<G, L, C>(
    git: &G,
    message: Option<String>,
    load_tables: L,
    confirm: C,
) -> Result<String, GcmError>
where
    G: GitClient,
    L: FnOnce() -> Result<ClassifierTables, ClassifyError>,
    C: FnOnce(&Draft) -> std::io::Result<bool>,
{
    ensure_repository(git)?;

    let message = match message.filter(|m| !m.trim().is_empty()) {
        Some(message) => message,
        None => {
            let tables = load_tables()?;
            let draft = draft(git, &tables)?;
            if !confirm(&draft)? {
                return Err(GcmError::Cancelled);
            }
            draft.message
        }
    };

    commit_and_push(git, &message)?;
    Ok(message)
}
