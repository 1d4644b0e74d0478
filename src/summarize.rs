//! Commit-message drafting from `git status --porcelain` output.
//!
//! The pipeline is three pure steps, each unit-testable without Git:
//!
//! ```text
//! porcelain text ──parse_porcelain──▶ (status, path)
//!                ──classify────────▶ ChangeRecord { path, status, category, file_kind }
//!                ──compose_message─▶ "type: summary\n\n- action path\n..."
//! ```
//!
//! Wording comes from the [`ClassifierTables`]; the commit type comes from a
//! fixed decision table over added/modified/deleted counts
//! ([`commit_type`]).

use crate::classify::ClassifierTables;
use std::fmt;

/// Change status from the porcelain status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Unmerged,
    /// Any other code, kept literally (e.g. `?` for untracked files).
    Other(char),
}

impl ChangeStatus {
    pub fn from_code(code: char) -> Self {
        match code {
            'A' => Self::Added,
            'M' => Self::Modified,
            'D' => Self::Deleted,
            'R' => Self::Renamed,
            'C' => Self::Copied,
            'U' => Self::Unmerged,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::Added => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::Renamed => 'R',
            Self::Copied => 'C',
            Self::Unmerged => 'U',
            Self::Other(c) => c,
        }
    }

    /// Key into the `actions` template table.
    pub fn action_key(self) -> Option<&'static str> {
        match self {
            Self::Added => Some("added"),
            Self::Modified => Some("modified"),
            Self::Deleted => Some("deleted"),
            Self::Renamed => Some("renamed"),
            Self::Copied => Some("copied"),
            Self::Unmerged => Some("unmerged"),
            Self::Other(_) => None,
        }
    }
}

/// One changed path, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub path: String,
    pub status: ChangeStatus,
    pub category: String,
    pub file_kind: String,
}

/// Per-status tallies used by the commit-type decision table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeCounts {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub total: usize,
}

impl ChangeCounts {
    pub fn tally(changes: &[ChangeRecord]) -> Self {
        changes.iter().fold(Self::default(), |mut counts, change| {
            match change.status {
                ChangeStatus::Added => counts.added += 1,
                ChangeStatus::Modified => counts.modified += 1,
                ChangeStatus::Deleted => counts.deleted += 1,
                _ => {}
            }
            counts.total += 1;
            counts
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitType {
    Feat,
    Fix,
    Cleanup,
    Refactor,
}

impl CommitType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Cleanup => "cleanup",
            Self::Refactor => "refactor",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commit type decision table.
///
/// | added | modified | deleted | type |
/// |---|---|---|---|
/// | >0 | 0 | 0 | `feat` |
/// | 0 | >0 | 0 | `fix` |
/// | 0 | 0 | >0 | `cleanup` |
/// | >0 | >0 | 0 | `refactor` |
/// | anything else | | | `feat` |
pub fn commit_type(counts: &ChangeCounts) -> CommitType {
    match (counts.added > 0, counts.modified > 0, counts.deleted > 0) {
        (true, false, false) => CommitType::Feat,
        (false, true, false) => CommitType::Fix,
        (false, false, true) => CommitType::Cleanup,
        (true, true, false) => CommitType::Refactor,
        _ => CommitType::Feat,
    }
}

/// Parse porcelain v1 output into `(status, path)` pairs.
///
/// Each line is `XY PATH`. The index column `X` is the status; an unstaged
/// change has a blank `X`, in which case the worktree column `Y` is used.
/// Lines shorter than three characters are ignored.
pub fn parse_porcelain(output: &str) -> Vec<(ChangeStatus, String)> {
    output
        .lines()
        .filter(|line| line.len() >= 3)
        .filter_map(|line| {
            let mut columns = line.chars();
            let index = columns.next()?;
            let worktree = columns.next()?;
            let code = if index == ' ' { worktree } else { index };
            let path = line.get(3..)?.trim();
            if path.is_empty() {
                return None;
            }
            Some((ChangeStatus::from_code(code), path.to_string()))
        })
        .collect()
}

/// Attach category and file kind to each parsed entry.
pub fn classify(
    entries: Vec<(ChangeStatus, String)>,
    tables: &ClassifierTables,
) -> Vec<ChangeRecord> {
    entries
        .into_iter()
        .map(|(status, path)| ChangeRecord {
            category: tables.category(&path).to_string(),
            file_kind: tables.file_kind(&path).to_string(),
            path,
            status,
        })
        .collect()
}

/// Categories with their file counts, in order of first appearance.
fn category_counts(changes: &[ChangeRecord]) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for change in changes {
        match counts.iter_mut().find(|(c, _)| *c == change.category) {
            Some((_, n)) => *n += 1,
            None => counts.push((&change.category, 1)),
        }
    }
    counts
}

/// One-line summary of what changed.
pub fn summary_line(changes: &[ChangeRecord], tables: &ClassifierTables) -> String {
    let wording = tables.summary();

    if let [change] = changes {
        let verb = match change.status {
            ChangeStatus::Added => Some(&wording.added),
            ChangeStatus::Modified => Some(&wording.modified),
            ChangeStatus::Deleted => Some(&wording.deleted),
            _ => None,
        };
        if let Some(verb) = verb {
            return format!("{} {}", verb, change.category);
        }
    }

    let categories = category_counts(changes);
    if let [(only, _)] = categories.as_slice() {
        return format!("{} {}", wording.update, only);
    }

    let main: Vec<&str> = categories
        .iter()
        .filter(|(_, n)| *n > 1)
        .map(|(c, _)| *c)
        .collect();
    if main.is_empty() {
        wording.fallback.clone()
    } else {
        format!("{} {}", wording.update, main.join(&wording.separator))
    }
}

/// `- {action} {path}` per change.
pub fn detail_body(changes: &[ChangeRecord], tables: &ClassifierTables) -> String {
    changes
        .iter()
        .map(|change| {
            let literal;
            let action = match change.status.action_key() {
                Some(key) => tables.action(key),
                None => {
                    literal = change.status.code().to_string();
                    literal.as_str()
                }
            };
            format!("- {} {}", action, change.path)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full commit message: header, blank line, detail body.
///
/// With no changes at all the message is just `update`.
pub fn compose_message(changes: &[ChangeRecord], tables: &ClassifierTables) -> String {
    if changes.is_empty() {
        return "update".to_string();
    }
    let kind = commit_type(&ChangeCounts::tally(changes));
    format!(
        "{}: {}\n\n{}",
        tables.prefix(kind.as_str()),
        summary_line(changes, tables),
        detail_body(changes, tables)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::tests::sample_tables;

    fn record(status: ChangeStatus, path: &str, category: &str) -> ChangeRecord {
        ChangeRecord {
            path: path.to_string(),
            status,
            category: category.to_string(),
            file_kind: String::new(),
        }
    }

    fn counts(added: usize, modified: usize, deleted: usize) -> ChangeCounts {
        ChangeCounts {
            added,
            modified,
            deleted,
            total: added + modified + deleted,
        }
    }

    // =========================================================================
    // Commit type decision table
    // =========================================================================

    #[test]
    fn all_added_is_feat() {
        assert_eq!(commit_type(&counts(2, 0, 0)), CommitType::Feat);
    }

    #[test]
    fn all_modified_is_fix() {
        assert_eq!(commit_type(&counts(0, 3, 0)), CommitType::Fix);
    }

    #[test]
    fn all_deleted_is_cleanup() {
        assert_eq!(commit_type(&counts(0, 0, 1)), CommitType::Cleanup);
    }

    #[test]
    fn added_and_modified_is_refactor() {
        assert_eq!(commit_type(&counts(1, 1, 0)), CommitType::Refactor);
    }

    #[test]
    fn other_mixes_fall_back_to_feat() {
        assert_eq!(commit_type(&counts(1, 0, 1)), CommitType::Feat);
        assert_eq!(commit_type(&counts(1, 1, 1)), CommitType::Feat);
        assert_eq!(commit_type(&counts(0, 0, 0)), CommitType::Feat);
    }

    // =========================================================================
    // Porcelain parsing
    // =========================================================================

    #[test]
    fn parse_recognized_codes() {
        let out = "A  src/new.rs\nM  src/lib.rs\nD  old.txt\nR  a.rs -> b.rs\nC  c.rs\nUU conflict.rs\n";
        let parsed = parse_porcelain(out);
        let statuses: Vec<ChangeStatus> = parsed.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            statuses,
            vec![
                ChangeStatus::Added,
                ChangeStatus::Modified,
                ChangeStatus::Deleted,
                ChangeStatus::Renamed,
                ChangeStatus::Copied,
                ChangeStatus::Unmerged,
            ]
        );
        assert_eq!(parsed[0].1, "src/new.rs");
        assert_eq!(parsed[3].1, "a.rs -> b.rs");
    }

    #[test]
    fn parse_unstaged_uses_worktree_column() {
        let parsed = parse_porcelain(" M src/lib.rs\n D gone.rs\n");
        assert_eq!(
            parsed,
            vec![
                (ChangeStatus::Modified, "src/lib.rs".to_string()),
                (ChangeStatus::Deleted, "gone.rs".to_string()),
            ]
        );
    }

    #[test]
    fn parse_passes_unknown_codes_through() {
        let parsed = parse_porcelain("?? scratch.txt\n!! target/\n");
        assert_eq!(parsed[0].0, ChangeStatus::Other('?'));
        assert_eq!(parsed[1].0, ChangeStatus::Other('!'));
        assert_eq!(parsed[0].1, "scratch.txt");
    }

    #[test]
    fn parse_skips_short_and_empty_lines() {
        let parsed = parse_porcelain("\nM\nA  ok.rs\n\n");
        assert_eq!(parsed, vec![(ChangeStatus::Added, "ok.rs".to_string())]);
    }

    #[test]
    fn classify_uses_tables() {
        let tables = sample_tables();
        let records = classify(
            vec![(ChangeStatus::Added, "src/parser.rs".to_string())],
            &tables,
        );
        assert_eq!(records[0].category, "core code");
        assert_eq!(records[0].file_kind, "Rust source");
    }

    // =========================================================================
    // Summary line
    // =========================================================================

    #[test]
    fn single_file_uses_status_verb() {
        let tables = sample_tables();
        let added = [record(ChangeStatus::Added, "src/a.rs", "core code")];
        let modified = [record(ChangeStatus::Modified, "src/a.rs", "core code")];
        let deleted = [record(ChangeStatus::Deleted, "src/a.rs", "core code")];
        assert_eq!(summary_line(&added, &tables), "new core code");
        assert_eq!(summary_line(&modified, &tables), "optimize core code");
        assert_eq!(summary_line(&deleted, &tables), "clean up core code");
    }

    #[test]
    fn single_renamed_file_reads_as_update() {
        let tables = sample_tables();
        let renamed = [record(ChangeStatus::Renamed, "a.rs -> b.rs", "core code")];
        assert_eq!(summary_line(&renamed, &tables), "update core code");
    }

    #[test]
    fn shared_category_reads_as_update() {
        let tables = sample_tables();
        let changes = [
            record(ChangeStatus::Added, "docs/a.md", "documentation"),
            record(ChangeStatus::Modified, "docs/b.md", "documentation"),
        ];
        assert_eq!(summary_line(&changes, &tables), "update documentation");
    }

    #[test]
    fn mixed_categories_join_repeated_ones_in_order() {
        let tables = sample_tables();
        let changes = [
            record(ChangeStatus::Modified, "tests/a.rs", "tests"),
            record(ChangeStatus::Modified, "src/a.rs", "core code"),
            record(ChangeStatus::Modified, "Cargo.toml", "project files"),
            record(ChangeStatus::Modified, "src/b.rs", "core code"),
            record(ChangeStatus::Modified, "tests/b.rs", "tests"),
        ];
        assert_eq!(summary_line(&changes, &tables), "update tests, core code");
    }

    #[test]
    fn mixed_singletons_use_fallback() {
        let tables = sample_tables();
        let changes = [
            record(ChangeStatus::Modified, "tests/a.rs", "tests"),
            record(ChangeStatus::Modified, "src/a.rs", "core code"),
        ];
        assert_eq!(summary_line(&changes, &tables), "update project files");
    }

    // =========================================================================
    // Full message
    // =========================================================================

    #[test]
    fn detail_lines_use_action_table() {
        let tables = sample_tables();
        let changes = [
            record(ChangeStatus::Added, "src/a.rs", "core code"),
            record(ChangeStatus::Deleted, "old.txt", "project files"),
            record(ChangeStatus::Copied, "c.rs", "project files"),
            record(ChangeStatus::Other('?'), "notes.md", "project files"),
        ];
        assert_eq!(
            detail_body(&changes, &tables),
            "- add src/a.rs\n- remove old.txt\n- copied c.rs\n- ? notes.md"
        );
    }

    #[test]
    fn compose_full_message() {
        let tables = sample_tables();
        let records = classify(parse_porcelain("A  src/a.rs\nA  src/b.rs\n"), &tables);
        assert_eq!(
            compose_message(&records, &tables),
            "feat: update core code\n\n- add src/a.rs\n- add src/b.rs"
        );
    }

    #[test]
    fn compose_uses_type_name_without_prefix() {
        let tables = sample_tables();
        let records = classify(parse_porcelain("D  docs/old.md\n"), &tables);
        assert_eq!(
            compose_message(&records, &tables),
            "cleanup: clean up documentation\n\n- remove docs/old.md"
        );
    }

    #[test]
    fn compose_without_changes_is_update() {
        let tables = sample_tables();
        assert_eq!(compose_message(&[], &tables), "update");
    }

    #[test]
    fn tally_counts_only_add_modify_delete() {
        let changes = [
            record(ChangeStatus::Added, "a", "x"),
            record(ChangeStatus::Modified, "b", "x"),
            record(ChangeStatus::Renamed, "c", "x"),
        ];
        let counts = ChangeCounts::tally(&changes);
        assert_eq!((counts.added, counts.modified, counts.deleted), (1, 1, 0));
        assert_eq!(counts.total, 3);
    }
}
