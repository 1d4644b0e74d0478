//! File-type and category classification for commit-message drafting.
//!
//! Three YAML tables live in the `configs` directory (see
//! [`config::resolve_tables_dir`](crate::config::resolve_tables_dir)):
//!
//! | File | Maps |
//! |------|------|
//! | `file-types.yaml` | extension suffix → human-readable file kind |
//! | `categories.yaml` | path substring → category |
//! | `commit-templates.yaml` | commit type / action → wording |
//!
//! All three are loaded together by [`ClassifierTables::load`] and are
//! read-only afterwards.
//!
//! ## Lookup Order
//!
//! "First match wins" lookups walk entries in **declaration order**: the
//! order in which keys appear in the YAML document. Mappings are therefore
//! deserialized into ordered `Vec`s rather than hash maps, so the same
//! tables always classify a path the same way.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const FILE_TYPES_FILE: &str = "file-types.yaml";
pub const CATEGORIES_FILE: &str = "categories.yaml";
pub const COMMIT_TEMPLATES_FILE: &str = "commit-templates.yaml";

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("failed to read classifier table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse classifier table {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A YAML mapping kept in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordered<V>(pub Vec<(String, V)>);

impl<V> Default for Ordered<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> Ordered<V> {
    pub fn iter(&self) -> std::slice::Iter<'_, (String, V)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }
}

struct OrderedVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
    type Value = Ordered<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, V>()? {
            entries.push((key, value));
        }
        Ok(Ordered(entries))
    }

    // `key:` with nothing after it
    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(Ordered::default())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Ordered<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OrderedVisitor(PhantomData))
    }
}

/// One file kind: a set of extension suffixes sharing a description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileTypeItem {
    #[serde(default)]
    pub extensions: Vec<String>,
    pub description: String,
}

/// Contents of `file-types.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct FileTypeTable {
    /// Groups (e.g. `source`, `docs`) of named file kinds.
    #[serde(default)]
    pub file_types: Ordered<Ordered<FileTypeItem>>,
    /// Kind reported for paths no extension matches.
    #[serde(default = "default_unknown_kind")]
    pub unknown: String,
}

fn default_unknown_kind() -> String {
    "other file".to_string()
}

/// One directory category: substrings that mark a path as belonging to it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryPattern {
    #[serde(default)]
    pub patterns: Vec<String>,
    pub description: String,
}

/// Contents of `categories.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryTable {
    #[serde(default)]
    pub directory_patterns: Ordered<CategoryPattern>,
    /// Category for paths no pattern matches.
    #[serde(default = "default_category")]
    pub default: String,
}

fn default_category() -> String {
    "project files".to_string()
}

/// Wording for the commit summary line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SummaryWording {
    /// Verb for a single added file, e.g. "new".
    pub added: String,
    /// Verb for a single modified file, e.g. "optimize".
    pub modified: String,
    /// Verb for a single deleted file, e.g. "clean up".
    pub deleted: String,
    /// Verb for multi-file summaries, e.g. "update".
    pub update: String,
    /// Whole summary when no category stands out.
    pub fallback: String,
    /// Joins multiple categories.
    pub separator: String,
}

impl Default for SummaryWording {
    fn default() -> Self {
        Self {
            added: "new".to_string(),
            modified: "optimize".to_string(),
            deleted: "clean up".to_string(),
            update: "update".to_string(),
            fallback: "update project files".to_string(),
            separator: ", ".to_string(),
        }
    }
}

/// Contents of `commit-templates.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommitTemplates {
    /// Commit type → header prefix (e.g. `feat` → `feat`).
    pub prefixes: HashMap<String, String>,
    /// Commit type → human description.
    pub descriptions: HashMap<String, String>,
    /// Change action (`added`, `modified`, ...) → verb used in the detail body.
    pub actions: HashMap<String, String>,
    pub summary: SummaryWording,
}

/// All classifier tables, loaded once per `gcm` invocation.
#[derive(Debug, Clone)]
pub struct ClassifierTables {
    pub file_types: FileTypeTable,
    pub categories: CategoryTable,
    pub templates: CommitTemplates,
}

fn load_table<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, ClassifyError> {
    let path = dir.join(name);
    let content = fs::read_to_string(&path).map_err(|source| ClassifyError::Io {
        path: path.clone(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ClassifyError::Yaml { path, source })
}

impl ClassifierTables {
    /// Load the three tables from `dir`. Any missing or malformed file is an error.
    pub fn load(dir: &Path) -> Result<Self, ClassifyError> {
        tracing::debug!(dir = %dir.display(), "loading classifier tables");
        Ok(Self {
            file_types: load_table(dir, FILE_TYPES_FILE)?,
            categories: load_table(dir, CATEGORIES_FILE)?,
            templates: load_table(dir, COMMIT_TEMPLATES_FILE)?,
        })
    }

    /// Human-readable kind of the file at `path`: the first declared kind
    /// with an extension that `path` ends with.
    pub fn file_kind(&self, path: &str) -> &str {
        self.file_types
            .file_types
            .iter()
            .flat_map(|(_, kinds)| kinds.iter())
            .find(|(_, item)| item.extensions.iter().any(|ext| path.ends_with(ext.as_str())))
            .map(|(_, item)| item.description.as_str())
            .unwrap_or(&self.file_types.unknown)
    }

    /// Category of `path`: the first declared pattern that occurs in it.
    pub fn category(&self, path: &str) -> &str {
        self.categories
            .directory_patterns
            .iter()
            .find(|(_, pattern)| pattern.patterns.iter().any(|p| path.contains(p.as_str())))
            .map(|(_, pattern)| pattern.description.as_str())
            .unwrap_or(&self.categories.default)
    }

    /// Verb for a change action; unknown actions read as themselves.
    pub fn action<'a>(&'a self, action: &'a str) -> &'a str {
        self.templates
            .actions
            .get(action)
            .map(String::as_str)
            .unwrap_or(action)
    }

    /// Header prefix for a commit type; defaults to the type name.
    pub fn prefix<'a>(&'a self, commit_type: &'a str) -> &'a str {
        self.templates
            .prefixes
            .get(commit_type)
            .map(String::as_str)
            .unwrap_or(commit_type)
    }

    /// Human description of a commit type, if the templates define one.
    pub fn description(&self, commit_type: &str) -> Option<&str> {
        self.templates
            .descriptions
            .get(commit_type)
            .map(String::as_str)
    }

    pub fn summary(&self) -> &SummaryWording {
        &self.templates.summary
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) const FILE_TYPES: &str = r#"
file_types:
  source:
    rust:
      extensions: [".rs"]
      description: "Rust source"
    script:
      extensions: [".sh", ".rs.in"]
      description: "shell script"
  docs:
    markdown:
      extensions: [".md"]
      description: "Markdown document"
"#;

    pub(crate) const CATEGORIES: &str = r#"
directory_patterns:
  tests:
    patterns: ["tests/", "_test"]
    description: "tests"
  source:
    patterns: ["src/"]
    description: "core code"
  docs:
    patterns: ["docs/", "README"]
    description: "documentation"
default: "project files"
"#;

    pub(crate) const TEMPLATES: &str = r#"
prefixes:
  feat: "feat"
  fix: "fix"
descriptions:
  feat: "new feature"
actions:
  added: "add"
  modified: "update"
  deleted: "remove"
  renamed: "rename"
"#;

    /// Write the three sample tables into a temp dir and load them.
    pub(crate) fn sample_tables() -> ClassifierTables {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(FILE_TYPES_FILE), FILE_TYPES).unwrap();
        fs::write(tmp.path().join(CATEGORIES_FILE), CATEGORIES).unwrap();
        fs::write(tmp.path().join(COMMIT_TEMPLATES_FILE), TEMPLATES).unwrap();
        ClassifierTables::load(tmp.path()).unwrap()
    }

    #[test]
    fn file_types_keep_declaration_order() {
        let tables = sample_tables();
        let groups: Vec<&str> = tables.file_types.file_types.keys().collect();
        assert_eq!(groups, vec!["source", "docs"]);
        let kinds: Vec<&str> = tables.file_types.file_types.0[0].1.keys().collect();
        assert_eq!(kinds, vec!["rust", "script"]);
    }

    #[test]
    fn file_kind_matches_extension_suffix() {
        let tables = sample_tables();
        assert_eq!(tables.file_kind("src/main.rs"), "Rust source");
        assert_eq!(tables.file_kind("README.md"), "Markdown document");
        assert_eq!(tables.file_kind("deploy.sh"), "shell script");
    }

    #[test]
    fn file_kind_unmatched_is_other() {
        let tables = sample_tables();
        assert_eq!(tables.file_kind("logo.svg"), "other file");
    }

    #[test]
    fn category_first_declared_pattern_wins() {
        let tables = sample_tables();
        // Matches both "tests/" and "src/"; tests is declared first
        assert_eq!(tables.category("src/tests/parser.rs"), "tests");
        assert_eq!(tables.category("src/lib.rs"), "core code");
        assert_eq!(tables.category("docs/guide.md"), "documentation");
    }

    #[test]
    fn category_unmatched_uses_default() {
        let tables = sample_tables();
        assert_eq!(tables.category("Cargo.toml"), "project files");
    }

    #[test]
    fn actions_fall_back_to_key() {
        let tables = sample_tables();
        assert_eq!(tables.action("added"), "add");
        assert_eq!(tables.action("copied"), "copied");
    }

    #[test]
    fn prefixes_fall_back_to_type() {
        let tables = sample_tables();
        assert_eq!(tables.prefix("feat"), "feat");
        assert_eq!(tables.prefix("cleanup"), "cleanup");
    }

    #[test]
    fn summary_wording_defaults_to_english() {
        let tables = sample_tables();
        assert_eq!(tables.summary(), &SummaryWording::default());
    }

    #[test]
    fn summary_wording_can_be_overridden() {
        let tables: CommitTemplates = serde_yaml::from_str(
            r#"
summary:
  added: "新增"
  separator: "、"
"#,
        )
        .unwrap();
        assert_eq!(tables.summary.added, "新增");
        assert_eq!(tables.summary.separator, "、");
        assert_eq!(tables.summary.update, "update");
    }

    #[test]
    fn missing_table_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(FILE_TYPES_FILE), FILE_TYPES).unwrap();
        fs::write(tmp.path().join(CATEGORIES_FILE), CATEGORIES).unwrap();

        let result = ClassifierTables::load(tmp.path());
        match result {
            Err(ClassifyError::Io { path, .. }) => {
                assert!(path.ends_with(COMMIT_TEMPLATES_FILE));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_table_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(FILE_TYPES_FILE), "file_types: [1, 2").unwrap();
        fs::write(tmp.path().join(CATEGORIES_FILE), CATEGORIES).unwrap();
        fs::write(tmp.path().join(COMMIT_TEMPLATES_FILE), TEMPLATES).unwrap();

        let result = ClassifierTables::load(tmp.path());
        assert!(matches!(result, Err(ClassifyError::Yaml { .. })));
    }

    #[test]
    fn shipped_tables_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs");
        let tables = ClassifierTables::load(&dir).unwrap();
        assert_eq!(tables.file_kind("src/main.rs"), "Rust source file");
        assert_eq!(tables.category("tests/cli.rs"), "tests");
    }
}
