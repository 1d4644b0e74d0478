//! CLI output formatting for every command.
//!
//! Each `format_*` function is pure and returns the lines to print, so the
//! exact text is unit tested. The `print_*` wrappers write those lines to
//! stdout. Diagnostics go through `tracing` on stderr and never pass
//! through here.
//!
//! # Output Format
//!
//! ## gcm
//!
//! ```text
//! Changes
//!     A src/lib.rs (core code, Rust source file)
//!     M README.md (documentation, Markdown document)
//! 1 added, 1 modified, 0 deleted (2 total)
//! Type: refactor (restructure existing code)
//!
//! Commit message
//!     refactor: update project files
//!
//!     - add src/lib.rs
//!     - update README.md
//! ```
//!
//! ## compress
//!
//! ```text
//! Compressing photos → compressed_20240102_030405 (rate 0.5)
//!     a.png: 400x300 → 200x150, 12.0 KB → 3.1 KB
//!     sub/c.jpg: 800x600 → 400x300 q85, 80.2 KB → 21.7 KB
//!     old.bmp: copied (Bmp is kept as-is)
//!     bad.jpg: failed (decode error)
//! 2 compressed, 1 copied, 1 failed, 3 skipped
//! ```
//!
//! ## server
//!
//! ```text
//! Serving /home/me/site
//!     http://localhost:3000
//! [14:03:22] 🔍 GET /index.html
//! ```

use crate::compress::{CompressEvent, CompressSummary};
use crate::gcm::Draft;
use crate::housekeeping::{StatusReport, UninstallOutcome};
use crate::server::ServerConfig;
use std::path::Path;

/// Indent for context lines under a header.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte size: `512 B`, `12.0 KB`, `3.4 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

fn check_mark(ok: bool) -> &'static str {
    if ok { "✓" } else { "✗" }
}

/// Forward-slash display of a relative path, stable across platforms.
fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

// ============================================================================
// gcm
// ============================================================================

/// Format the generated draft shown before the confirmation prompt.
pub fn format_draft(draft: &Draft) -> Vec<String> {
    let mut lines = vec!["Changes".to_string()];
    for change in &draft.changes {
        lines.push(format!(
            "{}{} {} ({}, {})",
            indent(1),
            change.status.code(),
            change.path,
            change.category,
            change.file_kind
        ));
    }
    let counts = &draft.counts;
    lines.push(format!(
        "{} added, {} modified, {} deleted ({} total)",
        counts.added, counts.modified, counts.deleted, counts.total
    ));
    lines.push(match &draft.type_description {
        Some(description) => format!("Type: {} ({})", draft.commit_type, description),
        None => format!("Type: {}", draft.commit_type),
    });
    lines.push(String::new());
    lines.push("Commit message".to_string());
    for line in draft.message.lines() {
        if line.is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{}{}", indent(1), line));
        }
    }
    lines
}

pub fn print_draft(draft: &Draft) {
    for line in format_draft(draft) {
        println!("{line}");
    }
}

/// Confirmation after add, commit and push all succeeded.
pub fn format_committed(message: &str) -> Vec<String> {
    let subject = message.lines().next().unwrap_or_default();
    vec![format!("Committed and pushed: {subject}")]
}

pub fn print_committed(message: &str) {
    for line in format_committed(message) {
        println!("{line}");
    }
}

// ============================================================================
// compress
// ============================================================================

/// Format one compress event. A `Started` event is the run header; every
/// other event is an indented per-file line.
pub fn format_compress_event(event: &CompressEvent) -> Vec<String> {
    match event {
        CompressEvent::Started {
            source,
            destination,
            rate,
        } => vec![format!(
            "Compressing {} → {} (rate {})",
            source.display(),
            destination.display(),
            rate
        )],
        CompressEvent::Compressed {
            path,
            original,
            resized,
            quality,
            bytes_in,
            bytes_out,
        } => {
            let quality = quality.map(|q| format!(" q{}", q.value())).unwrap_or_default();
            vec![format!(
                "{}{}: {} → {}{}, {} → {}",
                indent(1),
                display_path(path),
                original,
                resized,
                quality,
                format_bytes(*bytes_in),
                format_bytes(*bytes_out)
            )]
        }
        CompressEvent::Copied { path, reason, .. } => {
            vec![format!("{}{}: copied ({})", indent(1), display_path(path), reason)]
        }
        CompressEvent::Failed { path, error } => {
            vec![format!("{}{}: failed ({})", indent(1), display_path(path), error)]
        }
    }
}

/// Format the closing counts of a compress run.
pub fn format_compress_summary(summary: &CompressSummary) -> Vec<String> {
    let mut line = format!(
        "{} compressed, {} copied, {} failed",
        summary.compressed, summary.copied, summary.failed
    );
    if summary.skipped > 0 {
        line.push_str(&format!(", {} skipped", summary.skipped));
    }
    vec![line, format!("Output: {}", summary.destination.display())]
}

pub fn print_compress_summary(summary: &CompressSummary) {
    for line in format_compress_summary(summary) {
        println!("{line}");
    }
}

// ============================================================================
// server
// ============================================================================

pub fn format_server_banner(config: &ServerConfig) -> Vec<String> {
    vec![
        format!("Serving {}", config.root.display()),
        format!("{}{}", indent(1), config.url()),
        format!("{}Press Ctrl+C to stop", indent(1)),
    ]
}

pub fn print_server_banner(config: &ServerConfig) {
    for line in format_server_banner(config) {
        println!("{line}");
    }
}

/// One access-log line: `[HH:MM:SS] <label> <path>`.
pub fn format_request_line(time: &str, label: &str, path: &str) -> String {
    format!("[{time}] {label} {path}")
}

pub fn print_request_line(time: &str, label: &str, path: &str) {
    println!("{}", format_request_line(time, label, path));
}

// ============================================================================
// status / uninstall
// ============================================================================

pub fn format_status(report: &StatusReport) -> Vec<String> {
    vec![
        "cyber-zen status".to_string(),
        format!("{}Install dir: {}", indent(1), report.install_dir.display()),
        format!("{}Version: {}", indent(1), report.version),
        format!(
            "{}Platform: {}/{}",
            indent(1),
            report.platform,
            report.architecture
        ),
        format!("{}git: {}", indent(1), check_mark(report.git_available)),
        format!("{}bash: {}", indent(1), check_mark(report.bash_available)),
    ]
}

pub fn print_status(report: &StatusReport) {
    for line in format_status(report) {
        println!("{line}");
    }
}

pub fn format_uninstall(outcome: &UninstallOutcome) -> Vec<String> {
    match outcome {
        UninstallOutcome::NotInstalled { path } => {
            vec![format!("cyber-zen is not installed at {}", path.display())]
        }
        UninstallOutcome::Removed {
            path,
            build_dir_removed,
        } => {
            let mut lines = vec![format!("Removed {}", path.display())];
            if *build_dir_removed {
                lines.push(format!("{}Cleaned local build directory", indent(1)));
            }
            lines.push("cyber-zen uninstalled".to_string());
            lines
        }
    }
}

pub fn print_uninstall(outcome: &UninstallOutcome) {
    for line in format_uninstall(outcome) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{CopyReason, Dimensions, Quality, Rate};
    use crate::summarize::{ChangeCounts, ChangeRecord, ChangeStatus, CommitType};
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn bytes_below_a_kilobyte() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
    }

    #[test]
    fn bytes_in_kilobytes_and_megabytes() {
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    // =========================================================================
    // gcm formatting tests
    // =========================================================================

    fn record(path: &str, status: ChangeStatus, category: &str, kind: &str) -> ChangeRecord {
        ChangeRecord {
            path: path.to_string(),
            status,
            category: category.to_string(),
            file_kind: kind.to_string(),
        }
    }

    #[test]
    fn draft_lists_changes_counts_and_message() {
        let draft = Draft {
            changes: vec![
                record("src/lib.rs", ChangeStatus::Added, "core code", "Rust source file"),
                record("README.md", ChangeStatus::Modified, "documentation", "Markdown"),
            ],
            counts: ChangeCounts {
                added: 1,
                modified: 1,
                deleted: 0,
                total: 2,
            },
            commit_type: CommitType::Refactor,
            type_description: Some("restructure existing code".to_string()),
            message: "feat: add core code\n\n- add src/lib.rs".to_string(),
        };
        let lines = format_draft(&draft);
        assert_eq!(
            lines,
            vec![
                "Changes",
                "    A src/lib.rs (core code, Rust source file)",
                "    M README.md (documentation, Markdown)",
                "1 added, 1 modified, 0 deleted (2 total)",
                "Type: refactor (restructure existing code)",
                "",
                "Commit message",
                "    feat: add core code",
                "",
                "    - add src/lib.rs",
            ]
        );
    }

    #[test]
    fn draft_type_without_description() {
        let draft = Draft {
            changes: vec![record("old.rs", ChangeStatus::Deleted, "core code", "Rust source file")],
            counts: ChangeCounts {
                added: 0,
                modified: 0,
                deleted: 1,
                total: 1,
            },
            commit_type: CommitType::Cleanup,
            type_description: None,
            message: "cleanup: clean up core code\n\n- remove old.rs".to_string(),
        };
        assert_eq!(format_draft(&draft)[3], "Type: cleanup");
    }

    #[test]
    fn committed_shows_subject_only() {
        let lines = format_committed("fix: update tests\n\n- update a_test.rs");
        assert_eq!(lines, vec!["Committed and pushed: fix: update tests"]);
    }

    // =========================================================================
    // compress formatting tests
    // =========================================================================

    #[test]
    fn compress_started_header() {
        let event = CompressEvent::Started {
            source: PathBuf::from("photos"),
            destination: PathBuf::from("compressed_20240102_030405"),
            rate: Rate::new(0.5).unwrap(),
        };
        assert_eq!(
            format_compress_event(&event),
            vec!["Compressing photos → compressed_20240102_030405 (rate 0.5)"]
        );
    }

    #[test]
    fn compressed_jpeg_shows_quality() {
        let event = CompressEvent::Compressed {
            path: PathBuf::from("sub/c.jpg"),
            original: Dimensions::from((800, 600)),
            resized: Dimensions::from((400, 300)),
            quality: Some(Quality(85)),
            bytes_in: 2048,
            bytes_out: 512,
        };
        assert_eq!(
            format_compress_event(&event),
            vec!["    sub/c.jpg: 800x600 → 400x300 q85, 2.0 KB → 512 B"]
        );
    }

    #[test]
    fn compressed_png_has_no_quality() {
        let event = CompressEvent::Compressed {
            path: PathBuf::from("a.png"),
            original: Dimensions::from((100, 100)),
            resized: Dimensions::from((50, 50)),
            quality: None,
            bytes_in: 100,
            bytes_out: 40,
        };
        assert_eq!(
            format_compress_event(&event),
            vec!["    a.png: 100x100 → 50x50, 100 B → 40 B"]
        );
    }

    #[test]
    fn copied_and_failed_lines() {
        let copied = CompressEvent::Copied {
            path: PathBuf::from("old.bmp"),
            reason: CopyReason::Passthrough("Bmp".to_string()),
            bytes: 10,
        };
        assert_eq!(
            format_compress_event(&copied),
            vec!["    old.bmp: copied (Bmp is kept as-is)"]
        );

        let failed = CompressEvent::Failed {
            path: PathBuf::from("bad.jpg"),
            error: "permission denied".to_string(),
        };
        assert_eq!(
            format_compress_event(&failed),
            vec!["    bad.jpg: failed (permission denied)"]
        );
    }

    #[test]
    fn summary_mentions_skipped_only_when_present() {
        let mut summary = CompressSummary {
            destination: PathBuf::from("out"),
            compressed: 2,
            copied: 1,
            failed: 0,
            skipped: 0,
        };
        assert_eq!(
            format_compress_summary(&summary),
            vec!["2 compressed, 1 copied, 0 failed", "Output: out"]
        );

        summary.skipped = 3;
        assert_eq!(
            format_compress_summary(&summary)[0],
            "2 compressed, 1 copied, 0 failed, 3 skipped"
        );
    }

    // =========================================================================
    // server formatting tests
    // =========================================================================

    #[test]
    fn request_line_layout() {
        assert_eq!(
            format_request_line("14:03:22", "🔍 GET", "/index.html"),
            "[14:03:22] 🔍 GET /index.html"
        );
    }

    #[test]
    fn server_banner_shows_root_and_url() {
        let config = ServerConfig {
            root: PathBuf::from("/srv/site"),
            port: 8080,
        };
        let lines = format_server_banner(&config);
        assert_eq!(lines[0], "Serving /srv/site");
        assert_eq!(lines[1], "    http://localhost:8080");
    }

    // =========================================================================
    // status / uninstall formatting tests
    // =========================================================================

    #[test]
    fn status_report_lines() {
        let report = StatusReport {
            install_dir: PathBuf::from("/home/me/.cyber-zen"),
            version: "0.1.0".to_string(),
            platform: "linux".to_string(),
            architecture: "x86_64".to_string(),
            git_available: true,
            bash_available: false,
        };
        assert_eq!(
            format_status(&report),
            vec![
                "cyber-zen status",
                "    Install dir: /home/me/.cyber-zen",
                "    Version: 0.1.0",
                "    Platform: linux/x86_64",
                "    git: ✓",
                "    bash: ✗",
            ]
        );
    }

    #[test]
    fn uninstall_not_installed() {
        let outcome = UninstallOutcome::NotInstalled {
            path: PathBuf::from("/usr/local/bin/cyber-zen"),
        };
        assert_eq!(
            format_uninstall(&outcome),
            vec!["cyber-zen is not installed at /usr/local/bin/cyber-zen"]
        );
    }

    #[test]
    fn uninstall_removed_with_build_dir() {
        let outcome = UninstallOutcome::Removed {
            path: PathBuf::from("/usr/local/bin/cyber-zen"),
            build_dir_removed: true,
        };
        assert_eq!(
            format_uninstall(&outcome),
            vec![
                "Removed /usr/local/bin/cyber-zen",
                "    Cleaned local build directory",
                "cyber-zen uninstalled",
            ]
        );
    }
}
