//! The `compress` command: mirror a file or directory tree with every image
//! downsized.
//!
//! ## Destination
//!
//! Outputs never overwrite a previous run. Unless the destination already
//! ends in a `_YYYYMMDD_HHMMSS` stamp, the run's local time is appended:
//!
//! ```text
//! --src photos/              → compressed_20240101_120000/...
//! --src photos/ --dist out   → out_20240101_120000/...
//! --src a.jpg                → compressed_20240101_120000/a.jpg
//! --src a.jpg --dist out     → out_20240101_120000/a.jpg
//! --src a.jpg --dist b.jpg   → b_20240101_120000.jpg
//! --src a.jpg --dist b_20240101_120000.jpg → unchanged
//! ```
//!
//! ## Directory mode
//!
//! The tree is walked in file-name order. Files with an image extension
//! ([`IMAGE_EXTENSIONS`]) go through the backend at the same relative path
//! under the destination; everything else is skipped. A file that fails is
//! reported and the walk continues.
//!
//! ## Single-file mode
//!
//! The file must have an image extension, and any failure aborts.
//!
//! Progress is reported as [`CompressEvent`]s over an optional channel so
//! the CLI can print while work continues.

use crate::imaging::{
    BackendError, CompressOutcome, CompressParams, CopyReason, Dimensions, IMAGE_EXTENSIONS,
    ImageBackend, Quality, Rate, RustBackend, is_image_path,
};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

/// Destination base name when `--dist` is not given.
pub const DEFAULT_DIST: &str = "compressed";

/// `chrono` format of the run stamp.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

static STAMP_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_\d{8}_\d{6}$").expect("stamp pattern must compile"));

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("source path does not exist: {0}")]
    SourceNotFound(PathBuf),
    #[error(
        "not a supported image file: {0} (expected one of: {exts})",
        exts = IMAGE_EXTENSIONS.join(", ")
    )]
    UnsupportedFile(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to compress {path}: {source}")]
    Backend {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// Progress of a compress run, one event per handled file.
#[derive(Debug, Clone, PartialEq)]
pub enum CompressEvent {
    Started {
        source: PathBuf,
        destination: PathBuf,
        rate: Rate,
    },
    Compressed {
        path: PathBuf,
        original: Dimensions,
        resized: Dimensions,
        quality: Option<Quality>,
        bytes_in: u64,
        bytes_out: u64,
    },
    Copied {
        path: PathBuf,
        reason: CopyReason,
        bytes: u64,
    },
    Failed {
        path: PathBuf,
        error: String,
    },
}

impl CompressEvent {
    fn from_outcome(path: PathBuf, outcome: CompressOutcome) -> Self {
        match outcome {
            CompressOutcome::Encoded {
                original,
                resized,
                quality,
                bytes_in,
                bytes_out,
                ..
            } => Self::Compressed {
                path,
                original,
                resized,
                quality,
                bytes_in,
                bytes_out,
            },
            CompressOutcome::Copied { reason, bytes } => Self::Copied {
                path,
                reason,
                bytes,
            },
        }
    }
}

/// Per-outcome counts of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressSummary {
    pub destination: PathBuf,
    pub compressed: usize,
    pub copied: usize,
    pub failed: usize,
    /// Non-image files left out of a directory run.
    pub skipped: usize,
}

impl CompressSummary {
    fn record(&mut self, event: &CompressEvent) {
        match event {
            CompressEvent::Compressed { .. } => self.compressed += 1,
            CompressEvent::Copied { .. } => self.copied += 1,
            CompressEvent::Failed { .. } => self.failed += 1,
            CompressEvent::Started { .. } => {}
        }
    }
}

/// Local time of the run, formatted for path stamps.
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Whether `name` already ends in `_YYYYMMDD_HHMMSS`.
pub fn has_timestamp_suffix(name: &str) -> bool {
    STAMP_SUFFIX.is_match(name)
}

/// Stamp the last component of a directory path.
pub fn stamp_dir(path: &Path, stamp: &str) -> PathBuf {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) if has_timestamp_suffix(name) => path.to_path_buf(),
        Some(name) => path.with_file_name(format!("{name}_{stamp}")),
        // `.`, `/` and friends: put a fresh stamped folder inside
        None => path.join(format!("{DEFAULT_DIST}_{stamp}")),
    }
}

/// Stamp the stem of a file path, keeping its extension.
pub fn stamp_file(path: &Path, stamp: &str) -> PathBuf {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return stamp_dir(path, stamp);
    };
    if has_timestamp_suffix(stem) {
        return path.to_path_buf();
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_file_name(format!("{stem}_{stamp}.{ext}")),
        None => path.with_file_name(format!("{stem}_{stamp}")),
    }
}

/// Where the output goes.
///
/// For a directory source this is the destination directory. For a file
/// source it is the output file: `dist` itself (stamped) when it has an
/// extension, otherwise the source's file name inside the stamped `dist`
/// directory.
pub fn resolve_destination(
    src: &Path,
    src_is_dir: bool,
    dist: Option<&Path>,
    stamp: &str,
) -> PathBuf {
    let base = dist.unwrap_or(Path::new(DEFAULT_DIST));
    if src_is_dir {
        return stamp_dir(base, stamp);
    }
    if dist.is_some_and(|d| d.extension().is_some()) {
        return stamp_file(base, stamp);
    }
    let dir = stamp_dir(base, stamp);
    match src.file_name() {
        Some(name) => dir.join(name),
        None => dir,
    }
}

fn create_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn emit(events: &Option<Sender<CompressEvent>>, event: CompressEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is printing
        tx.send(event).ok();
    }
}

/// Compress `src` into a stamped destination using the `image` crate backend.
pub fn compress(
    src: &Path,
    dist: Option<&Path>,
    rate: Rate,
    events: Option<Sender<CompressEvent>>,
) -> Result<CompressSummary, CompressError> {
    let backend = RustBackend::new();
    compress_with_backend(&backend, src, dist, rate, &timestamp_now(), events)
}

/// Compress using a specific backend and stamp (allows testing with mock).
pub fn compress_with_backend(
    backend: &impl ImageBackend,
    src: &Path,
    dist: Option<&Path>,
    rate: Rate,
    stamp: &str,
    events: Option<Sender<CompressEvent>>,
) -> Result<CompressSummary, CompressError> {
    if !src.exists() {
        return Err(CompressError::SourceNotFound(src.to_path_buf()));
    }
    let src_is_dir = src.is_dir();
    if !src_is_dir && !is_image_path(src) {
        return Err(CompressError::UnsupportedFile(src.to_path_buf()));
    }

    let destination = resolve_destination(src, src_is_dir, dist, stamp);
    tracing::debug!(
        source = %src.display(),
        destination = %destination.display(),
        rate = rate.value(),
        "compress"
    );
    emit(
        &events,
        CompressEvent::Started {
            source: src.to_path_buf(),
            destination: destination.clone(),
            rate,
        },
    );

    let mut summary = CompressSummary {
        destination: destination.clone(),
        ..Default::default()
    };

    if src_is_dir {
        compress_tree(backend, src, &destination, rate, &events, &mut summary)?;
    } else {
        create_parent(&destination)?;
        let params = CompressParams {
            source: src.to_path_buf(),
            output: destination.clone(),
            rate,
        };
        let outcome = backend
            .compress(&params)
            .map_err(|source| CompressError::Backend {
                path: src.to_path_buf(),
                source,
            })?;
        let name = src.file_name().map(PathBuf::from).unwrap_or_default();
        let event = CompressEvent::from_outcome(name, outcome);
        summary.record(&event);
        emit(&events, event);
    }

    Ok(summary)
}

fn is_dir_at(entry: &walkdir::DirEntry, target: &Path) -> bool {
    entry.file_type().is_dir() && entry.path().canonicalize().is_ok_and(|p| p == target)
}

fn compress_tree(
    backend: &impl ImageBackend,
    src: &Path,
    destination: &Path,
    rate: Rate,
    events: &Option<Sender<CompressEvent>>,
    summary: &mut CompressSummary,
) -> Result<(), CompressError> {
    fs::create_dir_all(destination)?;
    // The destination may sit inside the source (`--src .`); never walk it.
    let own_output = destination.canonicalize()?;
    let walk = WalkDir::new(src)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_dir_at(e, &own_output));

    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(src).to_path_buf();
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                let event = CompressEvent::Failed {
                    path,
                    error: e.to_string(),
                };
                summary.record(&event);
                emit(events, event);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !is_image_path(entry.path()) {
            tracing::debug!(path = %entry.path().display(), "not an image, skipping");
            summary.skipped += 1;
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };

        let params = CompressParams {
            source: entry.path().to_path_buf(),
            output: destination.join(relative),
            rate,
        };
        let result = create_parent(&params.output)
            .map_err(BackendError::from)
            .and_then(|()| backend.compress(&params));

        let event = match result {
            Ok(outcome) => CompressEvent::from_outcome(relative.to_path_buf(), outcome),
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "compression failed");
                CompressEvent::Failed {
                    path: relative.to_path_buf(),
                    error: e.to_string(),
                }
            }
        };
        summary.record(&event);
        emit(events, event);
    }

    Ok(())
}
