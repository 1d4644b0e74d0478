//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the compress orchestrator (which decides which files to
//! handle and where they go) and the [`backend`](super::backend) (which does
//! the actual pixel work).
//!
//! - [`Rate`]: size ratio in `[0.1, 1.0]`, validated on construction.
//! - [`Quality`]: lossy encoding quality (1–100). Clamped on construction.
//! - [`CompressParams`]: source, output path and rate for one file.

use super::calculations::jpeg_quality;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("rate must be between {min:.1} and {max:.1}, got {value}", min = Rate::MIN, max = Rate::MAX)]
pub struct RateError {
    pub value: f64,
}

/// Size ratio applied to both edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rate(f64);

impl Rate {
    pub const MIN: f64 = 0.1;
    pub const MAX: f64 = 1.0;

    /// Validate a rate. NaN and anything outside `[0.1, 1.0]` are rejected.
    pub fn new(value: f64) -> Result<Self, RateError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RateError { value })
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// JPEG quality this rate maps to.
    pub fn jpeg_quality(self) -> Quality {
        Quality::new(jpeg_quality(self.0))
    }
}

impl Default for Rate {
    fn default() -> Self {
        Self(0.8)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Parameters for compressing one file.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub rate: Rate,
}
