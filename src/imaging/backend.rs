//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the one operation the compress command
//! needs: take a file, write its compressed counterpart, report what
//! happened. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::{CompressParams, Quality};
use image::ImageFormat;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Why a file was copied instead of re-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyReason {
    /// Decodable, but not a format the compressor re-encodes (BMP, WebP).
    Passthrough(String),
    /// The bytes could not be decoded as an image.
    DecodeFailed(String),
}

impl fmt::Display for CopyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passthrough(format) => write!(f, "{format} is kept as-is"),
            Self::DecodeFailed(reason) => write!(f, "could not decode: {reason}"),
        }
    }
}

/// What a backend did with one file.
#[derive(Debug, Clone, PartialEq)]
pub enum CompressOutcome {
    Encoded {
        format: ImageFormat,
        original: Dimensions,
        resized: Dimensions,
        /// Only set for lossy formats.
        quality: Option<Quality>,
        bytes_in: u64,
        bytes_out: u64,
    },
    Copied {
        reason: CopyReason,
        bytes: u64,
    },
}

/// Trait for image compression backends.
///
/// Implementations must always leave a file at `params.output` on `Ok`:
/// either the re-encoded image or a verbatim copy of the source.
pub trait ImageBackend {
    fn compress(&self, params: &CompressParams) -> Result<CompressOutcome, BackendError>;
}
