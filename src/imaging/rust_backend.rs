//! Pure Rust compression backend built on the `image` crate.
//!
//! ## Format handling
//!
//! | Detected format | Action |
//! |---|---|
//! | JPEG | nearest-neighbor resize, re-encode as RGB8 with rate-derived quality |
//! | PNG | nearest-neighbor resize, lossless re-encode |
//! | GIF | nearest-neighbor resize, single-frame re-encode |
//! | BMP, WebP | copied byte-for-byte |
//! | anything undecodable | copied byte-for-byte, warning logged |
//!
//! The format is sniffed from the file's magic bytes, not its extension.

use super::backend::{BackendError, CompressOutcome, CopyReason, Dimensions, ImageBackend};
use super::calculations::target_dimensions;
use super::params::{CompressParams, Quality};
use super::resample::resize_nearest;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, Frame, ImageEncoder, ImageFormat};
use std::fs;
use std::path::Path;

/// Extensions the compressor recognizes as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Whether `path` has one of [`IMAGE_EXTENSIONS`] (case-insensitive).
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Pure Rust backend using the `image` crate's codecs.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `img` in `format`. Only JPEG, PNG and GIF reach this point.
fn encode(
    img: &DynamicImage,
    format: ImageFormat,
    quality: Quality,
) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    let result = match format {
        ImageFormat::Jpeg => {
            let rgb = img.to_rgb8();
            JpegEncoder::new_with_quality(&mut buf, quality.value() as u8).write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )
        }
        ImageFormat::Png => img.write_with_encoder(PngEncoder::new(&mut buf)),
        ImageFormat::Gif => {
            let mut encoder = GifEncoder::new(&mut buf);
            encoder.encode_frame(Frame::new(img.to_rgba8()))
        }
        other => {
            return Err(BackendError::ProcessingFailed(format!(
                "Unsupported output format: {other:?}"
            )));
        }
    };
    result
        .map_err(|e| BackendError::ProcessingFailed(format!("{format:?} encode failed: {e}")))?;
    Ok(buf)
}

/// Write the source bytes unchanged and report why.
fn copy_verbatim(
    bytes: &[u8],
    output: &Path,
    reason: CopyReason,
) -> Result<CompressOutcome, BackendError> {
    fs::write(output, bytes)?;
    Ok(CompressOutcome::Copied {
        reason,
        bytes: bytes.len() as u64,
    })
}

impl ImageBackend for RustBackend {
    fn compress(&self, params: &CompressParams) -> Result<CompressOutcome, BackendError> {
        let bytes = fs::read(&params.source)?;

        let format = match image::guess_format(&bytes) {
            Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif)) => format,
            Ok(other) => {
                let name = format!("{other:?}");
                return copy_verbatim(&bytes, &params.output, CopyReason::Passthrough(name));
            }
            Err(e) => {
                tracing::warn!(
                    path = %params.source.display(),
                    error = %e,
                    "not a decodable image, copying"
                );
                let reason = CopyReason::DecodeFailed(e.to_string());
                return copy_verbatim(&bytes, &params.output, reason);
            }
        };

        let img = match image::load_from_memory_with_format(&bytes, format) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!(path = %params.source.display(), error = %e, "decode failed, copying");
                let reason = CopyReason::DecodeFailed(e.to_string());
                return copy_verbatim(&bytes, &params.output, reason);
            }
        };

        let original = Dimensions::from((img.width(), img.height()));
        let (width, height) =
            target_dimensions((original.width, original.height), params.rate.value());
        let resized = resize_nearest(img, width, height);

        let quality = params.rate.jpeg_quality();
        let encoded = encode(&resized, format, quality)?;
        fs::write(&params.output, &encoded)?;

        Ok(CompressOutcome::Encoded {
            format,
            original,
            resized: Dimensions::from((width, height)),
            quality: (format == ImageFormat::Jpeg).then_some(quality),
            bytes_in: bytes.len() as u64,
            bytes_out: encoded.len() as u64,
        })
    }
}
