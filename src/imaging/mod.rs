//! Image compression: pure Rust on top of the `image` crate.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Sniff format** | `image::guess_format` |
//! | **Decode** | `image::load_from_memory_with_format` |
//! | **Resize** | [`resize_nearest`] (nearest-neighbor, integer math) |
//! | **Encode** | `JpegEncoder` / `PngEncoder` / `GifEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and quality math (unit testable)
//! - **Parameters**: Validated rate, quality and per-file parameters
//! - **Resample**: The pixel sampler
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
mod resample;
pub mod rust_backend;

pub use backend::{BackendError, CompressOutcome, CopyReason, Dimensions, ImageBackend};
pub use calculations::{MIN_EDGE, jpeg_quality, source_coord, target_dimensions};
pub use params::{CompressParams, Quality, Rate, RateError};
pub use resample::resize_nearest;
pub use rust_backend::{IMAGE_EXTENSIONS, RustBackend, is_image_path};
