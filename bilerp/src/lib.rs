//! bilerp - Bilinear upscaling of small rasters
//!
//! Enlarges a small 24-bit raster to an arbitrary size by bilinear
//! interpolation, computing destination rows concurrently on a bounded
//! set of worker threads, and writes the result as an uncompressed BMP.
//!
//! # Example
//!
//! ```
//! use bilerp::Raster;
//! use bilerp::transform::{UpscaleOptions, upscale};
//!
//! let source = Raster::test_pattern(3, 3).unwrap();
//! let dest = upscale(&source, 32, 32, &UpscaleOptions::default()).unwrap();
//! let bmp = bilerp::io::encode_bmp(&dest).unwrap();
//! assert_eq!(&bmp[..2], b"BM");
//! ```

pub mod config;
pub mod logging;

// Re-export core types
pub use bilerp_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use bilerp_io as io;
pub use bilerp_transform as transform;

pub use config::{ConfigError, RunConfig};
pub use logging::setup_logging;
