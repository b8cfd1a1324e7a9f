//! bilerp-core - Basic data structures for the bilerp upscaler
//!
//! This crate provides the fundamental types shared by the other crates:
//!
//! - [`Rgb`] - A 3-channel 8-bit color sample with truncating blend arithmetic
//! - [`Raster`] - A row-major 24-bit pixel buffer (B, G, R storage order)
//! - [`Raster::test_pattern`] - The deterministic low-resolution source image
//!
//! # See also
//!
//! [`color`] for the channel layout of a stored pixel.

pub mod error;
pub mod raster;

pub use color::Rgb;
pub use error::{Error, Result};
pub use raster::Raster;

/// Color sample type and the storage layout of 24-bit pixels.
///
/// # Pixel format
///
/// Pixels are stored as 3 consecutive bytes in **B, G, R** order, the same
/// order a 24-bit BMP uses on disk.
pub mod color {
    use std::ops::{Add, Mul};

    /// Bytes per stored pixel
    pub const BYTES_PER_PIXEL: usize = 3;

    /// Blue channel offset within a stored pixel
    pub const BLUE: usize = 0;
    /// Green channel offset
    pub const GREEN: usize = 1;
    /// Red channel offset
    pub const RED: usize = 2;

    /// A 3-channel 8-bit color value.
    ///
    /// Arithmetic follows 8-bit storage semantics:
    ///
    /// - `sample * w` computes each channel as `c as f32 * w` and narrows the
    ///   result to `u8` by truncation toward zero. This is **not** rounding,
    ///   and the bilinear blend depends on it bit for bit.
    /// - `a + b` adds channel-wise and narrows back to 8 bits (wrapping).
    ///   Two truncated complementary products never exceed 255.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Rgb {
        pub r: u8,
        pub g: u8,
        pub b: u8,
    }

    impl Rgb {
        pub const BLACK: Rgb = Rgb::new(0, 0, 0);
        pub const WHITE: Rgb = Rgb::new(255, 255, 255);

        /// Create a sample from its channels.
        #[inline]
        pub const fn new(r: u8, g: u8, b: u8) -> Self {
            Self { r, g, b }
        }

        /// Load a sample from a stored pixel (B, G, R order).
        ///
        /// # Panics
        ///
        /// Panics if `pixel` is shorter than [`BYTES_PER_PIXEL`].
        #[inline]
        pub fn from_bgr(pixel: &[u8]) -> Self {
            Self {
                r: pixel[RED],
                g: pixel[GREEN],
                b: pixel[BLUE],
            }
        }

        /// Store the sample into a pixel slot (B, G, R order).
        ///
        /// # Panics
        ///
        /// Panics if `pixel` is shorter than [`BYTES_PER_PIXEL`].
        #[inline]
        pub fn write_bgr(self, pixel: &mut [u8]) {
            pixel[BLUE] = self.b;
            pixel[GREEN] = self.g;
            pixel[RED] = self.r;
        }

        /// The sample as stored bytes.
        #[inline]
        pub fn to_bgr(self) -> [u8; BYTES_PER_PIXEL] {
            [self.b, self.g, self.r]
        }

        /// Per-channel multiply by `weight`, truncating each channel.
        ///
        /// Float-to-int casts truncate toward zero and saturate, so weights
        /// in `[0, 1]` never leave the `u8` range.
        #[inline]
        pub fn scale(self, weight: f32) -> Self {
            Self {
                r: (self.r as f32 * weight) as u8,
                g: (self.g as f32 * weight) as u8,
                b: (self.b as f32 * weight) as u8,
            }
        }

        /// Linear mix `self * (1 - t) + other * t`, truncating each product.
        #[inline]
        pub fn lerp(self, other: Rgb, t: f32) -> Self {
            self.scale(1.0 - t) + other.scale(t)
        }
    }

    impl Add for Rgb {
        type Output = Rgb;

        #[inline]
        fn add(self, rhs: Rgb) -> Rgb {
            Rgb {
                r: self.r.wrapping_add(rhs.r),
                g: self.g.wrapping_add(rhs.g),
                b: self.b.wrapping_add(rhs.b),
            }
        }
    }

    impl Mul<f32> for Rgb {
        type Output = Rgb;

        #[inline]
        fn mul(self, rhs: f32) -> Rgb {
            self.scale(rhs)
        }
    }

}
