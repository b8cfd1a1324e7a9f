//! Raster - The 24-bit pixel buffer
//!
//! `Raster` is the image type shared by the interpolation engine and the
//! BMP codec: source grids, destination buffers and decoded files are all
//! rasters.
//!
//! # Pixel layout
//!
//! - Rows are stored top-down, row-major
//! - Each pixel occupies 3 bytes in B, G, R order
//! - Rows are tightly packed (no padding); the codec adds BMP padding
//!
//! # Ownership model
//!
//! A `Raster` owns its bytes. Parallel writers borrow disjoint rows through
//! [`Raster::rows_mut`], so no locking is needed on pixel data.

mod access;
mod pattern;

use crate::color::BYTES_PER_PIXEL;
use crate::error::{Error, Result};

/// Row-major 24-bit image buffer
///
/// # Examples
///
/// ```
/// use bilerp_core::{Raster, Rgb};
///
/// let mut raster = Raster::new(4, 2).unwrap();
/// raster.set_rgb(3, 1, Rgb::new(255, 0, 0)).unwrap();
/// assert_eq!(raster.get_rgb(3, 1), Some(Rgb::new(255, 0, 0)));
/// assert_eq!(raster.data().len(), 4 * 2 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Pixel bytes, `width * height * 3`
    data: Vec<u8>,
}

impl Raster {
    /// Create a new raster with every pixel black.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = Self::byte_len(width, height)?;
        Ok(Raster {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Wrap an existing B, G, R buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, or
    /// [`Error::BufferSize`] if `data` is not exactly `width * height * 3`
    /// bytes long.
    pub fn from_bgr(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len(width, height)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Raster {
            width,
            height,
            data,
        })
    }

    fn byte_len(width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or(Error::InvalidDimension { width, height })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row (`width * 3`).
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Get raw access to the pixel bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Get the bytes of row `y` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    /// Iterate over rows top-down.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        let stride = self.stride();
        self.data.chunks_exact(stride)
    }

    /// Iterate over disjoint mutable rows top-down.
    ///
    /// Each yielded slice can be handed to a different thread.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        let stride = self.stride();
        self.data.chunks_exact_mut(stride)
    }

    /// Check if two rasters have the same width and height.
    pub fn sizes_equal(&self, other: &Raster) -> bool {
        self.width == other.width && self.height == other.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black() {
        let raster = Raster::new(5, 3).unwrap();
        assert_eq!(raster.width(), 5);
        assert_eq!(raster.height(), 3);
        assert_eq!(raster.stride(), 15);
        assert!(raster.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            Raster::new(0, 4),
            Err(Error::InvalidDimension {
                width: 0,
                height: 4
            })
        ));
        assert!(Raster::new(4, 0).is_err());
    }

    #[test]
    fn test_from_bgr_length_checked() {
        let err = Raster::from_bgr(2, 2, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferSize {
                expected: 12,
                actual: 11
            }
        ));
        assert!(Raster::from_bgr(2, 2, vec![0; 12]).is_ok());
    }

    #[test]
    fn test_rows_are_disjoint() {
        let mut raster = Raster::new(2, 3).unwrap();
        for (y, row) in raster.rows_mut().enumerate() {
            row.fill(y as u8 + 1);
        }
        assert_eq!(raster.row(0), &[1; 6]);
        assert_eq!(raster.row(1), &[2; 6]);
        assert_eq!(raster.row(2), &[3; 6]);
        assert_eq!(raster.rows().count(), 3);
    }
}
