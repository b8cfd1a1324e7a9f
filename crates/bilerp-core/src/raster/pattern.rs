//! Synthetic test pattern
//!
//! Fabricates the deterministic low-resolution source image used by the
//! entry point and the regression tests.

use super::Raster;
use crate::color::{BLUE, BYTES_PER_PIXEL, GREEN, RED};
use crate::error::Result;

impl Raster {
    /// Generate the bit-pattern test image.
    ///
    /// For pixel index `v = y * width + x`, bit 0 of `v` sets blue to 255,
    /// bit 1 sets green and bit 2 sets red. All other channels are 0.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidDimension`] if width or height is 0.
    pub fn test_pattern(width: u32, height: u32) -> Result<Raster> {
        let mut raster = Raster::new(width, height)?;
        for (v, px) in raster.data.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            if v & 1 == 1 {
                px[BLUE] = 255;
            }
            if v & 2 == 2 {
                px[GREEN] = 255;
            }
            if v & 4 == 4 {
                px[RED] = 255;
            }
        }
        Ok(raster)
    }
}
