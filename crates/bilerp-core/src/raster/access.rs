//! Pixel access functions
//!
//! Functions for getting and setting individual pixels of a [`Raster`].

use super::Raster;
use crate::color::{BYTES_PER_PIXEL, Rgb};
use crate::error::{Error, Result};

impl Raster {
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Get the color at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.get_rgb_unchecked(x, y))
    }

    /// Get the color at (x, y) without the `Option` wrapper.
    ///
    /// # Panics
    ///
    /// Panics if the pixel lies outside the buffer.
    #[inline]
    pub fn get_rgb_unchecked(&self, x: u32, y: u32) -> Rgb {
        let off = self.offset(x, y);
        Rgb::from_bgr(&self.data[off..off + BYTES_PER_PIXEL])
    }

    /// Get the stored bytes (B, G, R) at (x, y).
    pub fn get_bgr(&self, x: u32, y: u32) -> Option<[u8; BYTES_PER_PIXEL]> {
        self.get_rgb(x, y).map(Rgb::to_bgr)
    }

    /// Set the color at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set_rgb(&mut self, x: u32, y: u32, color: Rgb) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let off = self.offset(x, y);
        color.write_bgr(&mut self.data[off..off + BYTES_PER_PIXEL]);
        Ok(())
    }

    /// Fill every pixel with one color.
    pub fn fill(&mut self, color: Rgb) {
        for px in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            color.write_bgr(px);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_roundtrip() {
        let mut raster = Raster::new(3, 2).unwrap();
        raster.set_rgb(2, 1, Rgb::new(10, 20, 30)).unwrap();
        assert_eq!(raster.get_rgb(2, 1), Some(Rgb::new(10, 20, 30)));
        assert_eq!(raster.get_bgr(2, 1), Some([30, 20, 10]));
        // Last pixel of the buffer
        assert_eq!(&raster.data()[15..18], &[30, 20, 10]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut raster = Raster::new(3, 2).unwrap();
        assert_eq!(raster.get_rgb(3, 0), None);
        assert_eq!(raster.get_rgb(0, 2), None);
        assert!(matches!(
            raster.set_rgb(0, 2, Rgb::WHITE),
            Err(Error::IndexOutOfBounds { x: 0, y: 2, .. })
        ));
    }

    #[test]
    fn test_fill() {
        let mut raster = Raster::new(4, 4).unwrap();
        raster.fill(Rgb::new(1, 2, 3));
        assert!(raster.data().chunks_exact(3).all(|px| px == [3, 2, 1]));
    }
}
