//! Border-extended sample grid
//!
//! The interpolator never touches the source raster directly. Instead each
//! source pixel is replicated into a 2x2 block and one ring of mirrored
//! border cells is added, so every lookup the bilinear blend performs,
//! including those for destination pixels mapping onto the source edges,
//! lands on valid, populated storage.
//!
//! ```text
//! source 2x1:  A B
//!
//! extended 6x4:
//!   A A A B B B      row 0 mirrors row 1
//!   A A A B B B
//!   A A A B B B
//!   A A A B B B      last row mirrors row 2
//!   ^         ^
//!   col 0 mirrors col 1, last col mirrors col 4
//! ```
//!
//! The four extreme corners carry a replicated neighbour, not a diagonal
//! blend. This is a known approximation kept because the reference output
//! depends on it.

use crate::{TransformError, TransformResult};
use bilerp_core::{Raster, Rgb};

/// Source image enlarged by pixel replication and border mirroring.
///
/// Dimensions are `(2 * (src_width + 1), 2 * (src_height + 1))`. Built once
/// per upscale call and read-only afterwards, so it is shared by reference
/// across workers without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedGrid {
    width: usize,
    height: usize,
    cells: Vec<Rgb>,
}

impl ExtendedGrid {
    /// Build the extended grid from a source raster.
    pub fn new(source: &Raster) -> TransformResult<Self> {
        Self::from_bgr(
            source.width() as usize,
            source.height() as usize,
            source.data(),
        )
    }

    /// Build the extended grid from a raw B, G, R buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Configuration`] if either dimension is 0 or
    /// the buffer length does not match `src_width * src_height * 3`.
    pub fn from_bgr(src_width: usize, src_height: usize, data: &[u8]) -> TransformResult<Self> {
        if src_width == 0 || src_height == 0 {
            return Err(TransformError::Configuration(format!(
                "source grid must be non-empty, got {src_width}x{src_height}"
            )));
        }
        let expected = src_width * src_height * 3;
        if data.len() != expected {
            return Err(TransformError::Configuration(format!(
                "source buffer holds {} bytes, expected {expected} for {src_width}x{src_height}",
                data.len()
            )));
        }

        let width = 2 * (src_width + 1);
        let height = 2 * (src_height + 1);
        let mut grid = ExtendedGrid {
            width,
            height,
            cells: vec![Rgb::default(); width * height],
        };

        // Replicate each source pixel into its 2x2 block
        for (i, px) in data.chunks_exact(3).enumerate() {
            let color = Rgb::from_bgr(px);
            let gx = 2 * (i % src_width) + 1;
            let gy = 2 * (i / src_width) + 1;
            grid.put(gx, gy, color);
            grid.put(gx + 1, gy, color);
            grid.put(gx, gy + 1, color);
            grid.put(gx + 1, gy + 1, color);
        }

        // Mirror top and bottom rows first, full width
        grid.copy_row(1, 0);
        grid.copy_row(height - 2, height - 1);
        // Columns afterwards, full height, so the corners pick up the
        // already-mirrored rows
        grid.copy_column(1, 0);
        grid.copy_column(width - 2, width - 1);

        Ok(grid)
    }

    #[inline]
    fn put(&mut self, x: usize, y: usize, color: Rgb) {
        self.cells[y * self.width + x] = color;
    }

    fn copy_row(&mut self, from: usize, to: usize) {
        let w = self.width;
        self.cells.copy_within(from * w..(from + 1) * w, to * w);
    }

    fn copy_column(&mut self, from: usize, to: usize) {
        for y in 0..self.height {
            let row = y * self.width;
            self.cells[row + to] = self.cells[row + from];
        }
    }

    /// Grid width (`2 * (src_width + 1)`).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (`2 * (src_height + 1)`).
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample at (x, y).
    ///
    /// # Panics
    ///
    /// An out-of-range lookup is a defect in the coordinate mapping, so it
    /// panics rather than returning an error.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        assert!(
            x < self.width && y < self.height,
            "grid lookup ({x}, {y}) outside {}x{}",
            self.width,
            self.height
        );
        self.cells[y * self.width + x]
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Rgb] {
        &self.cells
    }
}
