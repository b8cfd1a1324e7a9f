//! Row interpolation
//!
//! Maps each destination pixel of one row to a fractional coordinate in the
//! [`ExtendedGrid`] and blends the four surrounding samples.
//!
//! # Coordinate mapping
//!
//! Per axis, for destination index `i` of `dest_len` and a grid of
//! `ext_len` cells:
//!
//! ```text
//! g     = i / (dest_len - 1) * (ext_len - 2) + 1     (g = 1 when dest_len == 1)
//! floor = floor(g / 2) * 2
//! ceil  = min(floor + 2, ext_len - 1)
//! w     = (g - floor) / 2
//! ```
//!
//! `g` spans `[1, ext_len - 1]`, so `floor` and `ceil` always stay inside
//! the grid. The blend is horizontal first, then vertical; each multiply
//! truncates to 8 bits, which fixes the exact output bytes.

use crate::grid::ExtendedGrid;
use crate::{TransformError, TransformResult};
use bilerp_core::Rgb;
use bilerp_core::color::BYTES_PER_PIXEL;

/// The two grid indices bracketing one destination coordinate, plus the
/// weight of the upper one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSample {
    pub floor: usize,
    pub ceil: usize,
    pub weight: f32,
}

/// Map destination index `index` on an axis of `dest_len` pixels onto a
/// grid axis of `ext_len` cells.
#[inline]
pub fn map_axis(index: usize, dest_len: usize, ext_len: usize) -> AxisSample {
    let g = if dest_len > 1 {
        (index as f32 / (dest_len - 1) as f32) * (ext_len - 2) as f32 + 1.0
    } else {
        1.0
    };
    let floor = ((g / 2.0).floor() * 2.0) as usize;
    let weight = (g - floor as f32) / 2.0;
    let ceil = (floor + 2).min(ext_len - 1);
    AxisSample {
        floor,
        ceil,
        weight,
    }
}

/// Bilinear blend of four samples, horizontal then vertical.
#[inline]
pub fn blend(nw: Rgb, ne: Rgb, sw: Rgb, se: Rgb, wx: f32, wy: f32) -> Rgb {
    let north = nw * (1.0 - wx) + ne * wx;
    let south = sw * (1.0 - wx) + se * wx;
    north * (1.0 - wy) + south * wy
}

/// Compute one destination row.
///
/// Writes exactly `dest_width` pixels into `out` and touches nothing else,
/// so distinct rows can be computed concurrently without locking.
///
/// # Errors
///
/// Returns [`TransformError::InvariantViolation`] if `out` is not
/// `dest_width * 3` bytes or `row >= dest_height`.
pub fn interpolate_row(
    grid: &ExtendedGrid,
    row: usize,
    dest_width: usize,
    dest_height: usize,
    out: &mut [u8],
) -> TransformResult<()> {
    if out.len() != dest_width * BYTES_PER_PIXEL {
        return Err(TransformError::InvariantViolation(format!(
            "row {row} buffer holds {} bytes, expected {}",
            out.len(),
            dest_width * BYTES_PER_PIXEL
        )));
    }
    if row >= dest_height {
        return Err(TransformError::InvariantViolation(format!(
            "row {row} outside destination height {dest_height}"
        )));
    }

    let ys = map_axis(row, dest_height, grid.height());
    for (x, px) in out.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
        let xs = map_axis(x, dest_width, grid.width());
        let color = blend(
            grid.get(xs.floor, ys.floor),
            grid.get(xs.ceil, ys.floor),
            grid.get(xs.floor, ys.ceil),
            grid.get(xs.ceil, ys.ceil),
            xs.weight,
            ys.weight,
        );
        color.write_bgr(px);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilerp_core::Raster;

    #[test]
    fn test_map_axis_endpoints() {
        // 3-pixel source -> 8-cell axis
        let first = map_axis(0, 512, 8);
        assert_eq!((first.floor, first.ceil), (0, 2));
        assert_eq!(first.weight, 0.5);

        let last = map_axis(511, 512, 8);
        assert_eq!((last.floor, last.ceil), (6, 7));
        assert_eq!(last.weight, 0.5);
    }

    #[test]
    fn test_map_axis_single_pixel() {
        let s = map_axis(0, 1, 10);
        assert_eq!((s.floor, s.ceil), (0, 2));
        assert_eq!(s.weight, 0.5);
    }

    #[test]
    fn test_map_axis_centre() {
        let s = map_axis(256, 512, 8);
        assert_eq!((s.floor, s.ceil), (4, 6));
        assert!(s.weight > 0.0029 && s.weight < 0.0030, "weight {}", s.weight);
    }

    #[test]
    fn test_blend_order_matters() {
        // Horizontal pass truncates before the vertical one
        let white = Rgb::WHITE;
        assert_eq!(
            blend(white, white, white, white, 0.5, 0.5),
            Rgb::new(254, 254, 254)
        );
        assert_eq!(
            blend(white, white, white, white, 0.0, 0.0),
            Rgb::WHITE
        );
    }

    #[test]
    fn test_row_length_checked() {
        let grid = ExtendedGrid::new(&Raster::new(2, 2).unwrap()).unwrap();
        let mut short = vec![0u8; 5];
        assert!(matches!(
            interpolate_row(&grid, 0, 2, 2, &mut short),
            Err(TransformError::InvariantViolation(_))
        ));
        let mut row = vec![0u8; 6];
        assert!(matches!(
            interpolate_row(&grid, 2, 2, 2, &mut row),
            Err(TransformError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_row_writes_every_pixel() {
        let grid = ExtendedGrid::new(&Raster::test_pattern(3, 3).unwrap()).unwrap();
        let mut row = vec![0xAAu8; 7 * 3];
        interpolate_row(&grid, 3, 7, 7, &mut row).unwrap();
        // Row 3 of 7 maps to grid y = 4 exactly: the middle source row
        // (blue-green, red, red-blue), no 0xAA filler may survive
        assert!(!row.iter().any(|&b| b == 0xAA));
    }
}
