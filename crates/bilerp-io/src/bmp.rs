//! BMP image format support
//!
//! Reads and writes uncompressed 24-bit Windows Bitmap (BMP) files.
//!
//! # Layout
//!
//! | Offset | Size | Field |
//! |---|---|---|
//! | 0 | 2 | magic `"BM"` |
//! | 2 | 4 | file size (LE) |
//! | 6 | 4 | two reserved 16-bit fields (zero) |
//! | 10 | 4 | pixel data offset (LE) |
//! | 14 | 4 | info header size (40) |
//! | 18 | 4 | width (i32) |
//! | 22 | 4 | height (i32, positive = bottom-up) |
//! | 26 | 2 | color planes (1) |
//! | 28 | 2 | bits per pixel (24) |
//! | 30 | 24 | unused (zero) |
//!
//! Pixel rows follow bottom row first, each pixel as B, G, R, each row
//! zero-padded to a 4-byte boundary.

use crate::{IoError, IoResult};
use bilerp_core::Raster;
use bilerp_core::color::BYTES_PER_PIXEL;
use std::io::{Read, Write};

/// BMP file header size
const BMP_FILE_HEADER_SIZE: usize = 14;

/// BMP info header size (BITMAPINFOHEADER)
const BMP_INFO_HEADER_SIZE: u32 = 40;

/// Offset of the pixel data in files this module writes
pub const BMP_PIXEL_OFFSET: usize = BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE as usize;

/// Bytes per BMP row for `width` 24-bit pixels, padded to 4 bytes.
#[inline]
pub fn row_stride(width: u32) -> usize {
    (width as usize * BYTES_PER_PIXEL).div_ceil(4) * 4
}

/// Total size of the BMP file written for a raster of the given size.
pub fn file_size(width: u32, height: u32) -> usize {
    BMP_PIXEL_OFFSET + row_stride(width) * height as usize
}

#[inline]
fn le_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

#[inline]
fn le_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

#[inline]
fn le_i32(buf: &[u8], at: usize) -> i32 {
    le_u32(buf, at) as i32
}

/// Write a raster as a 24-bit BMP
///
/// Rows are emitted bottom-up; the raster's stored B, G, R bytes are
/// written as-is.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the writer fails, or
/// [`IoError::InvalidData`] if the image is too large for the 32-bit
/// header fields.
pub fn write_bmp<W: Write>(raster: &Raster, mut writer: W) -> IoResult<()> {
    let width = raster.width();
    let height = raster.height();

    let stride = row_stride(width);
    let total = file_size(width, height);
    let total = u32::try_from(total)
        .map_err(|_| IoError::InvalidData(format!("image too large for BMP: {width}x{height}")))?;
    let signed_width = i32::try_from(width)
        .map_err(|_| IoError::InvalidData(format!("width {width} exceeds i32")))?;
    let signed_height = i32::try_from(height)
        .map_err(|_| IoError::InvalidData(format!("height {height} exceeds i32")))?;

    // File header
    writer.write_all(b"BM")?;
    writer.write_all(&total.to_le_bytes())?;
    writer.write_all(&[0u8; 4])?; // Reserved
    writer.write_all(&(BMP_PIXEL_OFFSET as u32).to_le_bytes())?;

    // Info header
    writer.write_all(&BMP_INFO_HEADER_SIZE.to_le_bytes())?;
    writer.write_all(&signed_width.to_le_bytes())?;
    writer.write_all(&signed_height.to_le_bytes())?; // Bottom-up
    writer.write_all(&1u16.to_le_bytes())?; // Planes
    writer.write_all(&24u16.to_le_bytes())?;
    writer.write_all(&[0u8; 24])?;

    // Pixel data (bottom-up)
    let mut row_buffer = vec![0u8; stride];
    for y in (0..height).rev() {
        let row = raster.row(y);
        row_buffer[..row.len()].copy_from_slice(row);
        writer.write_all(&row_buffer)?;
    }

    Ok(())
}

/// Encode a raster into an in-memory BMP file.
pub fn encode_bmp(raster: &Raster) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::with_capacity(file_size(raster.width(), raster.height()));
    write_bmp(raster, &mut buffer)?;
    Ok(buffer)
}

/// Read a 24-bit uncompressed BMP
///
/// Accepts both bottom-up (positive height) and top-down (negative height)
/// row orders. The returned raster is always top-down.
///
/// # Errors
///
/// Returns [`IoError::InvalidData`] for a malformed header and
/// [`IoError::UnsupportedFormat`] for depths other than 24 or for
/// compressed data.
pub fn read_bmp<R: Read>(mut reader: R) -> IoResult<Raster> {
    let mut file_header = [0u8; BMP_FILE_HEADER_SIZE];
    reader.read_exact(&mut file_header)?;

    if &file_header[0..2] != b"BM" {
        return Err(IoError::InvalidData("not a BMP file".to_string()));
    }
    let pixel_offset = le_u32(&file_header, 10) as usize;

    let mut info_header = [0u8; BMP_INFO_HEADER_SIZE as usize];
    reader.read_exact(&mut info_header)?;

    let header_size = le_u32(&info_header, 0);
    if header_size < BMP_INFO_HEADER_SIZE {
        return Err(IoError::InvalidData(format!(
            "unsupported BMP header size: {header_size}"
        )));
    }

    let width = le_i32(&info_header, 4);
    let height = le_i32(&info_header, 8);

    let planes = le_u16(&info_header, 12);
    if planes != 1 {
        return Err(IoError::InvalidData(format!(
            "unsupported number of planes: {planes}"
        )));
    }

    let bits_per_pixel = le_u16(&info_header, 14);
    if bits_per_pixel != 24 {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP bit depth: {bits_per_pixel}"
        )));
    }

    let compression = le_u32(&info_header, 16);
    if compression != 0 {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP compression: {compression}"
        )));
    }

    if width <= 0 || height == 0 {
        return Err(IoError::InvalidData(format!(
            "invalid BMP dimensions: {width}x{height}"
        )));
    }
    let top_down = height < 0;
    let width = width.unsigned_abs();
    let height = height.unsigned_abs();

    // Skip any extended header bytes and gap before the pixel data
    let consumed = BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE as usize;
    if pixel_offset < consumed {
        return Err(IoError::InvalidData(format!(
            "pixel data offset {pixel_offset} overlaps header"
        )));
    }
    let skip = (pixel_offset - consumed) as u64;
    if skip > 0 {
        std::io::copy(&mut (&mut reader).take(skip), &mut std::io::sink())?;
    }

    let mut raster = Raster::new(width, height)?;
    let mut row_buffer = vec![0u8; row_stride(width)];
    let row_len = raster.stride();

    for row in 0..height {
        reader.read_exact(&mut row_buffer)?;
        let y = if top_down { row } else { height - 1 - row };
        raster.row_mut(y).copy_from_slice(&row_buffer[..row_len]);
    }

    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilerp_core::Rgb;

    #[test]
    fn test_row_stride_padding() {
        assert_eq!(row_stride(1), 4);
        assert_eq!(row_stride(3), 12);
        assert_eq!(row_stride(4), 12);
        assert_eq!(row_stride(5), 16);
        assert_eq!(row_stride(512), 1536);
    }

    #[test]
    fn test_header_fields() {
        let raster = Raster::test_pattern(3, 2).unwrap();
        let bytes = encode_bmp(&raster).unwrap();

        assert_eq!(bytes.len(), 54 + 12 * 2);
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(le_u32(&bytes, 2) as usize, bytes.len());
        assert_eq!(&bytes[6..10], &[0, 0, 0, 0]);
        assert_eq!(le_u32(&bytes, 10), 54);
        assert_eq!(le_u32(&bytes, 14), 40);
        assert_eq!(le_i32(&bytes, 18), 3);
        assert_eq!(le_i32(&bytes, 22), 2);
        assert_eq!(le_u16(&bytes, 26), 1);
        assert_eq!(le_u16(&bytes, 28), 24);
        assert!(bytes[30..54].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_rows_bottom_up_and_padded() {
        let mut raster = Raster::new(1, 2).unwrap();
        raster.set_rgb(0, 0, Rgb::new(1, 2, 3)).unwrap();
        raster.set_rgb(0, 1, Rgb::new(4, 5, 6)).unwrap();
        let bytes = encode_bmp(&raster).unwrap();

        // Bottom row (y = 1) first, B G R then one pad byte
        assert_eq!(&bytes[54..58], &[6, 5, 4, 0]);
        assert_eq!(&bytes[58..62], &[3, 2, 1, 0]);
    }

    #[test]
    fn test_bmp_roundtrip() {
        let mut raster = Raster::new(5, 5).unwrap();
        raster.set_rgb(0, 0, Rgb::new(255, 0, 0)).unwrap();
        raster.set_rgb(1, 1, Rgb::new(0, 255, 0)).unwrap();
        raster.set_rgb(4, 2, Rgb::new(0, 0, 255)).unwrap();

        let buffer = encode_bmp(&raster).unwrap();
        let decoded = read_bmp(std::io::Cursor::new(buffer)).unwrap();

        assert_eq!(decoded, raster);
        assert_eq!(decoded.get_rgb(0, 0), Some(Rgb::new(255, 0, 0)));
        assert_eq!(decoded.get_rgb(4, 2), Some(Rgb::new(0, 0, 255)));
    }

    #[test]
    fn test_read_top_down() {
        let raster = Raster::test_pattern(2, 2).unwrap();
        let mut bytes = encode_bmp(&raster).unwrap();
        // Flip to a top-down file by negating height and reversing the rows
        bytes[22..26].copy_from_slice(&(-2i32).to_le_bytes());
        let stride = row_stride(2);
        let (first, second) = bytes[54..].split_at_mut(stride);
        first.swap_with_slice(second);

        let decoded = read_bmp(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(decoded, raster);
    }

    #[test]
    fn test_reject_bad_magic() {
        let mut bytes = encode_bmp(&Raster::new(1, 1).unwrap()).unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            read_bmp(std::io::Cursor::new(bytes)),
            Err(IoError::InvalidData(_))
        ));
    }

    #[test]
    fn test_reject_other_depth() {
        let mut bytes = encode_bmp(&Raster::new(1, 1).unwrap()).unwrap();
        bytes[28..30].copy_from_slice(&32u16.to_le_bytes());
        assert!(matches!(
            read_bmp(std::io::Cursor::new(bytes)),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_truncated_data() {
        let bytes = encode_bmp(&Raster::new(4, 4).unwrap()).unwrap();
        let truncated = bytes[..bytes.len() - 1].to_vec();
        assert!(matches!(
            read_bmp(std::io::Cursor::new(truncated)),
            Err(IoError::Io(_))
        ));
    }
}
