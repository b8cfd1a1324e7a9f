//! bilerp-io - Image I/O for the bilerp upscaler
//!
//! Serializes [`Raster`]s to uncompressed 24-bit BMP files and reads them
//! back. The writer is what the upscaler calls; the reader exists for
//! round-trip verification.

pub mod bmp;
mod error;

pub use bmp::{encode_bmp, read_bmp, write_bmp};
pub use error::{IoError, IoResult};

use bilerp_core::Raster;
use log::{info, warn};
use std::fs;
use std::io::{BufReader, Write};
use std::path::Path;

/// Read a BMP image from a file path.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be opened, otherwise any
/// error from [`read_bmp`].
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let file = fs::File::open(path.as_ref())?;
    read_bmp(BufReader::new(file))
}

/// Write a raster to a BMP file.
///
/// The file is encoded in memory first, so a path that cannot be opened
/// produces no file at all. If the write itself fails part way, the
/// partial file is removed before the error is returned.
///
/// # Errors
///
/// Returns [`IoError::Io`] when the destination cannot be created or
/// written.
pub fn write_image<P: AsRef<Path>>(raster: &Raster, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let bytes = encode_bmp(raster)?;

    let mut file = fs::File::create(path)?;
    if let Err(e) = file.write_all(&bytes).and_then(|()| file.flush()) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(
                "failed to remove partial file {}: {}",
                path.display(),
                cleanup
            );
        }
        return Err(IoError::Io(e));
    }

    info!(
        "wrote {}x{} BMP ({} bytes) to {}",
        raster.width(),
        raster.height(),
        bytes.len(),
        path.display()
    );
    Ok(())
}
