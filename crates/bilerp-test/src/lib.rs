//! bilerp-test - Regression test framework for the bilerp crates
//!
//! Golden-file driven checks with three modes:
//!
//! - **Generate**: Write golden files from the current run
//! - **Compare**: Compare results with golden files (default); a golden
//!   file that does not exist yet is seeded from the current run
//! - **Display**: Run tests without comparison
//!
//! # Usage
//!
//! ```ignore
//! use bilerp_test::RegParams;
//!
//! let mut rp = RegParams::new("upscale");
//! rp.compare_values(512.0, dest.width() as f64, 0.0);
//! rp.write_raster_and_check(&dest).unwrap();
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use bilerp_core::Raster;

/// Build the standard test pattern used across the regression tests.
pub fn test_pattern(width: u32, height: u32) -> TestResult<Raster> {
    Raster::test_pattern(width, height).map_err(|e| TestError::RasterLoad {
        path: format!("<pattern {width}x{height}>"),
        message: e.to_string(),
    })
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // bilerp-test is at crates/bilerp-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
