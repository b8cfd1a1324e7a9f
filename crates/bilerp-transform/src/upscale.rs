//! Row-parallel bilinear upscaling
//!
//! Ties the pieces together for one image generation:
//!
//! 1. build the [`ExtendedGrid`] from the source
//! 2. create a [`RowScheduler`] over the destination rows
//! 3. inside a thread scope, keep asking the [`WorkerPool`] to launch
//!    workers until every row is claimed, parking briefly while the pool
//!    is full
//! 4. join every worker before the destination is handed back
//!
//! The output is identical for any worker count.

use crate::grid::ExtendedGrid;
use crate::interpolate::interpolate_row;
use crate::pool::{RowJob, WorkerPool};
use crate::scheduler::RowScheduler;
use crate::{TransformError, TransformResult};
use bilerp_core::Raster;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Default number of concurrent row workers
pub const DEFAULT_WORKERS: usize = 8;

/// How long the coordinator parks when the pool is full before sweeping
/// again. Bounds the delay in noticing a worker that exited with an error.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Options for [`upscale`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpscaleOptions {
    /// Maximum number of rows computed concurrently
    pub workers: usize,
}

impl Default for UpscaleOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

impl UpscaleOptions {
    /// Options with the given worker count.
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    /// Reject a configuration before any work begins.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Configuration`] if `workers` is 0.
    pub fn validate(&self) -> TransformResult<()> {
        if self.workers == 0 {
            return Err(TransformError::Configuration(
                "worker pool size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Upscale `source` to `dest_width x dest_height` with bilinear
/// interpolation.
///
/// # Errors
///
/// Returns [`TransformError::Configuration`] for a zero worker count or a
/// zero destination dimension, and the first row failure otherwise.
///
/// # Examples
///
/// ```
/// use bilerp_core::Raster;
/// use bilerp_transform::{UpscaleOptions, upscale};
///
/// let source = Raster::test_pattern(3, 3).unwrap();
/// let dest = upscale(&source, 64, 48, &UpscaleOptions::with_workers(4)).unwrap();
/// assert_eq!((dest.width(), dest.height()), (64, 48));
/// ```
pub fn upscale(
    source: &Raster,
    dest_width: u32,
    dest_height: u32,
    options: &UpscaleOptions,
) -> TransformResult<Raster> {
    options.validate()?;
    if dest_width == 0 || dest_height == 0 {
        return Err(TransformError::Configuration(format!(
            "destination must be non-empty, got {dest_width}x{dest_height}"
        )));
    }
    let mut dest = Raster::new(dest_width, dest_height)?;
    upscale_into(source, &mut dest, options)?;
    Ok(dest)
}

/// Upscale `source` into a caller-owned destination raster.
///
/// Every row of `dest` is overwritten exactly once.
pub fn upscale_into(
    source: &Raster,
    dest: &mut Raster,
    options: &UpscaleOptions,
) -> TransformResult<()> {
    options.validate()?;
    let start = Instant::now();

    let grid = ExtendedGrid::new(source)?;
    debug!(
        "upscaling {}x{} -> {}x{} via {}x{} extended grid, {} workers",
        source.width(),
        source.height(),
        dest.width(),
        dest.height(),
        grid.width(),
        grid.height(),
        options.workers
    );

    let (dest_width, dest_height) = (dest.width(), dest.height());
    let scheduler = RowScheduler::new(dest);
    run_rows(&scheduler, &grid, options.workers, &compute_row)?;

    info!(
        "upscaled to {}x{} in {:?}",
        dest_width,
        dest_height,
        start.elapsed()
    );
    Ok(())
}

fn compute_row(job: RowJob<'_>) -> TransformResult<()> {
    interpolate_row(
        job.grid,
        job.row,
        job.dest_width,
        job.dest_height,
        job.pixels,
    )
}

/// Drive the claim loop: launch workers running `work` over every row of
/// `scheduler`, then join them all.
///
/// This is the coordinator; it must be the only caller for a given
/// scheduler.
///
/// # Errors
///
/// Returns [`TransformError::Configuration`] if `workers` is 0, before any
/// row is claimed, or the first error of a worker. Workers still running
/// when an error surfaces are joined before this returns.
pub fn run_rows<F>(
    scheduler: &RowScheduler<'_>,
    grid: &ExtendedGrid,
    workers: usize,
    work: &F,
) -> TransformResult<()>
where
    F: Fn(RowJob<'_>) -> TransformResult<()> + Sync,
{
    if workers == 0 {
        return Err(TransformError::Configuration(
            "worker pool size must be at least 1".to_string(),
        ));
    }

    std::thread::scope(|s| {
        let mut pool = WorkerPool::new(s, scheduler, grid);
        let mut seen = scheduler.completed_count();
        let launched = loop {
            if scheduler.all_rows_claimed() {
                break Ok(());
            }
            match pool.launch_workers(workers, work) {
                Ok(0) => seen = scheduler.wait_for_completion(seen, POLL_INTERVAL),
                Ok(_) => {}
                Err(e) => break Err(e),
            }
        };
        // Workers still running after a failure are joined too, otherwise
        // a later panic would escape the scope
        let joined = pool.join_all();
        launched.and(joined)
    })?;

    debug_assert!(scheduler.all_rows_completed());
    Ok(())
}
