//! bilerp-transform - Row-parallel bilinear upscaling
//!
//! This crate provides the interpolation engine:
//!
//! - [`ExtendedGrid`] - Source samples replicated into 2x2 blocks with a
//!   mirrored border, so every lookup stays in bounds
//! - [`interpolate_row`] - Coordinate mapping and two-stage bilinear blend
//!   for one destination row
//! - [`RowScheduler`] - Hands out destination rows, each exactly once, and
//!   tracks completion
//! - [`WorkerPool`] - Bounded set of scoped worker threads, one row each
//! - [`upscale`] - The whole pipeline for one image

mod error;
pub mod grid;
pub mod interpolate;
pub mod pool;
pub mod scheduler;
pub mod upscale;

pub use error::{TransformError, TransformResult};
pub use grid::ExtendedGrid;
pub use interpolate::{AxisSample, blend, interpolate_row, map_axis};
pub use pool::{RowJob, WorkerPool};
pub use scheduler::{RowClaim, RowScheduler};
pub use upscale::{DEFAULT_WORKERS, UpscaleOptions, run_rows, upscale, upscale_into};
