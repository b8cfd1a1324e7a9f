//! Run configuration for the `bilerp` binary
//!
//! Defaults reproduce the reference run: a 3x3 test pattern upscaled to
//! 512x512 on 8 workers, written to `bilerp.bmp`. Each field can be
//! overridden through a `BILERP_*` environment variable.

use bilerp_transform::{DEFAULT_WORKERS, UpscaleOptions};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the run configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable did not parse
    #[error("{var}: expected a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    /// A variable parsed but is out of range
    #[error("{var}: {message}")]
    OutOfRange { var: &'static str, message: String },
}

/// Everything one run of the binary needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub src_width: u32,
    pub src_height: u32,
    pub dest_width: u32,
    pub dest_height: u32,
    pub workers: usize,
    pub output: PathBuf,
    /// `log` spec string passed to [`crate::setup_logging`]
    pub log_level: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            src_width: 3,
            src_height: 3,
            dest_width: 512,
            dest_height: 512,
            workers: DEFAULT_WORKERS,
            output: PathBuf::from("bilerp.bmp"),
            log_level: "info".to_string(),
        }
    }
}

impl RunConfig {
    /// Defaults overridden by the `BILERP_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    /// name. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = get("BILERP_SRC_WIDTH") {
            config.src_width = parse_dimension("BILERP_SRC_WIDTH", &v)?;
        }
        if let Some(v) = get("BILERP_SRC_HEIGHT") {
            config.src_height = parse_dimension("BILERP_SRC_HEIGHT", &v)?;
        }
        if let Some(v) = get("BILERP_DEST_WIDTH") {
            config.dest_width = parse_dimension("BILERP_DEST_WIDTH", &v)?;
        }
        if let Some(v) = get("BILERP_DEST_HEIGHT") {
            config.dest_height = parse_dimension("BILERP_DEST_HEIGHT", &v)?;
        }
        if let Some(v) = get("BILERP_WORKERS") {
            config.workers = parse_number("BILERP_WORKERS", &v)?;
            if config.workers == 0 {
                return Err(ConfigError::OutOfRange {
                    var: "BILERP_WORKERS",
                    message: "worker pool size must be at least 1".to_string(),
                });
            }
        }
        if let Some(v) = get("BILERP_OUTPUT") {
            config.output = PathBuf::from(v);
        }
        if let Some(v) = get("BILERP_LOG") {
            config.log_level = v;
        }

        Ok(config)
    }

    /// Options for the upscale call.
    pub fn upscale_options(&self) -> UpscaleOptions {
        UpscaleOptions::with_workers(self.workers)
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}

fn parse_dimension(var: &'static str, value: &str) -> Result<u32, ConfigError> {
    let n: u32 = parse_number(var, value)?;
    if n == 0 {
        return Err(ConfigError::OutOfRange {
            var,
            message: "dimension must be at least 1".to_string(),
        });
    }
    Ok(n)
}
