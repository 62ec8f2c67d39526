//! Error kinds and how they propagate.
//!
//! Initialisation failures bubble up to the driver, which logs them as a
//! critical error and exits with -1. Per-run failures are logged and the
//! driver moves on to the next run. Everything else is a log line gated by
//! the configured verbosity; errors never cross thread boundaries as panics.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal setup failures; the process cannot continue without its tables.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("data file not found: {}", .0.display())]
    MissingDataFile(PathBuf),
    #[error("failed reading data file: {0}")]
    Io(#[from] io::Error),
}

/// A single run failed; later runs are unaffected.
#[derive(Error, Debug)]
pub enum SolveError {
    #[error("no solution found within {budget} positions")]
    NoSolution { budget: u64 },
}
