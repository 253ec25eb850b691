//! Error taxonomy shared by every pipeline operation
//!
//! Operations that have a meaningful "nothing there" answer (`first`, `last`,
//! `min`, `max`) return `Option` instead of failing. Everything else that can go
//! wrong surfaces one of these variants at the point of violation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised by pipeline construction, access, and collaborators.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad source arity or an absent source.
    #[error("construction error: {0}")]
    Construction(String),

    /// Pulled past the end where absence is not a valid answer.
    #[error("stream exhausted")]
    Exhausted,

    /// Indexed access ran off the end of the source.
    #[error("Stream index out of range: {index}")]
    IndexOutOfRange { index: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The worker pool could not be built or a worker panicked.
    #[error("parallel execution failed: {0}")]
    Parallel(String),
}

impl PipelineError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PipelineError::InvalidArgument(msg.into())
    }
}
