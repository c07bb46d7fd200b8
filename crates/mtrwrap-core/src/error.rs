use crate::result::TraceResult;
use std::io;
use thiserror::Error;

/// A wrapper error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A wrapper error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid target: {0:?} is not an IPv4 or IPv6 address")]
    InvalidTarget(String),
    #[error("failed to run probe: {0}")]
    SpawnFailed(#[source] io::Error),
    #[error("failed to capture probe output: {0}")]
    CaptureFailed(#[source] io::Error),
    #[error("probe failed with exit code {}: {}", .0.code, .0.results.raw().trim_end())]
    ProbeFailed(Box<TraceResult>),
    #[error("invalid config: {0}")]
    BadConfig(String),
}

impl Error {
    /// The result of the failed trace, if the probe ran but did not succeed.
    #[must_use]
    pub fn trace_result(&self) -> Option<&TraceResult> {
        match self {
            Self::ProbeFailed(result) => Some(result),
            _ => None,
        }
    }
}
