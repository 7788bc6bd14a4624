//! Scan Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A scan error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading the next code point failed for a reason other than reaching
    /// the end of the stream.
    #[display("failed to read from {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    /// The target letter would match every exhausted file.
    #[display("target letter {_0:?} is reserved for exhausted files")]
    SentinelTarget(#[error(not(source))] char),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A failed read leaves the cursor in an unknown position; the whole
        // scan has to start again from fresh readers.
        false
    }
}
