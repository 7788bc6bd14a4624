//! Library Error Types
//!
//! Errors from the lower crates are re-raised into one of these kinds, so
//! the error tree records which phase of the run failed.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The file listing could not be retrieved.
    #[display("could not list files")]
    Catalog,
    /// An eligible file could not be inspected or opened for scanning.
    #[display("could not open {} for scanning", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// Reading files during the scan failed.
    #[display("scan failed")]
    Scan,
    /// Copying a matched file to the destination failed.
    #[display("could not fetch {}", _0.display())]
    Fetch(#[error(not(source))] PathBuf),
    /// The destination path is the source file itself; copying would
    /// truncate it before it is read.
    #[display("refusing to copy {} onto itself", _0.display())]
    SameFile(#[error(not(source))] PathBuf),
    /// A phase's unit of work panicked or was cancelled.
    #[display("background task failed")]
    Task,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A listing request may fail transiently; everything else is
        // local and would fail the same way again.
        matches!(self, Self::Catalog)
    }
}
