//! Catalog Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The listing endpoint could not be reached, or answered with a
    /// non-success status.
    #[display("listing request to {_0} failed")]
    Request(#[error(not(source))] String),
    /// The listing response body could not be read.
    #[display("listing response from {_0} was unreadable")]
    Body(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Body(_))
    }
}
