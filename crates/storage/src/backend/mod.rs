//! Storage backend trait and implementations.
//!
//! A backend is a root under which relative identifiers are resolved. The
//! scan reads from one backend (the source root the listing refers to) and
//! the fetcher writes into another (the destination directory).

mod local;
#[cfg(feature = "mock")]
mod mock;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
use crate::FileInfo;
use crate::error::Result;
use async_trait::async_trait;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub type BoxSyncRead = Box<dyn Read + Send + 'static>;
pub type BoxSyncWrite = Box<dyn Write + Send + 'static>;

/// Unified interface for storage backends.
///
/// All paths are relative to the storage root and must be validated using
/// [`validate_path`](crate::validate_path) before use. Implementations
/// enforce this validation.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use lockstep_storage::{backend::StorageBackend, error::Result};
///
/// async fn is_worth_scanning(backend: &dyn StorageBackend, path: &Path) -> Result<bool> {
///     let info = backend.stat(path).await?;
///     Ok(!info.is_dir() && info.size > 0)
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the backend, used for logging only.
    fn name(&self) -> &str;

    /// Get entry metadata without reading contents.
    ///
    /// Works for directories as well as files. Returns
    /// [`NotFound`](crate::error::ErrorKind::NotFound) if nothing exists at
    /// the path.
    async fn stat(&self, path: &Path) -> Result<FileInfo>;

    /// Open a file for streaming reads.
    ///
    /// Returns a `'static` boxed [`Read`] suitable for use inside
    /// [`spawn_blocking`](tokio::task::spawn_blocking). The async setup
    /// (opening the file) happens before returning.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// # use lockstep_storage::{backend::StorageBackend, error::Result};
    /// # async fn example(backend: &dyn StorageBackend) -> Result<()> {
    /// let mut reader = backend.reader(Path::new("notes.txt")).await?;
    /// let text = tokio::task::spawn_blocking(move || {
    ///     let mut text = String::new();
    ///     std::io::Read::read_to_string(&mut reader, &mut text).map(|_| text)
    /// }).await.unwrap().unwrap();
    /// # Ok(())
    /// # }
    /// ```
    async fn reader(&self, path: &Path) -> Result<BoxSyncRead>;

    /// Open a file for streaming writes.
    ///
    /// # Notes
    /// - Implementations create parent directories as needed.
    /// - Callers must call `flush()` before dropping so that errors are
    ///   propagated. Some backends only persist data on `flush()`.
    async fn writer(&self, path: &Path) -> Result<BoxSyncWrite>;

    /// Where `path` physically lives, if the backend can tell.
    ///
    /// Two backends returning the same location for a path refer to the same
    /// underlying file, so writing through one truncates what the other
    /// reads. The entry itself need not exist yet. Backends without a shared
    /// physical namespace return `None`.
    async fn locate(&self, _path: &Path) -> Option<PathBuf> {
        None
    }
}
