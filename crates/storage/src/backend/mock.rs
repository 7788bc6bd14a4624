//! In-memory storage backend for testing.

use crate::backend::{BoxSyncRead, BoxSyncWrite};
use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use crate::{FileInfo, StorageBackend};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Clone, Debug)]
enum Entry {
    File(Vec<u8>),
    Directory,
}

type Storage = Arc<RwLock<HashMap<PathBuf, Entry>>>;

/// In-memory storage backend for testing.
///
/// Entries are stored in a `HashMap` behind a [`RwLock`]. The lock is a
/// `std` one because writers handed out by [`writer`](StorageBackend::writer)
/// commit from synchronous code; it is never held across an `.await`.
///
/// # Examples
///
/// ```
/// use lockstep_storage::backend::{MockBackend, StorageBackend};
/// use std::path::Path;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MockBackend::with_files([("a.txt", "BA")]).with_directories(["sub"]);
/// assert_eq!(backend.stat(Path::new("a.txt")).await?.size, 2);
/// assert!(backend.stat(Path::new("sub/")).await?.is_dir());
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    name: String,
    storage: Storage,
}

impl MockBackend {
    /// Create a mock backend pre-populated with files.
    ///
    /// Panics if any path fails validation. If test setup is wrong, then
    /// the test should not pass.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let backend = Self {
            name: "mock".to_string(),
            storage: Arc::default(),
        };
        for (path, data) in files {
            backend.insert(path.into(), Entry::File(data.into()));
        }
        backend
    }

    /// Add empty directories.
    pub fn with_directories(self, directories: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        for path in directories {
            self.insert(path.into(), Entry::Directory);
        }
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn insert(&self, path: PathBuf, entry: Entry) {
        let Ok(validated) = validate_path(&path) else {
            panic!("MockBackend: invalid path {}", path.display());
        };
        self.storage
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(validated, entry);
    }

    fn get(&self, path: &Path) -> Result<(PathBuf, Entry)> {
        let path = validate_path(path)?;
        let guard = self.storage.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = guard.get(&path).cloned().ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path.clone())))?;
        Ok((path, entry))
    }

    fn get_file(&self, path: &Path) -> Result<Vec<u8>> {
        match self.get(path)? {
            (_, Entry::File(data)) => Ok(data),
            (path, Entry::Directory) => exn::bail!(ErrorKind::BackendError(format!("{} is a directory", path.display()))),
        }
    }

    /// Committed contents of a file, for assertions.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.get_file(path.as_ref()).ok()
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let files: [(&str, &str); 0] = [];
        Self::with_files(files)
    }
}

/// Buffers everything written and only commits it to the map on `flush()`.
struct MockWriter {
    path: PathBuf,
    buffer: Vec<u8>,
    storage: Storage,
}
impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut guard = self.storage.write().map_err(|_| std::io::Error::other("mock storage poisoned"))?;
        guard.insert(self.path.clone(), Entry::File(self.buffer.clone()));
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stat(&self, path: &Path) -> Result<FileInfo> {
        Ok(match self.get(path)? {
            (path, Entry::File(data)) => FileInfo::file(path, data.len() as u64),
            (path, Entry::Directory) => FileInfo::directory(path),
        })
    }

    async fn reader(&self, path: &Path) -> Result<BoxSyncRead> {
        Ok(Box::new(Cursor::new(self.get_file(path)?)))
    }

    async fn writer(&self, path: &Path) -> Result<BoxSyncWrite> {
        let path = validate_path(path)?;
        Ok(Box::new(MockWriter {
            path,
            buffer: Vec::new(),
            storage: Arc::clone(&self.storage),
        }))
    }
}
