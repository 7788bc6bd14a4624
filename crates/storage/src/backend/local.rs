//! Local filesystem storage backend.
//!
//! Files live under a configured root directory and are accessed via
//! `tokio::fs`. Readers and writers handed out are the synchronous `std`
//! handles underneath, buffered.

use crate::backend::{BoxSyncRead, BoxSyncWrite};
use crate::error::ErrorKind;
use crate::{FileInfo, StorageBackend, error::Result, path::validate as validate_path};
use async_trait::async_trait;
use std::fs::Metadata;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage backend.
///
/// # Examples
///
/// ```no_run
/// use lockstep_storage::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("source", "/srv/files")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct LocalBackend {
    name: String,
    root: PathBuf,
}
impl LocalBackend {
    /// Open a backend rooted at an existing absolute directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, does not exist, or
    /// names a file.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = Self::absolute_root(root.as_ref())?;
        match std::fs::metadata(&root) {
            Ok(metadata) if metadata.is_dir() => Ok(Self { name: name.into(), root }),
            Ok(_) => exn::bail!(ErrorKind::InvalidPath(root)),
            Err(e) => exn::bail!(Self::io_error(e, &root)),
        }
    }

    /// Like [`new`](Self::new), but creates the root directory if it does
    /// not exist yet. Meant for destinations.
    pub fn create(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = Self::absolute_root(root.as_ref())?;
        if !root.exists() {
            // Only happens once at start-up, not worth an async constructor.
            std::fs::create_dir_all(&root).map_err(|e| Self::io_error(e, &root))?;
            tracing::debug!(root = %root.display(), "Created storage root");
        }
        Self::new(name, root)
    }

    fn absolute_root(root: &Path) -> Result<PathBuf> {
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root.to_path_buf()));
        }
        Ok(root.to_path_buf())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    fn file_info(path: &Path, metadata: Metadata) -> FileInfo {
        match metadata.is_dir() {
            true => FileInfo::directory(path),
            false => FileInfo::file(path, metadata.len()),
        }
    }

    fn io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }

    async fn create_parent(full: &Path, path: &Path) -> Result<()> {
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await.map_err(|e| Self::io_error(e, path))?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stat(&self, path: &Path) -> Result<FileInfo> {
        let full = self.resolve(path)?;
        let metadata = fs::metadata(&full).await.map_err(|e| Self::io_error(e, path))?;
        Ok(Self::file_info(&validate_path(path)?, metadata))
    }

    async fn reader(&self, path: &Path) -> Result<BoxSyncRead> {
        let full = self.resolve(path)?;
        let file = fs::File::open(&full).await.map_err(|e| Self::io_error(e, path))?;
        tracing::trace!(backend = %self.name, path = %path.display(), "Opened reader");
        Ok(Box::new(BufReader::new(file.into_std().await)))
    }

    async fn writer(&self, path: &Path) -> Result<BoxSyncWrite> {
        let full = self.resolve(path)?;
        Self::create_parent(&full, path).await?;
        let file = fs::File::create(&full).await.map_err(|e| Self::io_error(e, path))?;
        tracing::trace!(backend = %self.name, path = %path.display(), "Opened writer");
        Ok(Box::new(BufWriter::new(file.into_std().await)))
    }

    /// The parent directory is canonicalised so that roots reached through
    /// `..` or symlinks compare equal; the file itself need not exist.
    async fn locate(&self, path: &Path) -> Option<PathBuf> {
        let full = self.resolve(path).ok()?;
        let parent = fs::canonicalize(full.parent()?).await.ok()?;
        Some(parent.join(full.file_name()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    fn setup() -> (tempfile::TempDir, LocalBackend) {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("test", temp_dir.path()).unwrap();
        (temp_dir, backend)
    }

    #[test]
    fn test_new_requires_absolute_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(LocalBackend::new("name", temp_dir.path()).is_ok());
        assert!(LocalBackend::new("name", "relative/path").is_err());
        assert!(LocalBackend::new("name", "./relative").is_err());
    }

    #[test]
    fn test_new_rejects_file_root() {
        let (dir, _backend) = setup();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();
        let err = LocalBackend::new("name", &file).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }

    #[test]
    fn test_new_leaves_missing_root_alone() {
        let (dir, _backend) = setup();
        let root = dir.path().join("typo");
        let err = LocalBackend::new("name", &root).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
        assert!(!root.exists());
    }

    #[test]
    fn test_create_makes_missing_root() {
        let (dir, _backend) = setup();
        let root = dir.path().join("downloads/today");
        LocalBackend::create("name", &root).unwrap();
        assert!(root.is_dir());
        assert!(LocalBackend::create("name", "relative").is_err());
    }

    #[tokio::test]
    async fn test_stat_file_and_directory() {
        let (dir, backend) = setup();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        std::fs::write(dir.path().join("empty.txt"), b"").unwrap();

        let info = backend.stat(Path::new("a.txt")).await.unwrap();
        assert_eq!(info.path, PathBuf::from("a.txt"));
        assert_eq!(info.size, 5);
        assert!(!info.is_dir());

        // Listing entries for directories carry a trailing slash.
        let info = backend.stat(Path::new("sub/")).await.unwrap();
        assert_eq!(info.path, PathBuf::from("sub"));
        assert!(info.is_dir());

        assert!(backend.stat(Path::new("empty.txt")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stat_not_found() {
        let (_dir, backend) = setup();
        let err = backend.stat(Path::new("missing.txt")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reader_streams_contents() {
        let (dir, backend) = setup();
        std::fs::write(dir.path().join("a.txt"), "AbĀ").unwrap();
        let mut reader = backend.reader(Path::new("a.txt")).await.unwrap();
        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        assert_eq!(text, "AbĀ");
    }

    #[tokio::test]
    async fn test_reader_not_found() {
        let (_dir, backend) = setup();
        let Err(err) = backend.reader(Path::new("missing.txt")).await else {
            panic!("expected error");
        };
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_writer_creates_directories() {
        let (dir, backend) = setup();
        let mut writer = backend.writer(Path::new("a/b/copy.txt")).await.unwrap();
        writer.write_all(b"copied").unwrap();
        writer.flush().unwrap();
        drop(writer);
        assert_eq!(std::fs::read(dir.path().join("a/b/copy.txt")).unwrap(), b"copied");
    }

    #[tokio::test]
    async fn test_locate_sees_through_roots() {
        let (dir, backend) = setup();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let nested = LocalBackend::new("nested", dir.path().join("sub")).unwrap();
        let detour = LocalBackend::new("detour", dir.path().join("sub/..")).unwrap();

        let direct = backend.locate(Path::new("sub/x.txt")).await.unwrap();
        assert_eq!(nested.locate(Path::new("x.txt")).await, Some(direct.clone()));
        assert_eq!(detour.locate(Path::new("sub/x.txt")).await, Some(direct));
        assert_ne!(backend.locate(Path::new("x.txt")).await, nested.locate(Path::new("x.txt")).await);
        assert_eq!(backend.locate(Path::new("../escape")).await, None);
    }

    #[tokio::test]
    async fn test_path_security() {
        let (_dir, backend) = setup();
        assert!(backend.reader(Path::new("../etc/passwd")).await.is_err());
        assert!(backend.stat(Path::new("etc/../../passwd")).await.is_err());
        assert!(backend.writer(Path::new("../../escape")).await.is_err());
    }
}
