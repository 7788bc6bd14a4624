//! Metadata returned by storage backends when an entry is stat'ed.

use std::path::PathBuf;

/// What kind of filesystem entry a path names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// Entry metadata returned by storage backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Relative path from storage root
    pub path: PathBuf,
    /// Size in bytes (zero for directories)
    pub size: u64,
    pub kind: EntryKind,
}
impl FileInfo {
    pub fn file(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            kind: EntryKind::File,
        }
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: 0,
            kind: EntryKind::Directory,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}
