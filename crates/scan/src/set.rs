use crate::column::MatchPositions;
use crate::error::{ErrorKind, Result};
use crate::reader::CodePoints;
use exn::ResultExt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// One file taking part in a scan: its identifier and a cursor over its
/// code points.
pub struct FileHandle<R> {
    id: PathBuf,
    reader: CodePoints<R>,
}

impl<R: Read> FileHandle<R> {
    pub fn new(id: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            id: id.into(),
            reader: CodePoints::new(reader),
        }
    }

    pub fn id(&self) -> &Path {
        &self.id
    }

    pub fn is_exhausted(&self) -> bool {
        self.reader.is_exhausted()
    }

    /// Advance this file's cursor by one code point.
    pub fn next_code_point(&mut self) -> Result<Option<char>> {
        self.reader.next_code_point().or_raise(|| ErrorKind::Read(self.id.clone()))
    }
}

/// Ordered, append-only collection of [`FileHandle`]s.
///
/// The index of a handle is the index of its code point in every
/// [`SearchWord`](crate::SearchWord), so handles are never removed or
/// reordered once pushed.
pub struct ScanSet<R> {
    handles: Vec<FileHandle<R>>,
}

impl<R> Default for ScanSet<R> {
    fn default() -> Self {
        Self { handles: Vec::new() }
    }
}

impl<R: Read> ScanSet<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: FileHandle<R>) {
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Identifiers in column order.
    pub fn ids(&self) -> impl Iterator<Item = &Path> {
        self.handles.iter().map(FileHandle::id)
    }

    pub(crate) fn handles_mut(&mut self) -> &mut [FileHandle<R>] {
        &mut self.handles
    }

    /// Map match positions back to file identifiers, preserving order.
    ///
    /// Positions outside the set are ignored; they can only come from a
    /// search word produced by a different set.
    pub fn resolve(&self, positions: &MatchPositions) -> Vec<PathBuf> {
        positions
            .iter()
            .filter_map(|index| self.handles.get(index))
            .map(|handle| handle.id.clone())
            .collect()
    }
}

impl<R: Read> FromIterator<FileHandle<R>> for ScanSet<R> {
    fn from_iter<I: IntoIterator<Item = FileHandle<R>>>(iter: I) -> Self {
        Self { handles: iter.into_iter().collect() }
    }
}

impl<R: Read> Extend<FileHandle<R>> for ScanSet<R> {
    fn extend<I: IntoIterator<Item = FileHandle<R>>>(&mut self, iter: I) {
        self.handles.extend(iter);
    }
}
