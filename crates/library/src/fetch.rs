use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use lockstep_storage::BackendHandle;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// A file copied from the source to the destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fetched {
    pub source: PathBuf,
    /// Relative to the destination root: the source's final path segment.
    pub destination: PathBuf,
    pub bytes: u64,
}

/// Copy one file from `source` into the root of `destination`, under its
/// final path segment, overwriting whatever is there.
///
/// The copy streams through a blocking task, so the file is never held in
/// memory as a whole. Fails before touching anything if both backends place
/// the two paths on the same file.
#[instrument(skip(source, destination), fields(path = %path.display()))]
pub async fn fetch_file(source: &BackendHandle, destination: &BackendHandle, path: &Path) -> Result<Fetched> {
    let fail = || ErrorKind::Fetch(path.to_path_buf());
    let target = path.file_name().map(PathBuf::from).ok_or_raise(fail)?;
    if let Some(location) = source.locate(path).await
        && destination.locate(&target).await.as_ref() == Some(&location)
    {
        tracing::warn!(location = %location.display(), "Source and destination are the same file");
        exn::bail!(ErrorKind::SameFile(path.to_path_buf()));
    }
    let mut reader = source.reader(path).await.or_raise(fail)?;
    let mut writer = destination.writer(&target).await.or_raise(fail)?;
    let bytes = tokio::task::spawn_blocking(move || -> std::io::Result<u64> {
        let bytes = std::io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        Ok(bytes)
    })
    .await
    .or_raise(|| ErrorKind::Task)?
    .or_raise(fail)?;
    tracing::info!(destination = %target.display(), bytes, "Fetched file");
    Ok(Fetched {
        source: path.to_path_buf(),
        destination: target,
        bytes,
    })
}
