use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use lockstep_scan::{FileHandle, ScanSet};
use lockstep_storage::backend::BoxSyncRead;
use lockstep_storage::{BackendHandle, Eligibility, Verdict, validate_path};
use tracing::instrument;

/// Scan set reading straight from a storage backend.
pub type SourceScanSet = ScanSet<BoxSyncRead>;

/// Why a listed entry was left out of the scan set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Skip {
    Ineligible(Verdict),
    /// The identifier would resolve outside the source root.
    InvalidPath,
}

pub struct Prepared {
    pub set: SourceScanSet,
    pub skipped: Vec<(String, Skip)>,
}

/// Build a scan set from listed identifiers, in listing order.
///
/// Each identifier is stat'ed on the source backend; directories, source
/// files and empty files are skipped. Every remaining file is opened
/// straight away. The listing said the file exists and the stat said it is
/// non-empty, so failing to stat or open it is an environment problem and
/// ends the run.
#[instrument(skip_all, fields(backend = source.name(), entries = entries.len()))]
pub async fn prepare(source: &BackendHandle, eligibility: &Eligibility, entries: &[String]) -> Result<Prepared> {
    let mut set = ScanSet::new();
    let mut skipped = Vec::new();
    for entry in entries {
        let Ok(path) = validate_path(entry) else {
            tracing::warn!(entry = %entry, "Ignoring listed entry outside of the source root");
            skipped.push((entry.clone(), Skip::InvalidPath));
            continue;
        };
        let info = source.stat(&path).await.or_raise(|| ErrorKind::Open(path.clone()))?;
        let verdict = eligibility.verdict(&info);
        if !verdict.is_eligible() {
            tracing::debug!(path = %path.display(), ?verdict, "Skipping ineligible entry");
            skipped.push((entry.clone(), Skip::Ineligible(verdict)));
            continue;
        }
        let reader = source.reader(&path).await.or_raise(|| ErrorKind::Open(path.clone()))?;
        tracing::debug!(path = %path.display(), size = info.size, "Opened file for scanning");
        set.push(FileHandle::new(path, reader));
    }
    tracing::info!(eligible = set.len(), skipped = skipped.len(), "Prepared scan set");
    Ok(Prepared { set, skipped })
}
