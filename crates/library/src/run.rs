use crate::error::{ErrorKind, Result};
use crate::fetch::{Fetched, fetch_file};
use crate::prepare::prepare;
use async_stream::try_stream;
use exn::ResultExt;
use futures::Stream;
use lockstep_catalog::CatalogHandle;
use lockstep_scan::{MatchFinder, Outcome};
use lockstep_storage::{BackendHandle, Eligibility};
use std::path::PathBuf;

/// Everything a run needs.
pub struct Job {
    pub catalog: CatalogHandle,
    /// Root the listed identifiers are resolved under.
    pub source: BackendHandle,
    /// Where matched files are copied to.
    pub destination: BackendHandle,
    pub eligibility: Eligibility,
    pub finder: MatchFinder,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RunEvent {
    Started,
    Catalogued { source: String, entries: usize },
    Prepared { eligible: usize, skipped: usize },
    /// The earliest column holding the target letter, and the files
    /// holding it there, in listing order.
    Matched { column: usize, files: Vec<PathBuf> },
    NoMatch { columns: usize },
    Fetched(Fetched),
    Finished,
}

/// Run a job from listing to fetching, yielding progress as it goes.
///
/// Building the scan set and scanning it each run as their own task. The
/// scan set is moved into the second task only once the first has finished
/// with it, and moved back out when the scan is done, so it is never shared.
/// Any error ends the stream.
pub fn run(job: Job) -> impl Stream<Item = Result<RunEvent>> {
    let Job {
        catalog,
        source,
        destination,
        eligibility,
        finder,
    } = job;
    try_stream! {
        yield RunEvent::Started;

        let entries = catalog.list().await.or_raise(|| ErrorKind::Catalog)?;
        yield RunEvent::Catalogued { source: catalog.source().to_string(), entries: entries.len() };

        let preparing = {
            let source = source.clone();
            tokio::spawn(async move { prepare(&source, &eligibility, &entries).await })
        };
        let prepared = preparing.await.or_raise(|| ErrorKind::Task)??;
        yield RunEvent::Prepared { eligible: prepared.set.len(), skipped: prepared.skipped.len() };

        let mut set = prepared.set;
        let (set, outcome) = tokio::task::spawn_blocking(move || finder.find(&mut set).map(|outcome| (set, outcome)))
            .await
            .or_raise(|| ErrorKind::Task)?
            .or_raise(|| ErrorKind::Scan)?;
        let files = match outcome {
            Outcome::Found(found) => {
                let files = set.resolve(&found.positions);
                yield RunEvent::Matched { column: found.column, files: files.clone() };
                files
            },
            Outcome::NoMatch { columns } => {
                yield RunEvent::NoMatch { columns };
                Vec::new()
            },
        };
        // Scan complete: close every file handle before copying anything.
        drop(set);

        for path in &files {
            let fetched = fetch_file(&source, &destination, path).await?;
            yield RunEvent::Fetched(fetched);
        }
        yield RunEvent::Finished;
    }
}
