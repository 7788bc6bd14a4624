//! Orchestration: list, prepare, scan, fetch.
//!
//! [`run`] drives a [`Job`] through its phases and reports progress as a
//! stream of [`RunEvent`]s. The pieces are public for callers that want to
//! drive the phases themselves.

pub mod error;
mod fetch;
mod prepare;
mod run;

pub use crate::fetch::{Fetched, fetch_file};
pub use crate::prepare::{Prepared, Skip, SourceScanSet, prepare};
pub use crate::run::{Job, RunEvent, run};
