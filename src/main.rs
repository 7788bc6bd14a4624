//! lockstep: scan the files a server lists, one column at a time, and fetch
//! the ones holding the target letter in the earliest column that has it.

mod error;

use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use futures::TryStreamExt;
use lockstep_catalog::{CatalogHandle, HttpCatalog, StaticCatalog};
use lockstep_config::{Config, Overrides};
use lockstep_library::{Job, RunEvent, run};
use lockstep_scan::MatchFinder;
use lockstep_storage::backend::LocalBackend;
use lockstep_storage::Eligibility;
use std::path::PathBuf;
use std::pin::pin;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";
const VERBOSE_LOG_FILTER: &str =
    "warn,lockstep=debug,lockstep_catalog=debug,lockstep_library=debug,lockstep_scan=debug,lockstep_storage=debug";

#[derive(Parser)]
#[command(name = "lockstep", version)]
#[command(about = "Fetch the listed files that hold a letter in the earliest column")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page listing the files to scan
    #[arg(long)]
    listing_url: Option<String>,

    /// Directory the listed files are relative to
    #[arg(long)]
    source_root: Option<PathBuf>,

    /// Directory matched files are copied into
    #[arg(long)]
    destination: Option<PathBuf>,

    /// Letter to look for
    #[arg(short, long)]
    target: Option<char>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scan these files instead of fetching the listing
    files: Vec<String>,
}
impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            listing_url: self.listing_url.clone(),
            source_root: self.source_root.clone(),
            destination: self.destination.clone(),
            target: self.target,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        true => EnvFilter::new(VERBOSE_LOG_FILTER),
        false => EnvFilter::new(DEFAULT_LOG_FILTER),
    });
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn describe(files: &[PathBuf]) -> String {
    files.iter().map(|path| path.display().to_string()).collect::<Vec<_>>().join(", ")
}

async fn execute(cli: Cli) -> Result<()> {
    let working_dir = std::env::current_dir().or_raise(|| ErrorKind::WorkingDirectory)?;
    let config = Config::load(cli.config.as_deref(), &cli.overrides())
        .and_then(|config| config.resolve(&working_dir))
        .or_raise(|| ErrorKind::Config)?;
    tracing::debug!(?config, "Loaded configuration");

    let catalog: CatalogHandle = match cli.files.is_empty() {
        true => Arc::new(HttpCatalog::new(&config.listing_url)),
        false => Arc::new(StaticCatalog::new(cli.files)),
    };
    // A mistyped source root must not leave an empty directory behind;
    // the destination is created on demand.
    let source = LocalBackend::new("source", &config.source_root).or_raise(|| ErrorKind::Storage)?;
    let destination = LocalBackend::create("destination", &config.destination).or_raise(|| ErrorKind::Storage)?;
    let job = Job {
        catalog,
        source: Arc::new(source),
        destination: Arc::new(destination),
        eligibility: Eligibility::new(&config.source_extensions),
        finder: MatchFinder::new(config.target).or_raise(|| ErrorKind::Config)?,
    };

    let mut events = pin!(run(job));
    while let Some(event) = events.try_next().await.or_raise(|| ErrorKind::Run)? {
        match event {
            RunEvent::Started => println!("Starting..."),
            RunEvent::Catalogued { source, entries } => tracing::info!(source = %source, entries, "Listed files"),
            RunEvent::Prepared { eligible, skipped } => tracing::info!(eligible, skipped, "Opened files for scanning"),
            RunEvent::Matched { column, files } => {
                println!("Found '{}' in column {column}: {}", config.target, describe(&files));
            },
            RunEvent::NoMatch { .. } => println!("Could not find any {} in any of the files", config.target),
            RunEvent::Fetched(fetched) => println!("Bytes Written: {}", fetched.bytes),
            RunEvent::Finished => println!("Finished!"),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}
