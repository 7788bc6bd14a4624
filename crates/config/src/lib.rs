//! Configuration loading for lockstep.
//!
//! Values are layered with [`figment`], lowest priority first:
//!
//! 1. built-in defaults,
//! 2. a configuration file (an explicit path, or `config.toml` in the
//!    user's configuration directory when it exists),
//! 3. `LOCKSTEP_*` environment variables,
//! 4. command-line [`Overrides`].
//!
//! The loaded [`Config`] still holds paths as written; [`Config::resolve`]
//! anchors them to a working directory and checks the values make sense.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "LOCKSTEP_";
/// Stands in for exhausted files during a scan, so it can't be the target.
pub const RESERVED_TARGET: char = '-';

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page listing the files available for scanning.
    pub listing_url: String,
    /// Directory the listed identifiers are relative to.
    pub source_root: PathBuf,
    /// Where matched files are copied to. Defaults to the working directory.
    pub destination: Option<PathBuf>,
    /// Letter to look for.
    pub target: char,
    /// Extensions of source files, which are never scanned.
    pub source_extensions: Vec<String>,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            listing_url: "http://localhost:8080".to_string(),
            source_root: PathBuf::from(".."),
            destination: None,
            target: 'A',
            source_extensions: vec!["go".to_string()],
        }
    }
}

/// Highest-priority values, typically from command-line flags. Unset
/// fields leave lower layers untouched.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<char>,
}

/// A validated configuration with absolute paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub listing_url: String,
    pub source_root: PathBuf,
    pub destination: PathBuf,
    pub target: char,
    pub source_extensions: Vec<String>,
}

impl Config {
    /// `config.toml` inside the platform configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "lockstep").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn file_provider(figment: Figment, path: &Path) -> Figment {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => figment.merge(Toml::file(path)),
        }
    }

    /// Build the layered [`Figment`] without extracting it.
    pub fn figment(file: Option<&Path>, overrides: &Overrides) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        let file = file.map(Path::to_path_buf).or_else(Self::default_path);
        if let Some(path) = file.as_deref() {
            tracing::debug!(path = %path.display(), "Layering configuration file");
            figment = Self::file_provider(figment, path);
        }
        figment.merge(Env::prefixed(ENV_PREFIX)).merge(Serialized::defaults(overrides))
    }

    /// Load configuration from every layer.
    ///
    /// An explicitly requested file must exist; the default file is
    /// optional.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        if let Some(path) = file
            && !path.is_file()
        {
            exn::bail!(ErrorKind::MissingFile(path.to_path_buf()));
        }
        Self::figment(file, overrides).extract().or_raise(|| ErrorKind::Load)
    }

    /// Anchor relative paths to `working_dir` and validate values.
    pub fn resolve(self, working_dir: &Path) -> Result<Resolved> {
        if self.target == RESERVED_TARGET {
            exn::bail!(ErrorKind::Invalid(format!("target letter cannot be '{RESERVED_TARGET}'")));
        }
        if self.listing_url.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("listing URL is empty".to_string()));
        }
        let anchor = |path: PathBuf| match path.is_absolute() {
            true => path,
            false => working_dir.join(path),
        };
        Ok(Resolved {
            listing_url: self.listing_url,
            source_root: anchor(self.source_root),
            destination: self.destination.map(anchor).unwrap_or_else(|| working_dir.to_path_buf()),
            target: self.target,
            source_extensions: self.source_extensions,
        })
    }
}
