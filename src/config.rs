//! Configuration file loading.
//!
//! ```toml
//! [global]
//! title = "Infrastructure"
//! company = "Example Corp"
//!
//! [structure]
//! include = ["group_vars", "host_vars", "roles"]
//! exclude = ".git, .venv"
//!
//! [graph]
//! location = "report"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::error::{Error, Result, ValidationError};
use crate::report::ReportMeta;

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    pub structure: StructureConfig,
    pub graph: GraphConfig,
}

/// Report header values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub title: String,
    pub company: String,
}

/// Directory names to scan and to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    #[serde(deserialize_with = "string_list")]
    pub include: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub exclude: Vec<String>,
}

/// Where graph sources and images are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub location: String,
}

impl Config {
    /// Reads and validates the configuration at `path`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] or [`Error::PermissionDenied`] if the file cannot
    /// be read, [`Error::Config`] if it is not valid TOML, and a
    /// [`ValidationError`] if a required value is empty.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Read configuration file {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| Error::from_io(path, e))?;
        let config = Self::from_toml(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        debug!("Configuration {:?}", config);
        Ok(config)
    }

    /// Parses configuration text without validating it.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Checks that every value the pipeline needs is present.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.global.title.trim().is_empty() {
            return Err(ValidationError::MissingValue("global.title"));
        }
        if self.global.company.trim().is_empty() {
            return Err(ValidationError::MissingValue("global.company"));
        }
        if self.graph.location.trim().is_empty() {
            return Err(ValidationError::MissingValue("graph.location"));
        }
        if self.structure.include.is_empty() {
            return Err(ValidationError::EmptyInclude);
        }
        if self.structure.exclude.is_empty() {
            return Err(ValidationError::EmptyExclude);
        }
        Ok(())
    }

    /// Graph output directory, relative to the working directory unless absolute.
    pub fn location(&self) -> PathBuf {
        PathBuf::from(self.graph.location.trim())
    }

    /// Report header with title and company filled in.
    pub fn report_meta(&self) -> ReportMeta {
        ReportMeta::new(self.global.title.trim(), self.global.company.trim())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringList {
    List(Vec<String>),
    Joined(String),
}

/// Accepts `["a", "b"]` or `"a, b"`; entries are trimmed and empty ones dropped.
fn string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match StringList::deserialize(deserializer)? {
        StringList::List(items) => items,
        StringList::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };

    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}
