//! Error types shared by every stage of the pipeline.
//!
//! Builders return [`Error`] directly. Stages that tolerate partial failure
//! (role parsing, image rendering) collect or log them instead so later
//! stages can still run.

use std::io;
use std::path::{Path, PathBuf};

/// Configuration or input values rejected before any work starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No directory names were given to include.
    #[error("no include names provided")]
    EmptyInclude,

    /// No names were given to exclude.
    #[error("no exclude names provided")]
    EmptyExclude,

    /// A required configuration value is empty.
    #[error("missing value for '{0}'")]
    MissingValue(&'static str),

    /// A model handed to a renderer has no entries.
    #[error("no content provided for the {0} graph")]
    EmptyModel(&'static str),

    /// A report format name outside default, xml and json.
    #[error("report format not supported: '{0}'")]
    UnknownReportFormat(String),

    /// An image format name outside svg, png, tif, gif and jpg.
    #[error("image format not supported: '{0}'")]
    UnknownImageFormat(String),
}

/// Errors raised while building, rendering or reporting a project model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// A graph kind string that names neither graph.
    #[error("unsupported graph kind: '{0}'")]
    UnsupportedGraphKind(String),

    #[error("not found or not a directory: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed YAML in a role declaration file.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to read configuration {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The external graph program rejected the description, format or path.
    #[error("graph rendering failed: {0}")]
    Render(String),

    #[error("failed to write XML report: {0}")]
    Xml(String),

    /// A report generator call made out of sequence.
    #[error("report generator is {found}, expected {expected}")]
    State {
        expected: &'static str,
        found: &'static str,
    },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Maps an I/O failure on `path` onto the not-found/permission taxonomy.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Error::NotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => Error::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Error::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}
