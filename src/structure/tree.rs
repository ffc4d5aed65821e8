//! Project tree: the root directory plus the included first-level
//! subdirectories, each scanned one level deep.

use std::path::Path;

use tracing::{debug, info, warn};

use super::scanner::{scan, DirectoryEntry};
use crate::error::{Result, ValidationError};

/// Label reserved for the project root directory.
pub const ROOT_LABEL: &str = "root";

/// Scanned directories of a project, keyed by label.
///
/// The root entry is always present and always first; the remaining
/// entries follow in the order they were included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTree {
    entries: Vec<(String, DirectoryEntry)>,
}

impl ProjectTree {
    /// Creates a tree holding only the root entry.
    pub fn new(root: DirectoryEntry) -> Self {
        Self {
            entries: vec![(ROOT_LABEL.to_string(), root)],
        }
    }

    /// Adds a subdirectory entry.
    ///
    /// The reserved `root` label and labels already present are ignored, so
    /// every label appears once and the root entry is never replaced.
    pub fn with_directory(mut self, label: impl Into<String>, entry: DirectoryEntry) -> Self {
        let label = label.into();
        if label == ROOT_LABEL {
            warn!("Include '{}' collides with the project root label, skipped", label);
        } else if self.get(&label).is_none() {
            self.entries.push((label, entry));
        }
        self
    }

    /// Scans `project_root` and every name in `include` that is one of its
    /// subdirectories.
    ///
    /// Included names that are not subdirectories of the root (missing, a
    /// file, or excluded) are skipped without error.
    ///
    /// # Errors
    ///
    /// A [`ValidationError`] if `include` or `exclude` is empty, and the
    /// scanner's errors if a directory cannot be read.
    pub fn build(project_root: &Path, include: &[String], exclude: &[String]) -> Result<Self> {
        info!("Read Ansible directory structure");

        if include.is_empty() {
            return Err(ValidationError::EmptyInclude.into());
        }
        if exclude.is_empty() {
            return Err(ValidationError::EmptyExclude.into());
        }

        let mut tree = Self::new(scan(project_root, exclude)?);

        for name in include {
            if !tree.root().has_subdirectory(name) {
                debug!("Included directory '{}' not found under root", name);
                continue;
            }
            if name == ROOT_LABEL {
                warn!("Include '{}' collides with the project root label, skipped", name);
                continue;
            }
            if tree.contains(name) {
                continue;
            }
            let entry = scan(&project_root.join(name), exclude)?;
            tree = tree.with_directory(name.as_str(), entry);
        }

        Ok(tree)
    }

    /// The project root entry.
    pub fn root(&self) -> &DirectoryEntry {
        &self.entries[0].1
    }

    /// Looks up an entry by label.
    pub fn get(&self, label: &str) -> Option<&DirectoryEntry> {
        self.entries
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Labels in report order, root first.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    /// Entries in report order, root first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DirectoryEntry)> {
        self.entries
            .iter()
            .map(|(label, entry)| (label.as_str(), entry))
    }

    /// Entries other than the root, in include order.
    pub fn subdirectories(&self) -> impl Iterator<Item = (&str, &DirectoryEntry)> {
        self.iter().skip(1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
