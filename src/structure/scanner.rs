//! Single-directory scanner.
//!
//! Lists the direct children of one directory, drops excluded names and
//! sorts what is left into files and subdirectories.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Files and subdirectories found directly inside one directory.
///
/// Names are bare (relative to the scanned directory) and sorted by file
/// name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Regular files, after following symlinks.
    pub files: Vec<String>,
    /// Directories, after following symlinks.
    pub subdirectories: Vec<String>,
}

impl DirectoryEntry {
    /// Creates an entry from explicit name lists.
    pub fn new<F, D>(files: F, subdirectories: D) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            subdirectories: subdirectories.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if a subdirectory with this exact name was found.
    pub fn has_subdirectory(&self, name: &str) -> bool {
        self.subdirectories.iter().any(|d| d == name)
    }

    /// Returns true if a file with this exact name was found.
    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }

    /// Total number of children.
    pub fn len(&self) -> usize {
        self.files.len() + self.subdirectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.subdirectories.is_empty()
    }
}

/// Scans the direct children of `directory`.
///
/// Children whose bare name appears in `exclude` are skipped (exact match,
/// no globbing). Symlinks are classified by their target; anything that is
/// neither a file nor a directory, including dangling links, is left out.
///
/// # Errors
///
/// [`Error::NotFound`] if `directory` is missing or not a directory,
/// [`Error::PermissionDenied`] if it cannot be read.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use ansible_graph::structure::scan;
///
/// let entry = scan(Path::new("."), &[".git".to_string()]).unwrap();
/// println!("{} files", entry.files.len());
/// ```
pub fn scan(directory: &Path, exclude: &[String]) -> Result<DirectoryEntry> {
    debug!("Read directory - {}", directory.display());

    let metadata = fs::metadata(directory).map_err(|e| Error::from_io(directory, e))?;
    if !metadata.is_dir() {
        return Err(Error::NotFound {
            path: directory.to_path_buf(),
        });
    }

    let mut entry = DirectoryEntry::default();
    let walker = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for item in walker {
        let item = match item {
            Ok(item) => item,
            Err(err) if err.depth() == 0 => {
                return Err(match err.into_io_error() {
                    Some(source) => Error::from_io(directory, source),
                    None => Error::NotFound {
                        path: directory.to_path_buf(),
                    },
                });
            }
            Err(err) => {
                debug!("Skipping unreadable entry: {}", err);
                continue;
            }
        };

        let name = item.file_name().to_string_lossy().into_owned();
        if exclude.contains(&name) {
            continue;
        }

        let file_type = if item.path_is_symlink() {
            match fs::metadata(item.path()) {
                Ok(target) => target.file_type(),
                Err(_) => {
                    debug!("Skipping dangling link - {}", item.path().display());
                    continue;
                }
            }
        } else {
            item.file_type()
        };

        if file_type.is_file() {
            entry.files.push(name);
        } else if file_type.is_dir() {
            entry.subdirectories.push(name);
        }
    }

    Ok(entry)
}
