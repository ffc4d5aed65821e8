//! Project structure scanning.
//!
//! [`scan`] reads a single directory; [`ProjectTree::build`] applies it to the
//! project root and to the configured first-level subdirectories.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use ansible_graph::structure::ProjectTree;
//!
//! let include = vec!["group_vars".to_string(), "roles".to_string()];
//! let exclude = vec![".git".to_string()];
//! let tree = ProjectTree::build(Path::new("."), &include, &exclude).unwrap();
//!
//! for (label, entry) in tree.iter() {
//!     println!("{}: {} files", label, entry.files.len());
//! }
//! ```

pub mod scanner;
pub mod tree;

pub use scanner::{scan, DirectoryEntry};
pub use tree::{ProjectTree, ROOT_LABEL};
