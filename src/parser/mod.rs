//! Parser module for role metadata.
//!
//! Each Ansible role may carry a `meta/main.yml` whose `dependencies` list
//! names the roles it depends on. Entries are either bare names or mappings
//! with a `role` key:
//!
//! ```yaml
//! dependencies:
//!   - role: common
//!     vars:
//!       ntp_server: pool.ntp.org
//!   - base
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use ansible_graph::parser::{parse_file, extract_dependencies};
//!
//! let meta = parse_file(Path::new("roles/web/meta/main.yml")).unwrap();
//! for name in extract_dependencies(&meta) {
//!     println!("web depends on {}", name);
//! }
//! ```

pub mod role_meta;
pub mod types;

// Re-export commonly used types for convenience
pub use role_meta::{extract_dependencies, is_yaml_file, parse_file, parse_str};

pub use types::{DependencyUnit, RoleDependency, RoleMeta};
