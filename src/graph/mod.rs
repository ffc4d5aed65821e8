//! Graph module for role dependency modeling.
//!
//! This module provides the [`DependencyGraph`] mapping each role to the roles
//! it depends on, and [`DependencyGraph::build`] which reads it from a project.
//!
//! # Example
//!
//! ```rust
//! use ansible_graph::graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_dependency("web", "common");
//! graph.add_dependency("web", "base");
//! graph.add_role("common");
//!
//! assert_eq!(graph.len(), 2);
//! assert_eq!(graph.edge_count(), 2);
//! assert!(!graph.has_cycles());
//! ```

pub mod builder;
mod dependency_graph;

pub use builder::DependencyScan;
pub use dependency_graph::{CycleInfo, DependencyGraph};
