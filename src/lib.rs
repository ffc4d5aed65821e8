//! ansible-graph - directory and role dependency graphs for Ansible projects
//!
//! This crate scans an Ansible project into two models, a [`ProjectTree`] of
//! the root and its included first-level directories and a
//! [`DependencyGraph`] of role dependencies, renders each as a Graphviz image
//! and combines both into a plain text or XML report.
//!
//! [`ProjectTree`]: structure::ProjectTree
//! [`DependencyGraph`]: graph::DependencyGraph

pub mod config;
pub mod error;
pub mod graph;
pub mod parser;
pub mod render;
pub mod report;
pub mod runner;
pub mod structure;

pub use error::{Error, Result, ValidationError};
