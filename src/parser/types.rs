//! Shared types for role metadata parsing.
//!
//! This module defines the structures used to represent a role's
//! `meta/main.yml` and the dependencies declared in it.

use serde_yaml::Value;
use std::fmt;

/// Represents the parts of a role metadata file used for dependency analysis.
///
/// Only `dependencies` is read; `galaxy_info` and every other key are
/// accepted and ignored.
///
/// # Example
///
/// ```
/// use ansible_graph::parser::parse_str;
///
/// let meta = parse_str("dependencies:\n  - common\n").unwrap();
/// assert_eq!(meta.dependency_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoleMeta {
    /// Roles that must run before this one.
    pub dependencies: Option<Vec<RoleDependency>>,
}

impl RoleMeta {
    /// Returns true if the metadata declares at least one dependency.
    pub fn has_dependencies(&self) -> bool {
        self.dependencies.as_ref().is_some_and(|d| !d.is_empty())
    }

    /// Returns the number of declared dependencies.
    pub fn dependency_count(&self) -> usize {
        self.dependencies.as_ref().map_or(0, |d| d.len())
    }
}

/// One element of a `dependencies` list.
///
/// Ansible accepts both a bare role name and a mapping with a `role` key
/// (plus optional `vars`, `when`, `tags` and so on). Both spell the same
/// dependency. Numbers and booleans are taken as names in their YAML
/// spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleDependency {
    /// `- role: common`
    Detailed { role: String },
    /// `- common`
    Named(String),
}

impl RoleDependency {
    /// Reads one element of a `dependencies` list.
    ///
    /// Returns `None` for elements that name no role: null, sequences, and
    /// mappings without a scalar `role` value.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Mapping(map) => map
                .get("role")
                .and_then(scalar_name)
                .map(|role| RoleDependency::Detailed { role }),
            other => scalar_name(other).map(RoleDependency::Named),
        }
    }

    /// The name of the role depended upon.
    pub fn name(&self) -> &str {
        match self {
            RoleDependency::Detailed { role } => role,
            RoleDependency::Named(name) => name,
        }
    }
}

impl fmt::Display for RoleDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn scalar_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_name(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// A role and the names of the roles it depends on, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyUnit {
    /// The role directory name under `roles/`.
    pub name: String,
    /// Declared dependency names. Duplicates and self-references are kept.
    pub dependencies: Vec<String>,
}

impl DependencyUnit {
    /// Creates a unit with no dependencies.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
        }
    }

    /// Appends the dependencies declared in `meta`.
    pub fn extend_from(&mut self, meta: &RoleMeta) {
        if let Some(ref dependencies) = meta.dependencies {
            self.dependencies
                .extend(dependencies.iter().map(|d| d.name().to_string()));
        }
    }
}

impl fmt::Display for DependencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> [{}]", self.name, self.dependencies.join(", "))
    }
}
