//! Role dependency graph.
//!
//! Maps every role found under `roles/` to the ordered list of roles it
//! declares as dependencies, with cycle detection on top of petgraph.

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::parser::DependencyUnit;

/// Roles and their declared dependencies.
///
/// Keys are unique and iterate in sorted order. A role without dependencies
/// maps to an empty list. Dependency names are kept exactly as declared:
/// duplicates and self-references stay, and a dependency may name a role that
/// is not itself a key.
///
/// # Example
///
/// ```rust
/// use ansible_graph::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.add_dependency("web", "common");
/// graph.add_dependency("web", "base");
/// graph.add_role("base");
///
/// assert_eq!(graph.len(), 2);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.dependencies_of("web"), Some(&["common".to_string(), "base".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    roles: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a role with no dependencies. Existing roles are left untouched.
    pub fn add_role(&mut self, name: &str) {
        self.roles.entry(name.to_string()).or_default();
    }

    /// Appends `dependency` to the dependencies of `role`, adding the role
    /// if needed.
    pub fn add_dependency(&mut self, role: &str, dependency: &str) {
        self.roles
            .entry(role.to_string())
            .or_default()
            .push(dependency.to_string());
    }

    /// Adds a parsed unit, appending to any dependencies already recorded for
    /// the same role.
    pub fn insert(&mut self, unit: DependencyUnit) {
        self.roles
            .entry(unit.name)
            .or_default()
            .extend(unit.dependencies);
    }

    /// Builds a graph from parsed units.
    pub fn from_units(units: impl IntoIterator<Item = DependencyUnit>) -> Self {
        let mut graph = Self::new();
        for unit in units {
            graph.insert(unit);
        }
        graph
    }

    /// Declared dependencies of `role`, or `None` if the role is not a key.
    pub fn dependencies_of(&self, role: &str) -> Option<&[String]> {
        self.roles.get(role).map(Vec::as_slice)
    }

    /// Roles that declare `name` as a dependency, each listed once.
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        self.roles
            .iter()
            .filter(|(_, deps)| deps.iter().any(|d| d == name))
            .map(|(role, _)| role.as_str())
            .collect()
    }

    /// Role names in sorted order.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    /// Roles with their dependencies, in sorted role order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.roles
            .iter()
            .map(|(role, deps)| (role.as_str(), deps.as_slice()))
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Number of roles (keys).
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Total number of declared dependencies, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.roles.values().map(Vec::len).sum()
    }

    /// Converts to a petgraph `DiGraph`. Dependency names that are not keys
    /// become nodes of their own.
    fn digraph(&self) -> DiGraph<&str, ()> {
        let mut graph = DiGraph::with_capacity(self.roles.len(), self.edge_count());
        let mut indices: HashMap<&str, NodeIndex> = HashMap::with_capacity(self.roles.len());

        for (role, deps) in &self.roles {
            let from = *indices
                .entry(role.as_str())
                .or_insert_with(|| graph.add_node(role.as_str()));
            for dep in deps {
                let to = *indices
                    .entry(dep.as_str())
                    .or_insert_with(|| graph.add_node(dep.as_str()));
                graph.add_edge(from, to, ());
            }
        }

        graph
    }

    /// Returns true if any chain of dependencies leads back to its start.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.digraph())
    }

    /// Detects and returns all cycles in the graph.
    ///
    /// Reports one cycle per strongly connected component with more than one
    /// role, and one per role that depends on itself. Each cycle starts at the
    /// component's smallest role name and follows declared dependencies, so
    /// every role depends on the next one and the last depends on the first.
    /// When a component holds several cycles, the first one found in
    /// declaration order is reported.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ansible_graph::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.add_dependency("a", "b");
    /// graph.add_dependency("b", "c");
    /// graph.add_dependency("c", "a");
    ///
    /// let cycles = graph.detect_cycles();
    /// assert_eq!(cycles, vec![vec!["a", "b", "c"]]);
    /// ```
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let graph = self.digraph();
        let mut cycles = Vec::new();

        for scc in tarjan_scc(&graph) {
            let members: HashSet<&str> = scc
                .iter()
                .filter_map(|&idx| graph.node_weight(idx).copied())
                .collect();

            let cyclic = match scc.as_slice() {
                [idx] => graph.contains_edge(*idx, *idx),
                _ => members.len() > 1,
            };
            if !cyclic {
                continue;
            }

            if let Some(start) = members.iter().min().copied() {
                let cycle = self.cycle_through(start, &members);
                if !cycle.is_empty() {
                    cycles.push(cycle);
                }
            }
        }

        cycles.sort();
        cycles
    }

    /// Finds a dependency path from `start` back to `start` that stays inside
    /// `members`. Returns the roles on the path, `start` first.
    fn cycle_through(&self, start: &str, members: &HashSet<&str>) -> Vec<String> {
        let mut path: Vec<&str> = vec![start];
        let mut cursors: Vec<usize> = vec![0];
        let mut visited: HashSet<&str> = HashSet::from([start]);

        while let Some(&role) = path.last() {
            let depth = path.len() - 1;
            let deps = self.dependencies_of(role).unwrap_or_default();
            let Some(dep) = deps.get(cursors[depth]) else {
                path.pop();
                cursors.pop();
                continue;
            };
            cursors[depth] += 1;

            if dep == start {
                return path.iter().map(|name| name.to_string()).collect();
            }
            if members.contains(dep.as_str()) && visited.insert(dep.as_str()) {
                path.push(dep.as_str());
                cursors.push(0);
            }
        }

        Vec::new()
    }

    /// Returns the detected cycles with path formatting helpers.
    pub fn get_cycle_details(&self) -> Vec<CycleInfo> {
        self.detect_cycles()
            .into_iter()
            .map(|nodes| CycleInfo { nodes })
            .collect()
    }
}

/// Information about a detected circular dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleInfo {
    /// The role names along the cycle; each depends on the next and the last
    /// depends on the first
    pub nodes: Vec<String>,
}

impl CycleInfo {
    /// Returns a formatted string representation of the cycle path.
    ///
    /// For example: "a -> b -> c -> a"
    pub fn cycle_path(&self) -> String {
        match self.nodes.first() {
            Some(first) => format!("{} -> {}", self.nodes.join(" -> "), first),
            None => String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
