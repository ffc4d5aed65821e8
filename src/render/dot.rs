//! Graph descriptions and their DOT serialization.
//!
//! A [`GraphDescription`] is a plain value: the full list of nodes and edges
//! for one graph, built in one pass from a model and handed whole to the
//! rasterizer.

use std::collections::HashSet;
use std::fmt::Write;

use crate::graph::DependencyGraph;
use crate::structure::{ProjectTree, ROOT_LABEL};

/// Node identifier used for the project root in the directory graph.
pub const ROOT_NODE_ID: &str = ".";

/// Shape hint for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// Graphviz default shape, used for roles.
    Plain,
    /// Directories.
    Folder,
    /// Files.
    Note,
}

impl NodeShape {
    /// The DOT `shape` attribute value, `None` for the default shape.
    pub fn dot_shape(&self) -> Option<&'static str> {
        match self {
            NodeShape::Plain => None,
            NodeShape::Folder => Some("folder"),
            NodeShape::Note => Some("note"),
        }
    }
}

/// A node with a unique identifier and a display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
}

/// A directed edge between two node identifiers.
///
/// Endpoints without a matching [`NodeSpec`] are created implicitly by the
/// layout program with the default shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
}

/// Complete node and edge lists for one graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphDescription {
    pub name: String,
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
}

impl GraphDescription {
    /// Describes the containment graph of a project tree.
    ///
    /// Node identifiers are paths relative to the project root, so a file
    /// named `main.yml` in two directories yields two nodes, while the root's
    /// `roles` subdirectory and the scanned `roles` entry share one.
    pub fn from_project_tree(name: &str, tree: &ProjectTree) -> Self {
        let mut builder = DescriptionBuilder::new(name);

        for (label, entry) in tree.iter() {
            let id = directory_id(label);
            builder.node(&id, label, NodeShape::Folder);

            for subdirectory in &entry.subdirectories {
                let child = child_id(&id, subdirectory);
                builder.node(&child, subdirectory, NodeShape::Folder);
                builder.edge(&id, &child);
            }
            for file in &entry.files {
                let child = child_id(&id, file);
                builder.node(&child, file, NodeShape::Note);
                builder.edge(&id, &child);
            }
        }

        builder.finish()
    }

    /// Describes the role dependency graph: one node per role, one edge per
    /// declared dependency.
    pub fn from_dependency_graph(name: &str, graph: &DependencyGraph) -> Self {
        let mut builder = DescriptionBuilder::new(name);

        for (role, deps) in graph.iter() {
            builder.node(role, role, NodeShape::Plain);
            for dep in deps {
                builder.edge(role, dep);
            }
        }

        builder.finish()
    }

    /// Looks up a node by identifier.
    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Returns true if an edge `from -> to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.iter().any(|e| e.from == from && e.to == to)
    }

    /// Serializes the description as a DOT digraph.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ansible_graph::graph::DependencyGraph;
    /// use ansible_graph::render::GraphDescription;
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.add_dependency("web", "common");
    ///
    /// let dot = GraphDescription::from_dependency_graph("roles", &graph).to_dot();
    /// assert!(dot.starts_with("digraph \"roles\" {"));
    /// assert!(dot.contains("\"web\" -> \"common\";"));
    /// ```
    pub fn to_dot(&self) -> String {
        let mut output = String::with_capacity(64 * (self.nodes.len() + self.edges.len() + 1));
        let _ = writeln!(output, "digraph \"{}\" {{", escape_id(&self.name));

        for node in &self.nodes {
            let _ = write!(
                output,
                "  \"{}\" [label=\"{}\"",
                escape_id(&node.id),
                escape_id(&node.label)
            );
            if let Some(shape) = node.shape.dot_shape() {
                let _ = write!(output, ", shape={}", shape);
            }
            output.push_str("];\n");
        }

        for edge in &self.edges {
            let _ = writeln!(
                output,
                "  \"{}\" -> \"{}\";",
                escape_id(&edge.from),
                escape_id(&edge.to)
            );
        }

        output.push_str("}\n");
        output
    }
}

/// Accumulates nodes (deduplicated by identifier) and edges for one
/// description. Lives only for the duration of a single `from_*` call.
struct DescriptionBuilder {
    name: String,
    seen: HashSet<String>,
    nodes: Vec<NodeSpec>,
    edges: Vec<EdgeSpec>,
}

impl DescriptionBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            seen: HashSet::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    fn node(&mut self, id: &str, label: &str, shape: NodeShape) {
        if self.seen.insert(id.to_string()) {
            self.nodes.push(NodeSpec {
                id: id.to_string(),
                label: label.to_string(),
                shape,
            });
        }
    }

    fn edge(&mut self, from: &str, to: &str) {
        self.edges.push(EdgeSpec {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    fn finish(self) -> GraphDescription {
        GraphDescription {
            name: self.name,
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

fn directory_id(label: &str) -> String {
    if label == ROOT_LABEL {
        ROOT_NODE_ID.to_string()
    } else {
        label.to_string()
    }
}

fn child_id(parent: &str, child: &str) -> String {
    if parent == ROOT_NODE_ID {
        child.to_string()
    } else {
        format!("{}/{}", parent, child)
    }
}

/// Escapes a string for use inside a double-quoted DOT identifier.
pub fn escape_id(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
