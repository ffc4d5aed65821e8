//! Graph image rendering.
//!
//! A model is turned into a [`GraphDescription`], serialized as DOT and handed
//! to a [`Rasterizer`] (Graphviz by default) that writes the image.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use ansible_graph::graph::DependencyGraph;
//! use ansible_graph::render::{GraphModel, GraphRenderer, ImageFormat};
//!
//! let scan = DependencyGraph::build(Path::new(".")).unwrap();
//! let renderer: GraphRenderer = GraphRenderer::default();
//! let image = renderer
//!     .render(GraphModel::Dependency(&scan.graph), Path::new("report/roles"), ImageFormat::Svg)
//!     .unwrap();
//! println!("wrote {}", image.display());
//! ```

pub mod dot;
pub mod graphviz;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use crate::error::{Error, Result, ValidationError};
use crate::graph::DependencyGraph;
use crate::structure::ProjectTree;

pub use dot::{EdgeSpec, GraphDescription, NodeShape, NodeSpec};
pub use graphviz::{image_path, Graphviz, ImageFormat, Rasterizer};

/// Which of the two graphs is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    /// Directory containment graph of the project tree.
    Directory,
    /// Role dependency graph.
    Dependency,
}

impl GraphKind {
    /// File name the graph is written under inside the output location.
    pub fn file_stem(&self) -> &'static str {
        match self {
            GraphKind::Directory => "project",
            GraphKind::Dependency => "roles",
        }
    }

    /// Output path without extension inside `location`.
    pub fn output_in(&self, location: &Path) -> PathBuf {
        location.join(self.file_stem())
    }
}

impl FromStr for GraphKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "directory" | "project" | "dir" => Ok(GraphKind::Directory),
            "dependency" | "roles" | "role" => Ok(GraphKind::Dependency),
            _ => Err(Error::UnsupportedGraphKind(s.to_string())),
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphKind::Directory => write!(f, "directory"),
            GraphKind::Dependency => write!(f, "dependency"),
        }
    }
}

/// A model to render, tagged with its kind.
#[derive(Debug, Clone, Copy)]
pub enum GraphModel<'a> {
    Directory(&'a ProjectTree),
    Dependency(&'a DependencyGraph),
}

impl GraphModel<'_> {
    pub fn kind(&self) -> GraphKind {
        match self {
            GraphModel::Directory(_) => GraphKind::Directory,
            GraphModel::Dependency(_) => GraphKind::Dependency,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            GraphModel::Directory(tree) => tree.is_empty(),
            GraphModel::Dependency(graph) => graph.is_empty(),
        }
    }

    /// Builds the node and edge lists for this model.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyModel`] if the model has no entries.
    pub fn describe(&self) -> Result<GraphDescription> {
        if self.is_empty() {
            return Err(ValidationError::EmptyModel(self.kind().file_stem()).into());
        }

        let name = self.kind().file_stem();
        Ok(match self {
            GraphModel::Directory(tree) => GraphDescription::from_project_tree(name, tree),
            GraphModel::Dependency(graph) => GraphDescription::from_dependency_graph(name, graph),
        })
    }
}

/// Renders models to image files through a [`Rasterizer`].
#[derive(Debug, Clone, Default)]
pub struct GraphRenderer<R = Graphviz> {
    rasterizer: R,
}

impl<R: Rasterizer> GraphRenderer<R> {
    pub fn new(rasterizer: R) -> Self {
        Self { rasterizer }
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Renders `model` to `output` plus the format extension and returns the
    /// image path.
    ///
    /// # Errors
    ///
    /// A [`ValidationError`] for an empty model, [`Error::Render`] if the
    /// rasterizer fails. Nothing is retried.
    pub fn render(&self, model: GraphModel<'_>, output: &Path, format: ImageFormat) -> Result<PathBuf> {
        let description = model.describe()?;
        info!(
            "Render {} graph - {} nodes, {} edges",
            model.kind(),
            description.nodes.len(),
            description.edges.len()
        );

        let dot = description.to_dot();
        debug!("{}", dot);
        debug!("Location for graph - {}", output.display());

        self.rasterizer.rasterize(&dot, format, output)
    }

    /// Like [`render`](Self::render), with the kind given by name.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedGraphKind`] if `kind` names no graph or does not
    /// match the model, raised before anything is rendered.
    pub fn render_as(
        &self,
        kind: &str,
        model: GraphModel<'_>,
        output: &Path,
        format: ImageFormat,
    ) -> Result<PathBuf> {
        let kind: GraphKind = kind.parse()?;
        if kind != model.kind() {
            return Err(Error::UnsupportedGraphKind(format!(
                "{} (model is a {} graph)",
                kind,
                model.kind()
            )));
        }
        self.render(model, output, format)
    }
}
