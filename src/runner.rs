//! End-to-end pipeline: scan the project, read the roles, render both graphs
//! and build the report.
//!
//! Every stage runs on its own. A failing stage is logged and recorded in
//! [`RunOutcome::errors`]; later stages still run whenever the model they
//! need was built.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::graph::{DependencyGraph, DependencyScan};
use crate::render::{GraphModel, GraphRenderer, Graphviz, ImageFormat, Rasterizer};
use crate::report::{render_report, ReportFormat, ReportMeta};
use crate::structure::ProjectTree;

/// Inputs of one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub project: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Directory receiving `project.<fmt>` and `roles.<fmt>`.
    pub location: PathBuf,
    pub meta: ReportMeta,
    pub report_format: ReportFormat,
    pub image_format: ImageFormat,
}

impl RunOptions {
    pub fn from_config(
        project: &Path,
        config: &Config,
        report_format: ReportFormat,
        image_format: ImageFormat,
    ) -> Self {
        Self {
            project: project.to_path_buf(),
            include: config.structure.include.clone(),
            exclude: config.structure.exclude.clone(),
            location: config.location(),
            meta: config.report_meta(),
            report_format,
            image_format,
        }
    }
}

/// What a run produced.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub tree: Option<ProjectTree>,
    pub dependencies: Option<DependencyScan>,
    /// Images written, in render order.
    pub images: Vec<PathBuf>,
    /// The report, if both models were built and rendering succeeded.
    pub report: Option<String>,
    /// Stage failures, in the order they happened.
    pub errors: Vec<Error>,
}

impl RunOutcome {
    /// Returns true if no stage failed.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs the pipeline with a given [`Rasterizer`].
#[derive(Debug, Clone, Default)]
pub struct Runner<R = Graphviz> {
    renderer: GraphRenderer<R>,
}

impl<R: Rasterizer> Runner<R> {
    pub fn new(rasterizer: R) -> Self {
        Self {
            renderer: GraphRenderer::new(rasterizer),
        }
    }

    pub fn run(&self, options: &RunOptions) -> RunOutcome {
        let mut outcome = RunOutcome::default();

        match DependencyGraph::build(&options.project) {
            Ok(scan) => {
                report_cycles(&scan.graph);
                self.render_graph(GraphModel::Dependency(&scan.graph), options, &mut outcome);
                outcome.dependencies = Some(scan);
            }
            Err(err) => {
                error!("Cannot read Ansible roles: {}", err);
                outcome.errors.push(err);
            }
        }

        match ProjectTree::build(&options.project, &options.include, &options.exclude) {
            Ok(tree) => {
                self.render_graph(GraphModel::Directory(&tree), options, &mut outcome);
                outcome.tree = Some(tree);
            }
            Err(err) => {
                error!("Cannot read Ansible directory structure: {}", err);
                outcome.errors.push(err);
            }
        }

        let (Some(tree), Some(scan)) = (&outcome.tree, &outcome.dependencies) else {
            warn!("Report skipped, project model incomplete");
            return outcome;
        };

        match render_report(options.report_format, options.meta.clone(), tree, &scan.graph) {
            Ok(report) => outcome.report = Some(report),
            Err(err) => {
                error!("Cannot create report: {}", err);
                outcome.errors.push(err);
            }
        }

        outcome
    }

    fn render_graph(&self, model: GraphModel<'_>, options: &RunOptions, outcome: &mut RunOutcome) {
        let output = model.kind().output_in(&options.location);
        match self.renderer.render(model, &output, options.image_format) {
            Ok(image) => {
                info!("Graph written to {}", image.display());
                outcome.images.push(image);
            }
            Err(err) => {
                error!("Cannot render {} graph: {}", model.kind(), err);
                outcome.errors.push(err);
            }
        }
    }
}

fn report_cycles(graph: &DependencyGraph) {
    for cycle in graph.get_cycle_details() {
        warn!("Circular role dependency: {}", cycle.cycle_path());
    }
}
