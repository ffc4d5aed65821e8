//! Report generation for a scanned project.
//!
//! A report combines the [`ProjectTree`], the [`DependencyGraph`] and a
//! [`ReportMeta`] header into a single string, in one of the formats of
//! [`ReportFormat`].
//!
//! # Example
//!
//! ```rust
//! use ansible_graph::graph::DependencyGraph;
//! use ansible_graph::report::{ReportFormat, ReportGenerator, ReportMeta};
//! use ansible_graph::structure::{DirectoryEntry, ProjectTree};
//!
//! let tree = ProjectTree::new(DirectoryEntry::new(["site.yml"], ["roles"]));
//! let mut graph = DependencyGraph::new();
//! graph.add_dependency("web", "common");
//!
//! let mut generator = ReportGenerator::new(ReportFormat::Default);
//! generator.set_report_header(ReportMeta::new("Infrastructure", "Example Corp")).unwrap();
//! generator.set_report_content(&tree, &graph).unwrap();
//! let report = generator.render().unwrap();
//!
//! assert!(report.contains("Directory: root"));
//! assert!(report.contains(" - common"));
//! ```

pub mod json;
pub mod plain;
pub mod xml;

use std::env;
use std::fmt;
use std::mem;
use std::str::FromStr;

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::error::{Error, Result, ValidationError};
use crate::graph::DependencyGraph;
use crate::structure::ProjectTree;

/// Date format stamped on reports.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format stamped on reports (12-hour clock, no meridiem).
pub const TIME_FORMAT: &str = "%I:%M:%S";

/// Report output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Plain text, for terminals
    #[default]
    Default,
    /// XML document
    Xml,
    /// Reserved, renders nothing
    Json,
}

impl FromStr for ReportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "plain" => Ok(ReportFormat::Default),
            "xml" => Ok(ReportFormat::Xml),
            "json" => Ok(ReportFormat::Json),
            _ => Err(ValidationError::UnknownReportFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Default => write!(f, "default"),
            ReportFormat::Xml => write!(f, "xml"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Header values printed at the top of a report.
///
/// `title` and `company` come from the configuration; `user`, `date` and
/// `time` are stamped when the header is handed to a [`ReportGenerator`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportMeta {
    pub title: String,
    pub company: String,
    pub user: String,
    pub date: String,
    pub time: String,
}

impl ReportMeta {
    pub fn new(title: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            ..Self::default()
        }
    }

    /// Fills the empty runtime fields from the environment and the local clock.
    pub fn stamp(&mut self) {
        self.stamp_with(&current_user(), Local::now());
    }

    /// Fills the empty runtime fields from the given user and time.
    ///
    /// Fields that already hold a value are left alone.
    pub fn stamp_with(&mut self, user: &str, now: DateTime<Local>) {
        if self.user.is_empty() {
            self.user = user.to_string();
        }
        if self.date.is_empty() {
            self.date = now.format(DATE_FORMAT).to_string();
        }
        if self.time.is_empty() {
            self.time = now.format(TIME_FORMAT).to_string();
        }
    }

    /// Key and value of every non-empty field, in header order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("title", self.title.as_str()),
            ("company", self.company.as_str()),
            ("user", self.user.as_str()),
            ("date", self.date.as_str()),
            ("time", self.time.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

/// Name of the user running the program, `unknown` if the environment has none.
pub fn current_user() -> String {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .find(|user| !user.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// The two models a report is built from.
#[derive(Debug, Clone, Copy)]
pub struct ReportContent<'a> {
    pub tree: &'a ProjectTree,
    pub graph: &'a DependencyGraph,
}

/// Trait for report renderers, one per [`ReportFormat`].
pub trait ReportRenderer {
    /// Renders the complete report.
    fn render(&self, meta: &ReportMeta, content: &ReportContent<'_>) -> Result<String>;
}

/// Renders a report in the given format.
pub fn render_with(format: ReportFormat, meta: &ReportMeta, content: &ReportContent<'_>) -> Result<String> {
    match format {
        ReportFormat::Default => plain::PlainRenderer.render(meta, content),
        ReportFormat::Xml => xml::XmlRenderer.render(meta, content),
        ReportFormat::Json => json::JsonRenderer.render(meta, content),
    }
}

/// Runs a [`ReportGenerator`] through all of its steps.
pub fn render_report(
    format: ReportFormat,
    meta: ReportMeta,
    tree: &ProjectTree,
    graph: &DependencyGraph,
) -> Result<String> {
    let mut generator = ReportGenerator::new(format);
    generator.set_report_header(meta)?;
    generator.set_report_content(tree, graph)?;
    generator.render()
}

enum Stage<'a> {
    Created,
    MetaSet(ReportMeta),
    ContentSet(ReportMeta, ReportContent<'a>),
    Rendered,
}

impl Stage<'_> {
    fn name(&self) -> &'static str {
        match self {
            Stage::Created => "created",
            Stage::MetaSet(_) => "meta-set",
            Stage::ContentSet(..) => "content-set",
            Stage::Rendered => "rendered",
        }
    }
}

/// Builds one report: header first, then content, then render.
///
/// Each call is valid in exactly one stage; anything else is an
/// [`Error::State`] and leaves the generator where it was. After
/// [`render`](Self::render) the generator is spent.
pub struct ReportGenerator<'a> {
    format: ReportFormat,
    stage: Stage<'a>,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            stage: Stage::Created,
        }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Sets the header, stamping user, date and time where they are empty.
    pub fn set_report_header(&mut self, mut meta: ReportMeta) -> Result<()> {
        match mem::replace(&mut self.stage, Stage::Rendered) {
            Stage::Created => {
                meta.stamp();
                debug!("Report header {:?}", meta);
                self.stage = Stage::MetaSet(meta);
                Ok(())
            }
            other => Err(self.restore(other, "created")),
        }
    }

    pub fn set_report_content(&mut self, tree: &'a ProjectTree, graph: &'a DependencyGraph) -> Result<()> {
        match mem::replace(&mut self.stage, Stage::Rendered) {
            Stage::MetaSet(meta) => {
                self.stage = Stage::ContentSet(meta, ReportContent { tree, graph });
                Ok(())
            }
            other => Err(self.restore(other, "meta-set")),
        }
    }

    /// Renders the report. Only valid once, after header and content are set.
    pub fn render(&mut self) -> Result<String> {
        match mem::replace(&mut self.stage, Stage::Rendered) {
            Stage::ContentSet(meta, content) => {
                info!("Create {} report", self.format);
                render_with(self.format, &meta, &content)
            }
            other => Err(self.restore(other, "content-set")),
        }
    }

    fn restore(&mut self, stage: Stage<'a>, expected: &'static str) -> Error {
        let found = stage.name();
        self.stage = stage;
        Error::State { expected, found }
    }
}
