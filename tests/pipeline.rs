//! Whole-pipeline tests over a project laid out on disk.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use ansible_graph::config::Config;
use ansible_graph::graph::DependencyGraph;
use ansible_graph::render::{image_path, GraphDescription, ImageFormat, Rasterizer};
use ansible_graph::report::{render_report, ReportFormat, ReportMeta};
use ansible_graph::runner::{RunOptions, Runner};
use ansible_graph::structure::ProjectTree;
use tempfile::TempDir;

/// Keeps every DOT source instead of running Graphviz.
#[derive(Default)]
struct RecordingRasterizer {
    sources: RefCell<Vec<(PathBuf, String)>>,
}

impl Rasterizer for RecordingRasterizer {
    fn rasterize(&self, dot: &str, format: ImageFormat, output: &Path) -> ansible_graph::Result<PathBuf> {
        self.sources
            .borrow_mut()
            .push((output.to_path_buf(), dot.to_string()));
        Ok(image_path(output, format))
    }
}

/// root: a.yml, b.yml, .git/, group_vars/all.yml, roles/{web,common,base}
fn create_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::write(root.join("a.yml"), "- hosts: all\n").unwrap();
    fs::write(root.join("b.yml"), "- hosts: web\n").unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::create_dir_all(root.join("group_vars")).unwrap();
    fs::write(root.join("group_vars").join("all.yml"), "ntp: pool.ntp.org\n").unwrap();

    let roles = [
        ("web", "dependencies:\n  - { role: common }\n  - base\n"),
        ("common", "dependencies: []\n"),
        ("base", "galaxy_info:\n  author: ops\n"),
    ];
    for (role, meta) in roles {
        let meta_dir = root.join("roles").join(role).join("meta");
        fs::create_dir_all(&meta_dir).unwrap();
        fs::write(meta_dir.join("main.yml"), meta).unwrap();
    }

    dir
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_project_tree_from_disk() {
    let project = create_project();

    let tree = ProjectTree::build(
        project.path(),
        &strings(&["group_vars", "missing"]),
        &strings(&[".git"]),
    )
    .unwrap();

    assert_eq!(tree.labels().collect::<Vec<_>>(), vec!["root", "group_vars"]);
    assert_eq!(tree.root().files, vec!["a.yml", "b.yml"]);
    assert_eq!(tree.root().subdirectories, vec!["group_vars", "roles"]);
    assert_eq!(tree.get("group_vars").unwrap().files, vec!["all.yml"]);
}

#[test]
fn test_dependency_graph_from_disk() {
    let project = create_project();

    let scan = DependencyGraph::build(project.path()).unwrap();
    let graph = &scan.graph;

    assert!(scan.is_complete());
    assert_eq!(graph.roles().collect::<Vec<_>>(), vec!["base", "common", "web"]);
    assert_eq!(graph.dependencies_of("web").unwrap(), &["common", "base"]);
    assert_eq!(graph.dependencies_of("base"), Some(&[][..]));
    assert_eq!(graph.dependents_of("common"), vec!["web"]);

    let description = GraphDescription::from_dependency_graph("roles", graph);
    assert!(description.node("web").is_some());
    assert!(description.has_edge("web", "common"));
    assert!(description.has_edge("web", "base"));
}

#[test]
fn test_runner_end_to_end() {
    let project = create_project();
    let config = Config::from_toml(
        r#"
[global]
title = "Infrastructure"
company = "Example Corp"

[structure]
include = "group_vars, roles"
exclude = ".git"

[graph]
location = "report"
"#,
    )
    .unwrap();
    config.validate().unwrap();

    let options = RunOptions::from_config(project.path(), &config, ReportFormat::Default, ImageFormat::Png);
    let runner = Runner::new(RecordingRasterizer::default());
    let outcome = runner.run(&options);

    assert!(outcome.is_success(), "errors: {:?}", outcome.errors);
    assert_eq!(
        outcome.images,
        vec![PathBuf::from("report/roles.png"), PathBuf::from("report/project.png")]
    );

    let report = outcome.report.unwrap();
    assert!(report.contains("Title:          Infrastructure"));
    assert!(report.contains("\nDirectory: root\n\nFiles:\n - a.yml\n - b.yml\n"));
    assert!(report.contains("\nDirectory: group_vars\n\nFiles:\n - all.yml\n"));
    assert!(report.contains("\nDirectory: roles\n\nFiles:\n\nSubdirectories:\n - base\n - common\n - web\n"));
    assert!(report.ends_with("Roles and Dependencies:\nbase:\ncommon:\nweb:\n - common\n - base\n"));
    assert!(!report.contains(".git"));
}

#[test]
fn test_xml_report_from_disk() {
    let project = create_project();
    let tree = ProjectTree::build(project.path(), &strings(&["group_vars"]), &strings(&[".git"])).unwrap();
    let scan = DependencyGraph::build(project.path()).unwrap();

    let xml = render_report(
        ReportFormat::Xml,
        ReportMeta::new("Infrastructure", "Example Corp"),
        &tree,
        &scan.graph,
    )
    .unwrap();

    assert!(xml.contains("<title>Infrastructure</title>"));
    assert!(xml.contains("<group_vars>"));
    assert!(xml.contains("<file name=\"all.yml\"/>"));
    assert!(xml.contains("<ansible_role name=\"web\">"));
    assert!(xml.contains("<dependency name=\"base\"/>"));
}

#[test]
fn test_runner_reports_malformed_role_and_continues() {
    let project = create_project();
    let broken = project.path().join("roles").join("broken").join("meta");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("main.yml"), "dependencies: [unclosed\n").unwrap();

    let options = RunOptions {
        project: project.path().to_path_buf(),
        include: strings(&["roles"]),
        exclude: strings(&[".git"]),
        location: PathBuf::from("out"),
        meta: ReportMeta::new("Infrastructure", "Example Corp"),
        report_format: ReportFormat::Default,
        image_format: ImageFormat::Svg,
    };
    let runner = Runner::new(RecordingRasterizer::default());
    let outcome = runner.run(&options);

    let scan = outcome.dependencies.as_ref().unwrap();
    assert_eq!(scan.failures.len(), 1);
    assert!(!scan.graph.contains("broken"));
    assert_eq!(outcome.images.len(), 2);

    let report = outcome.report.unwrap();
    assert!(report.contains(" - broken"));
    assert!(!report.contains("broken:"));
}
