//! Plain text report.

use std::fmt::Write;

use super::{ReportContent, ReportMeta, ReportRenderer};
use crate::error::Result;
use crate::structure::DirectoryEntry;

/// Plain text renderer.
pub struct PlainRenderer;

impl ReportRenderer for PlainRenderer {
    fn render(&self, meta: &ReportMeta, content: &ReportContent<'_>) -> Result<String> {
        let double_line = "=".repeat(80);
        let simple_line = "-".repeat(80);
        let mut report = String::new();

        // Header
        report.push_str(&double_line);
        for (key, value) in meta.entries() {
            let _ = write!(report, "\n{:<15} {:<30}", format!("{}:", title_case(key)), value);
        }
        report.push('\n');
        report.push_str(&double_line);

        // Directories, root first
        for (label, entry) in content.tree.iter() {
            let _ = write!(report, "\nDirectory: {}", label);
            write_entry(&mut report, entry);
            report.push('\n');
            report.push_str(&simple_line);
        }

        // Roles
        report.push_str("\nRoles and Dependencies:\n");
        for (role, deps) in content.graph.iter() {
            let _ = writeln!(report, "{}:", role);
            for dep in deps {
                let _ = writeln!(report, " - {}", dep);
            }
        }

        Ok(report)
    }
}

fn write_entry(report: &mut String, entry: &DirectoryEntry) {
    report.push_str("\n\nFiles:");
    for file in &entry.files {
        let _ = write!(report, "\n - {}", file);
    }
    report.push_str("\n\nSubdirectories:");
    for subdirectory in &entry.subdirectories {
        let _ = write!(report, "\n - {}", subdirectory);
    }
}

fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyGraph;
    use crate::structure::ProjectTree;

    fn meta() -> ReportMeta {
        ReportMeta {
            title: "Infra".to_string(),
            company: "Corp".to_string(),
            user: "ops".to_string(),
            date: "2024-03-09".to_string(),
            time: "02:05:07".to_string(),
        }
    }

    #[test]
    fn test_plain_exact_output() {
        let tree = ProjectTree::new(DirectoryEntry::new(["a.yml", "b.yml"], ["group_vars"]))
            .with_directory("group_vars", DirectoryEntry::new(["all.yml"], Vec::<String>::new()));
        let mut graph = DependencyGraph::new();
        graph.add_dependency("web", "common");
        graph.add_dependency("web", "base");
        graph.add_role("base");

        let meta = ReportMeta {
            user: String::new(),
            date: String::new(),
            time: String::new(),
            ..meta()
        };
        let report = PlainRenderer
            .render(&meta, &ReportContent { tree: &tree, graph: &graph })
            .unwrap();

        let expected = format!(
            "{eq}\n{:<15} {:<30}\n{:<15} {:<30}\n{eq}\
             \nDirectory: root\n\nFiles:\n - a.yml\n - b.yml\n\nSubdirectories:\n - group_vars\n{dash}\
             \nDirectory: group_vars\n\nFiles:\n - all.yml\n\nSubdirectories:\n{dash}\
             \nRoles and Dependencies:\nbase:\nweb:\n - common\n - base\n",
            "Title:",
            "Infra",
            "Company:",
            "Corp",
            eq = "=".repeat(80),
            dash = "-".repeat(80),
        );
        assert_eq!(report, expected);
    }

    #[test]
    fn test_plain_header_key_order() {
        let tree = ProjectTree::new(DirectoryEntry::default());
        let graph = DependencyGraph::new();

        let report = PlainRenderer
            .render(&meta(), &ReportContent { tree: &tree, graph: &graph })
            .unwrap();

        let positions: Vec<usize> = ["Title:", "Company:", "User:", "Date:", "Time:"]
            .iter()
            .map(|key| report.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(report.contains("Time:           02:05:07"));
    }

    #[test]
    fn test_plain_root_once_and_first() {
        let tree = ProjectTree::new(DirectoryEntry::new(Vec::<String>::new(), ["roles"]))
            .with_directory("roles", DirectoryEntry::default())
            .with_directory("root", DirectoryEntry::new(["fake.yml"], Vec::<String>::new()));
        let graph = DependencyGraph::new();

        let report = PlainRenderer
            .render(&meta(), &ReportContent { tree: &tree, graph: &graph })
            .unwrap();

        assert_eq!(report.matches("Directory: root").count(), 1);
        assert!(report.find("Directory: root").unwrap() < report.find("Directory: roles").unwrap());
        assert!(!report.contains("fake.yml"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("company"), "Company");
        assert_eq!(title_case(""), "");
    }
}
