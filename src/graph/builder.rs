//! Builds a [`DependencyGraph`] from the role metadata files of a project.
//!
//! Declaration files live at `roles/<role>/meta/<file>.yml` (or `.yaml`, any
//! case). Anything nested differently under `roles/` is not a declaration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::DependencyGraph;
use crate::error::{Error, Result};
use crate::parser::{is_yaml_file, parse_file, DependencyUnit};

/// Directory holding the roles, relative to the project root.
pub const ROLES_DIR: &str = "roles";

/// Directory holding a role's metadata, relative to the role.
pub const META_DIR: &str = "meta";

/// Result of scanning a project's roles.
///
/// Roles whose metadata could not be read or parsed are missing from
/// `graph` and reported in `failures`.
#[derive(Debug, Default)]
pub struct DependencyScan {
    pub graph: DependencyGraph,
    pub failures: Vec<Error>,
}

impl DependencyScan {
    /// Returns true if every declaration file was read.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl DependencyGraph {
    /// Reads every role declaration file under `project_root/roles`.
    ///
    /// Each role gets a key, even when it declares no dependencies. A role
    /// with several declaration files gets their dependencies concatenated in
    /// file name order. A malformed file drops its role and is recorded in
    /// [`DependencyScan::failures`]; other roles are unaffected.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] or [`Error::PermissionDenied`] if `project_root`
    /// itself cannot be read. A project without a `roles` directory yields an
    /// empty graph.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use ansible_graph::graph::DependencyGraph;
    ///
    /// let scan = DependencyGraph::build(Path::new(".")).unwrap();
    /// for (role, deps) in scan.graph.iter() {
    ///     println!("{}: {:?}", role, deps);
    /// }
    /// ```
    pub fn build(project_root: &Path) -> Result<DependencyScan> {
        info!("Read Ansible roles");

        let metadata = fs::metadata(project_root).map_err(|e| Error::from_io(project_root, e))?;
        if !metadata.is_dir() {
            return Err(Error::NotFound {
                path: project_root.to_path_buf(),
            });
        }

        let mut scan = DependencyScan::default();
        for (role, paths) in declaration_files(&project_root.join(ROLES_DIR)) {
            match read_unit(&role, &paths) {
                Ok(unit) => {
                    debug!("Role {}", unit);
                    scan.graph.insert(unit);
                }
                Err(err) => {
                    warn!("Skipping role '{}': {}", role, err);
                    scan.failures.push(err);
                }
            }
        }

        Ok(scan)
    }
}

/// Finds declaration files grouped by role name, both in sorted order.
fn declaration_files(roles_dir: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut files: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

    if !roles_dir.is_dir() {
        debug!("No roles directory at {}", roles_dir.display());
        return files;
    }

    let walker = WalkDir::new(roles_dir)
        .min_depth(3)
        .max_depth(3)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("Skipping unreadable path under roles: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_yaml_file(entry.path()) {
            continue;
        }
        if let Some(role) = role_name(roles_dir, entry.path()) {
            files.entry(role).or_default().push(entry.into_path());
        }
    }

    files
}

/// Extracts `<role>` from `roles_dir/<role>/meta/<file>`.
///
/// Returns `None` for any other shape and for hidden role or file names.
fn role_name(roles_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(roles_dir).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<_>>()?;

    match parts.as_slice() {
        [role, meta, file] if *meta == META_DIR && !role.starts_with('.') && !file.starts_with('.') => {
            Some(role.to_string())
        }
        _ => None,
    }
}

fn read_unit(role: &str, paths: &[PathBuf]) -> Result<DependencyUnit> {
    let mut unit = DependencyUnit::new(role);
    for path in paths {
        let meta = parse_file(path)?;
        unit.extend_from(&meta);
    }
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_meta(root: &Path, role: &str, file: &str, content: &str) {
        let meta = root.join(ROLES_DIR).join(role).join(META_DIR);
        fs::create_dir_all(&meta).unwrap();
        fs::write(meta.join(file), content).unwrap();
    }

    #[test]
    fn test_build_mixed_dependency_forms() {
        let dir = TempDir::new().unwrap();
        write_meta(
            dir.path(),
            "web",
            "main.yml",
            "dependencies:\n  - { role: common }\n  - base\n",
        );

        let scan = DependencyGraph::build(dir.path()).unwrap();

        assert!(scan.is_complete());
        assert_eq!(scan.graph.len(), 1);
        assert_eq!(scan.graph.dependencies_of("web").unwrap(), &["common", "base"]);
    }

    #[test]
    fn test_build_role_without_dependencies_key() {
        let dir = TempDir::new().unwrap();
        write_meta(dir.path(), "base", "main.yml", "galaxy_info:\n  author: ops\n");
        write_meta(dir.path(), "empty", "main.yaml", "");

        let scan = DependencyGraph::build(dir.path()).unwrap();

        assert_eq!(scan.graph.dependencies_of("base"), Some(&[][..]));
        assert_eq!(scan.graph.dependencies_of("empty"), Some(&[][..]));
    }

    #[test]
    fn test_build_skips_malformed_role_and_keeps_others() {
        let dir = TempDir::new().unwrap();
        write_meta(dir.path(), "broken", "main.yml", "dependencies: [unclosed\n");
        write_meta(dir.path(), "web", "main.yml", "dependencies: [common]\n");

        let scan = DependencyGraph::build(dir.path()).unwrap();

        assert!(!scan.graph.contains("broken"));
        assert!(scan.graph.contains("web"));
        assert_eq!(scan.failures.len(), 1);
        assert!(matches!(scan.failures[0], Error::Parse { .. }));
    }

    #[test]
    fn test_build_keeps_role_with_numeric_dependency() {
        let dir = TempDir::new().unwrap();
        write_meta(dir.path(), "num", "main.yml", "dependencies: [1, common]\n");
        write_meta(dir.path(), "plain", "main.yml", "42\n");

        let scan = DependencyGraph::build(dir.path()).unwrap();

        assert!(scan.is_complete());
        assert_eq!(scan.graph.dependencies_of("num").unwrap(), &["1", "common"]);
        assert_eq!(scan.graph.dependencies_of("plain"), Some(&[][..]));
    }

    #[test]
    fn test_build_extension_case_insensitive() {
        let dir = TempDir::new().unwrap();
        write_meta(dir.path(), "a", "main.YML", "dependencies: [x]\n");
        write_meta(dir.path(), "b", "main.Yaml", "dependencies: [y]\n");
        write_meta(dir.path(), "c", "main.json", "{}");

        let scan = DependencyGraph::build(dir.path()).unwrap();

        assert_eq!(scan.graph.roles().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_build_concatenates_multiple_files() {
        let dir = TempDir::new().unwrap();
        write_meta(dir.path(), "web", "main.yml", "dependencies: [common]\n");
        write_meta(dir.path(), "web", "extra.yml", "dependencies: [base]\n");

        let scan = DependencyGraph::build(dir.path()).unwrap();

        assert_eq!(scan.graph.dependencies_of("web").unwrap(), &["base", "common"]);
    }

    #[test]
    fn test_build_ignores_other_layouts() {
        let dir = TempDir::new().unwrap();
        write_meta(dir.path(), ".hidden", "main.yml", "dependencies: [x]\n");
        write_meta(dir.path(), "web", ".main.yml", "dependencies: [x]\n");

        let nested = dir.path().join(ROLES_DIR).join("ns").join("web").join(META_DIR);
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("main.yml"), "dependencies: [x]\n").unwrap();

        let tasks = dir.path().join(ROLES_DIR).join("db").join("tasks");
        fs::create_dir_all(&tasks).unwrap();
        fs::write(tasks.join("main.yml"), "- name: install\n").unwrap();

        let scan = DependencyGraph::build(dir.path()).unwrap();

        assert!(scan.graph.is_empty());
        assert!(scan.is_complete());
    }

    #[test]
    fn test_build_without_roles_directory() {
        let dir = TempDir::new().unwrap();
        let scan = DependencyGraph::build(dir.path()).unwrap();

        assert!(scan.graph.is_empty());
    }

    #[test]
    fn test_build_missing_project_root() {
        let dir = TempDir::new().unwrap();
        let result = DependencyGraph::build(&dir.path().join("missing"));

        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_role_name_shapes() {
        let roles = Path::new("/p/roles");

        assert_eq!(
            role_name(roles, Path::new("/p/roles/web/meta/main.yml")),
            Some("web".to_string())
        );
        assert_eq!(role_name(roles, Path::new("/p/roles/web/tasks/main.yml")), None);
        assert_eq!(role_name(roles, Path::new("/p/roles/web/main.yml")), None);
        assert_eq!(role_name(roles, Path::new("/q/roles/web/meta/main.yml")), None);
    }
}
