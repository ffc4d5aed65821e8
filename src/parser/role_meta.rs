//! Parser for role metadata files (`roles/<name>/meta/*.yml`).
//!
//! This module reads a role's metadata YAML and extracts the names of the
//! roles it declares as dependencies.

use std::fs;
use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use super::types::{RoleDependency, RoleMeta};
use crate::error::{Error, Result};

/// Returns true if `path` has a YAML extension (`yml` or `yaml`, any case).
pub fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"))
}

/// Parses a role metadata file from a file path.
///
/// # Errors
///
/// [`Error::NotFound`]/[`Error::PermissionDenied`] if the file cannot be
/// read, [`Error::Parse`] if it is not valid YAML.
pub fn parse_file(path: &Path) -> Result<RoleMeta> {
    debug!("Read role metadata - {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| Error::from_io(path, e))?;
    parse_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses role metadata from a string.
///
/// An empty document, or one that is not a mapping, is metadata without
/// dependencies. A `dependencies` value that is not a list is ignored, and so
/// are list elements that name no role; every other element is kept.
///
/// # Example
///
/// ```
/// use ansible_graph::parser::role_meta::{parse_str, extract_dependencies};
///
/// let yaml = "dependencies:\n  - role: common\n  - base\n";
/// let meta = parse_str(yaml).unwrap();
/// assert_eq!(extract_dependencies(&meta), vec!["common", "base"]);
/// ```
pub fn parse_str(content: &str) -> serde_yaml::Result<RoleMeta> {
    if content.trim().is_empty() {
        return Ok(RoleMeta::default());
    }

    let document: Value = serde_yaml::from_str(content)?;
    Ok(meta_from_document(&document))
}

fn meta_from_document(document: &Value) -> RoleMeta {
    let dependencies = match document.get("dependencies") {
        None | Some(Value::Null) => None,
        Some(Value::Sequence(items)) => Some(
            items
                .iter()
                .filter_map(|item| {
                    let dependency = RoleDependency::from_value(item);
                    if dependency.is_none() {
                        debug!("Skipping dependency entry without a role name: {:?}", item);
                    }
                    dependency
                })
                .collect(),
        ),
        Some(other) => {
            debug!("Ignoring dependencies that are not a list: {:?}", other);
            None
        }
    };

    RoleMeta { dependencies }
}

/// Extracts the dependency names from parsed metadata, in declaration order.
pub fn extract_dependencies(meta: &RoleMeta) -> Vec<String> {
    meta.dependencies
        .iter()
        .flatten()
        .map(|d| d.name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE_META: &str = r#"---
galaxy_info:
  author: ops
  description: Web server
  min_ansible_version: "2.9"
  platforms:
    - name: Debian
      versions: [bullseye]
dependencies:
  - role: common
    vars:
      ntp_server: pool.ntp.org
  - base
  - { role: firewall, when: "enable_fw" }
"#;

    #[test]
    fn test_parse_str_mixed_dependencies() {
        let meta = parse_str(SAMPLE_META).unwrap();

        assert_eq!(meta.dependency_count(), 3);
        assert_eq!(
            extract_dependencies(&meta),
            vec!["common", "base", "firewall"]
        );
    }

    #[test]
    fn test_mapping_and_scalar_forms_are_equivalent() {
        let mapping = parse_str("dependencies:\n  - role: x\n").unwrap();
        let scalar = parse_str("dependencies:\n  - x\n").unwrap();

        assert_eq!(extract_dependencies(&mapping), extract_dependencies(&scalar));
        assert_eq!(extract_dependencies(&scalar), vec!["x"]);
    }

    #[test]
    fn test_parse_str_without_dependencies() {
        let meta = parse_str("galaxy_info:\n  author: ops\n").unwrap();

        assert!(!meta.has_dependencies());
        assert!(extract_dependencies(&meta).is_empty());
    }

    #[test]
    fn test_parse_str_empty_dependency_list() {
        let meta = parse_str("dependencies: []\n").unwrap();
        assert!(extract_dependencies(&meta).is_empty());

        let meta = parse_str("dependencies:\n").unwrap();
        assert!(extract_dependencies(&meta).is_empty());
    }

    #[test]
    fn test_parse_str_empty_document() {
        let meta = parse_str("").unwrap();
        assert!(meta.dependencies.is_none());

        let meta = parse_str("  \n").unwrap();
        assert!(meta.dependencies.is_none());
    }

    #[test]
    fn test_parse_str_keeps_duplicates_in_order() {
        let meta = parse_str("dependencies: [b, a, b]\n").unwrap();
        assert_eq!(extract_dependencies(&meta), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_parse_str_invalid_yaml() {
        let result = parse_str("dependencies: [common\n  - : :");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_str_not_a_mapping() {
        let meta = parse_str("- common\n- base\n").unwrap();
        assert!(meta.dependencies.is_none());

        let meta = parse_str("just a string\n").unwrap();
        assert!(meta.dependencies.is_none());
    }

    #[test]
    fn test_parse_str_non_string_scalars_are_names() {
        let meta = parse_str("dependencies: [1, common, true]\n").unwrap();
        assert_eq!(extract_dependencies(&meta), vec!["1", "common", "true"]);
    }

    #[test]
    fn test_parse_str_skips_entries_without_role() {
        let meta = parse_str("dependencies:\n  - vars: {a: 1}\n  - ~\n  - base\n").unwrap();
        assert_eq!(extract_dependencies(&meta), vec!["base"]);
    }

    #[test]
    fn test_parse_str_dependencies_not_a_list() {
        let meta = parse_str("dependencies: common\n").unwrap();
        assert!(meta.dependencies.is_none());
    }

    #[test]
    fn test_parse_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.yml");
        fs::write(&path, "dependencies: [unclosed\n").unwrap();

        let err = parse_file(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("main.yml"));
    }

    #[test]
    fn test_parse_file_missing() {
        let dir = TempDir::new().unwrap();
        let err = parse_file(&dir.path().join("main.yml")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_is_yaml_file() {
        assert!(is_yaml_file(Path::new("meta/main.yml")));
        assert!(is_yaml_file(Path::new("meta/main.YAML")));
        assert!(is_yaml_file(Path::new("meta/main.Yml")));
        assert!(!is_yaml_file(Path::new("meta/main.json")));
        assert!(!is_yaml_file(Path::new("meta/README")));
    }
}
