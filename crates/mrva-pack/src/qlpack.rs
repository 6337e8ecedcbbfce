//! `qlpack.yml` discovery and rewriting.
//!
//! A submitted pack must contain exactly one query, named
//! `codeql-remote/query`, whose default suite is that query.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::error::PackError;

pub const PACK_FILE: &str = "qlpack.yml";
pub const REMOTE_PACK_NAME: &str = "codeql-remote/query";
const SUITE_DESCRIPTION: &str = "Query suite for variant analysis";

/// Nearest ancestor directory of `query_file` that holds a `qlpack.yml`.
#[must_use]
pub fn find_pack_root(query_file: &Path) -> Option<PathBuf> {
    query_file
        .ancestors()
        .skip(1)
        .find(|dir| dir.join(PACK_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Pack definition for a query that lives outside any pack.
#[must_use]
pub fn synthetic_qlpack(language: &str, query_rel: &str) -> String {
    format!(
        "name: {REMOTE_PACK_NAME}\n\
         version: 0.0.0\n\
         dependencies:\n  \
           codeql/{language}-all: \"*\"\n\
         defaultSuite:\n  \
           description: {SUITE_DESCRIPTION}\n  \
           query: {query_rel}\n"
    )
}

/// Rewrite an existing pack definition so it only runs `query_rel`.
///
/// Drops `defaultSuiteFile`, sets `defaultSuite`, renames the pack and
/// replaces `${workspace}` dependency versions with `*`.
///
/// # Errors
///
/// Returns [`PackError::PackFile`] if `contents` is not a YAML mapping.
pub fn patch_qlpack(contents: &str, query_rel: &str) -> Result<String, PackError> {
    let mut pack: Mapping = serde_yaml::from_str(contents)?;

    pack.remove("defaultSuiteFile");

    let mut suite = Mapping::new();
    suite.insert("query".into(), query_rel.into());
    suite.insert("description".into(), SUITE_DESCRIPTION.into());
    pack.insert("defaultSuite".into(), Value::Mapping(suite));
    pack.insert("name".into(), REMOTE_PACK_NAME.into());

    if let Some(Value::Mapping(dependencies)) = pack.get_mut("dependencies") {
        for (_, version) in dependencies.iter_mut() {
            if version.as_str() == Some("${workspace}") {
                *version = "*".into();
            }
        }
    }

    Ok(serde_yaml::to_string(&pack)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn synthetic_pack_is_valid_yaml() {
        let yaml = synthetic_qlpack("java", "security/Injection.ql");
        let parsed: Mapping = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["name"], Value::from(REMOTE_PACK_NAME));
        assert_eq!(parsed["dependencies"]["codeql/java-all"], Value::from("*"));
        assert_eq!(
            parsed["defaultSuite"]["query"],
            Value::from("security/Injection.ql")
        );
    }

    #[test]
    fn patch_rewrites_name_suite_and_workspace_versions() {
        let original = r#"
name: acme/java-queries
version: 1.2.3
defaultSuiteFile: suites/default.qls
dependencies:
  codeql/java-all: ${workspace}
  acme/shared: "^1.0.0"
"#;
        let patched = patch_qlpack(original, "src/Injection.ql").unwrap();
        let parsed: Mapping = serde_yaml::from_str(&patched).unwrap();

        assert_eq!(parsed["name"], Value::from(REMOTE_PACK_NAME));
        assert_eq!(parsed["version"], Value::from("1.2.3"));
        assert!(parsed.get("defaultSuiteFile").is_none());
        assert_eq!(parsed["defaultSuite"]["query"], Value::from("src/Injection.ql"));
        assert_eq!(parsed["dependencies"]["codeql/java-all"], Value::from("*"));
        assert_eq!(parsed["dependencies"]["acme/shared"], Value::from("^1.0.0"));
    }

    #[test]
    fn patch_rejects_non_mapping() {
        assert!(patch_qlpack("- just\n- a list\n", "q.ql").is_err());
    }

    #[test]
    fn pack_root_is_nearest_ancestor() {
        let dir = tempfile::TempDir::new().unwrap();
        let pack = dir.path().join("pack");
        let nested = pack.join("src").join("security");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(pack.join(PACK_FILE), "name: x\n").unwrap();
        let query = nested.join("Q.ql");
        std::fs::write(&query, "select 1").unwrap();

        assert_eq!(find_pack_root(&query), Some(pack));
    }

    #[test]
    fn loose_query_has_no_pack_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let query = dir.path().join("Q.ql");
        std::fs::write(&query, "select 1").unwrap();
        assert_eq!(find_pack_root(&query), None);
    }
}
