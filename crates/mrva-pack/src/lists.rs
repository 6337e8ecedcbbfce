//! Repository list resolution.

use std::collections::HashMap;
use std::path::Path;

use crate::RepositoryListResolver;
use crate::error::PackError;

/// Resolves lists from a JSON object mapping list names to `owner/repo`
/// arrays, e.g. `{"top_100": ["octo/a", "octo/b"]}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonListResolver;

impl RepositoryListResolver for JsonListResolver {
    fn resolve(&self, list_file: &Path, list_name: &str) -> Result<Vec<String>, PackError> {
        tracing::info!(list = list_name, file = %list_file.display(), "resolving repositories");
        let raw = std::fs::read(list_file).map_err(|source| PackError::io(list_file, source))?;
        let mut lists: HashMap<String, Vec<String>> =
            serde_json::from_slice(&raw).map_err(|source| PackError::ListFile {
                path: list_file.to_path_buf(),
                source,
            })?;
        lists
            .remove(list_name)
            .ok_or_else(|| PackError::ListNotFound {
                list: list_name.to_string(),
                path: list_file.to_path_buf(),
            })
    }
}
