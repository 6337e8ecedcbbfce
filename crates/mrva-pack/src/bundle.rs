//! Builds the base64 query pack submitted with a run.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mrva_core::QueryBundle;

use crate::BundleBuilder;
use crate::codeql::Toolchain;
use crate::error::PackError;
use crate::qlpack::{PACK_FILE, find_pack_root, patch_qlpack, synthetic_qlpack};

const LOCK_FILES: [&str; 2] = ["qlpack.lock.yml", "codeql-pack.lock.yml"];
const LOOSE_QUERY_NAME: &str = "query.ql";

/// Packages a single query into a compiled pack with the `codeql` toolchain.
#[derive(Debug, Clone, Default)]
pub struct CodeqlPackBuilder {
    toolchain: Toolchain,
}

impl CodeqlPackBuilder {
    #[must_use]
    pub const fn new(toolchain: Toolchain) -> Self {
        Self { toolchain }
    }

    /// Lay out the pack for `query` in `pack_dir`.
    async fn stage(&self, query: &Path, language: &str, pack_dir: &Path) -> Result<(), PackError> {
        let Some(root) = find_pack_root(query) else {
            tracing::debug!(query = %query.display(), "query is not in a pack, synthesizing one");
            copy_file(query, &pack_dir.join(LOOSE_QUERY_NAME)).await?;
            return write_file(
                &pack_dir.join(PACK_FILE),
                synthetic_qlpack(language, LOOSE_QUERY_NAME).as_bytes(),
            )
            .await;
        };

        tracing::debug!(root = %root.display(), "copying pack");
        let mut files = self.toolchain.packlist(&root).await?;
        files.push(query.to_path_buf());
        for lock in LOCK_FILES {
            let path = root.join(lock);
            if path.is_file() {
                files.push(path);
            }
        }
        for file in &files {
            let absolute = if file.is_absolute() {
                file.clone()
            } else {
                root.join(file)
            };
            let Some(rel) = relative_to(&absolute, &root) else {
                tracing::debug!(file = %absolute.display(), "skipping file outside pack root");
                continue;
            };
            copy_file(&absolute, &pack_dir.join(rel)).await?;
        }

        let query_rel = relative_to(query, &root)
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            .ok_or_else(|| PackError::QueryNotFound(query.to_path_buf()))?;
        let manifest = pack_dir.join(PACK_FILE);
        let contents = tokio::fs::read_to_string(&manifest)
            .await
            .map_err(|source| PackError::io(&manifest, source))?;
        write_file(&manifest, patch_qlpack(&contents, &query_rel)?.as_bytes()).await
    }
}

#[async_trait]
impl BundleBuilder for CodeqlPackBuilder {
    async fn build(&self, query: &Path, language: &str) -> Result<QueryBundle, PackError> {
        if !query.is_file() {
            return Err(PackError::QueryNotFound(query.to_path_buf()));
        }
        let query = std::path::absolute(query).map_err(|source| PackError::io(query, source))?;
        let query_id = self.toolchain.resolve_query_id(&query).await?;
        tracing::info!(query = %query.display(), %query_id, "bundling query");

        let scratch = tempfile::TempDir::new().map_err(|source| PackError::io("<tempdir>", source))?;
        let pack_dir = scratch.path().join("pack");
        tokio::fs::create_dir_all(&pack_dir)
            .await
            .map_err(|source| PackError::io(&pack_dir, source))?;

        self.stage(&query, language, &pack_dir).await?;
        self.toolchain.pack_install(&pack_dir).await?;

        let archive = scratch.path().join("qlpack.tgz");
        self.toolchain
            .pack_bundle(&pack_dir, &archive, &compilation_cache(&query))
            .await?;
        let bytes = tokio::fs::read(&archive)
            .await
            .map_err(|source| PackError::io(&archive, source))?;

        Ok(QueryBundle {
            query_path: query.display().to_string(),
            query_id,
            encoded: STANDARD.encode(bytes),
        })
    }
}

/// Compiled queries are cached next to the source pack (or the loose
/// query) so later submissions of the same query skip compilation.
fn compilation_cache(query: &Path) -> PathBuf {
    find_pack_root(query)
        .or_else(|| query.parent().map(Path::to_path_buf))
        .unwrap_or_default()
        .join(".cache")
}

fn relative_to(path: &Path, root: &Path) -> Option<PathBuf> {
    path.strip_prefix(root).ok().map(Path::to_path_buf)
}

async fn copy_file(from: &Path, to: &Path) -> Result<(), PackError> {
    if let Some(parent) = to.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| PackError::io(parent, source))?;
    }
    tokio::fs::copy(from, to)
        .await
        .map(drop)
        .map_err(|source| PackError::io(from, source))
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), PackError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| PackError::io(path, source))
}
