//! Thin wrapper around the `codeql` command-line toolchain.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tokio::process::Command;

use crate::error::PackError;

/// Invokes `codeql` subcommands and decodes their JSON output.
#[derive(Debug, Clone)]
pub struct Toolchain {
    binary: PathBuf,
    additional_packs: Option<PathBuf>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Toolchain {
    /// A toolchain resolved from `PATH`, optionally searching
    /// `additional_packs` for library packs.
    #[must_use]
    pub fn new(additional_packs: Option<PathBuf>) -> Self {
        Self {
            binary: PathBuf::from("codeql"),
            additional_packs,
        }
    }

    /// Query files a suite expands to.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::EmptySuite`] if the suite resolves to nothing.
    pub async fn resolve_queries(&self, suite: &Path) -> Result<Vec<PathBuf>, PackError> {
        let queries: Vec<PathBuf> = self
            .json(&["resolve", "queries", "--format=json"], suite, true)
            .await?;
        if queries.is_empty() {
            return Err(PackError::EmptySuite(suite.to_path_buf()));
        }
        Ok(queries)
    }

    /// The `@id` declared in a query's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::MissingQueryId`] if the query declares no id.
    pub async fn resolve_query_id(&self, query: &Path) -> Result<String, PackError> {
        let metadata: HashMap<String, serde_json::Value> = self
            .json(&["resolve", "metadata", "--format=json"], query, false)
            .await?;
        metadata
            .get("id")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PackError::MissingQueryId(query.to_path_buf()))
    }

    /// Files that make up a pack, excluding its queries.
    ///
    /// # Errors
    ///
    /// Returns [`PackError`] if the toolchain fails.
    pub async fn packlist(&self, pack_root: &Path) -> Result<Vec<PathBuf>, PackError> {
        #[derive(serde::Deserialize)]
        struct Packlist {
            #[serde(default)]
            paths: Vec<PathBuf>,
        }

        let list: Packlist = self
            .json(
                &["pack", "packlist", "--format=json", "--no-include-queries"],
                pack_root,
                false,
            )
            .await?;
        Ok(list.paths)
    }

    /// Install the dependencies of the pack in `pack_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::Toolchain`] if the install fails.
    pub async fn pack_install(&self, pack_dir: &Path) -> Result<(), PackError> {
        self.run(&["pack", "install"], &[pack_dir.as_os_str().to_owned()], true)
            .await
            .map(drop)
    }

    /// Compile and bundle `pack_dir` into `output`.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::Toolchain`] if bundling fails.
    pub async fn pack_bundle(
        &self,
        pack_dir: &Path,
        output: &Path,
        compilation_cache: &Path,
    ) -> Result<(), PackError> {
        let mut cache_flag = OsString::from("--compilation-cache=");
        cache_flag.push(compilation_cache);
        let tail = vec![
            OsString::from("-o"),
            output.as_os_str().to_owned(),
            pack_dir.as_os_str().to_owned(),
            OsString::from("--qlx"),
            OsString::from("--no-default-compilation-cache"),
            cache_flag,
        ];
        self.run(&["pack", "bundle"], &tail, true).await.map(drop)
    }

    async fn json<T: DeserializeOwned>(
        &self,
        head: &[&str],
        target: &Path,
        with_packs: bool,
    ) -> Result<T, PackError> {
        let stdout = self
            .run(head, &[target.as_os_str().to_owned()], with_packs)
            .await?;
        serde_json::from_slice(&stdout).map_err(|source| PackError::ToolchainOutput {
            command: head.join(" "),
            source,
        })
    }

    async fn run(
        &self,
        head: &[&str],
        tail: &[OsString],
        with_packs: bool,
    ) -> Result<Vec<u8>, PackError> {
        let command = head.join(" ");
        let mut cmd = Command::new(&self.binary);
        cmd.args(head).args(tail);
        if with_packs && let Some(packs) = &self.additional_packs {
            let mut flag = OsString::from("--additional-packs=");
            flag.push(packs);
            cmd.arg(flag);
        }

        tracing::debug!(%command, "running codeql");
        let output = cmd.output().await.map_err(|error| PackError::Toolchain {
            command: command.clone(),
            output: error.to_string(),
        })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(PackError::Toolchain {
                command,
                output: combined.trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}
