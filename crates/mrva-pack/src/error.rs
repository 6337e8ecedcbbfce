//! Pack and list error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    /// Filesystem error while preparing a pack or reading a list.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The repository list file is not a JSON object of string arrays.
    #[error("invalid repository list file {}: {source}", path.display())]
    ListFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The requested list is not in the list file.
    #[error("list '{list}' not found in {}", path.display())]
    ListNotFound { list: String, path: PathBuf },

    /// The query file does not exist.
    #[error("query file {} does not exist", .0.display())]
    QueryNotFound(PathBuf),

    /// The query carries no `@id` metadata.
    #[error("no query id found in metadata of {}", .0.display())]
    MissingQueryId(PathBuf),

    /// A query suite resolved to no queries.
    #[error("no queries found in suite {}", .0.display())]
    EmptySuite(PathBuf),

    /// The toolchain could not be started or exited unsuccessfully.
    #[error("`codeql {command}` failed: {output}")]
    Toolchain { command: String, output: String },

    /// Toolchain output was not the expected JSON.
    #[error("unexpected output from `codeql {command}`: {source}")]
    ToolchainOutput {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// A pack definition could not be parsed or written.
    #[error("invalid qlpack.yml: {0}")]
    PackFile(#[from] serde_yaml::Error),
}

impl PackError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
