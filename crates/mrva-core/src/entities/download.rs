use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::enums::ArtifactKind;

/// Result files carried inside a run artifact, paired with the extension
/// each is written under.
pub const RESULT_ENTRIES: [(&str, &str); 2] = [("results.sarif", "sarif"), ("results.bqrs", "bqrs")];

/// Deterministic file stem for one repository within one run.
///
/// Path separators in the repository name are flattened so the stem is a
/// single path component; the run id keeps stems from different runs apart.
#[must_use]
pub fn output_stem(nwo: &str, run_id: u64) -> String {
    let flat: String = nwo
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
        .collect();
    format!("{flat}_{run_id}")
}

/// One retrievable unit. Generated fresh from live run data; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadTask {
    pub run_id: u64,
    pub nwo: String,
    pub controller: String,
    pub query_id: String,
    pub language: String,
    pub kind: ArtifactKind,
    pub output_dir: PathBuf,
    pub stem: String,
}

impl DownloadTask {
    /// Destination for a result file with the given extension.
    #[must_use]
    pub fn result_path(&self, extension: &str) -> PathBuf {
        result_path(&self.output_dir, &self.stem, extension)
    }

    /// Destination for the database archive.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        database_path(&self.output_dir, &self.stem)
    }
}

#[must_use]
pub fn result_path(output_dir: &Path, stem: &str, extension: &str) -> PathBuf {
    output_dir.join(format!("{stem}.{extension}"))
}

#[must_use]
pub fn database_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(format!("{stem}_db.zip"))
}
