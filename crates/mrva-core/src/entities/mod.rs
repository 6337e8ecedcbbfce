//! Entity types for mrva.

mod download;
mod results;
mod run_detail;
mod session;

pub use download::{RESULT_ENTRIES, DownloadTask, database_path, output_stem, result_path};
pub use results::{RepoWithFindings, Results, RunStatusEntry};
pub use run_detail::{
    ArtifactLocation, RepositoryRef, RunDetail, ScannedRepository, SkippedGroup,
    SkippedRepositories,
};
pub use session::{QueryBundle, Run, Session};
