//! # mrva-core
//!
//! Core types and error types for mrva.
//!
//! This crate provides the foundational types shared across all mrva crates:
//! - Durable session records (`Session`, `Run`)
//! - The typed view of a remote run (`RunDetail`) decoded from the controller
//! - Download tasks and the deterministic output-file naming they rely on
//! - The per-session `Results` rollup
//! - Status enums and cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;

pub use entities::{
    ArtifactLocation, DownloadTask, QueryBundle, RESULT_ENTRIES, RepoWithFindings, RepositoryRef,
    Results, Run, RunDetail, RunStatusEntry, ScannedRepository, Session, SkippedGroup,
    SkippedRepositories, database_path, output_stem, result_path,
};
pub use enums::{
    AnalysisStatus, ArtifactKind, FailedRunPolicy, RunStatus, SessionStatus, SkipCategory,
};
pub use errors::CoreError;

/// Token the controller writes into result files in place of the query id.
pub const PLACEHOLDER_QUERY_ID: &str = "remote-query";
