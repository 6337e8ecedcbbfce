//! Scripted in-memory controller shared by the engine tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use mrva_client::{AnalysisClient, ClientError};
use mrva_core::{
    AnalysisStatus, ArtifactLocation, RepositoryRef, Run, RunDetail, RunStatus, ScannedRepository,
    Session, SkippedRepositories,
};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const BROKEN_REPO: &str = "o/broken";

#[derive(Default)]
pub struct FakeClient {
    details: Mutex<HashMap<u64, RunDetail>>,
    submitted: Mutex<Vec<Vec<String>>>,
    next_run_id: AtomicU64,
    fail_submit_at: Option<usize>,
    pub submit_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub blob_calls: AtomicUsize,
    pub database_calls: AtomicUsize,
}

impl FakeClient {
    pub fn new() -> Self {
        Self {
            next_run_id: AtomicU64::new(100),
            ..Self::default()
        }
    }

    /// Fail the `n`th submission (zero-based).
    pub fn failing_submit_at(n: usize) -> Self {
        Self {
            fail_submit_at: Some(n),
            ..Self::new()
        }
    }

    pub fn with_run(self, detail: RunDetail) -> Self {
        self.details.lock().unwrap().insert(detail.id, detail);
        self
    }

    pub fn submitted_chunks(&self) -> Vec<Vec<String>> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn download_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
            + self.blob_calls.load(Ordering::SeqCst)
            + self.database_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisClient for FakeClient {
    async fn submit_run(
        &self,
        _controller: &str,
        _language: &str,
        repositories: &[String],
        _bundle: &str,
    ) -> Result<u64, ClientError> {
        let n = self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_submit_at == Some(n) {
            return Err(ClientError::Api {
                status: 502,
                message: "bad gateway".into(),
            });
        }
        self.submitted.lock().unwrap().push(repositories.to_vec());
        Ok(self.next_run_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn run_status(&self, _controller: &str, run_id: u64) -> Result<RunDetail, ClientError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .lock()
            .unwrap()
            .get(&run_id)
            .cloned()
            .ok_or_else(|| ClientError::Api {
                status: 404,
                message: format!("run {run_id} not found"),
            })
    }

    async fn run_repository_detail(
        &self,
        _controller: &str,
        run_id: u64,
        nwo: &str,
    ) -> Result<ArtifactLocation, ClientError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(ArtifactLocation {
            artifact_url: Some(format!("https://blobs.test/{run_id}/{nwo}")),
        })
    }

    async fn fetch_blob(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        self.blob_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if url.ends_with(BROKEN_REPO) {
            return Ok(artifact(&[("README.md", "no results here")]));
        }
        Ok(artifact(&[
            ("results.sarif", r#"{"rules":[{"id":"remote-query"}]}"#),
            ("results.bqrs", "bqrs-bytes"),
        ]))
    }

    async fn fetch_database(&self, nwo: &str, language: &str) -> Result<Vec<u8>, ClientError> {
        self.database_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(format!("db:{nwo}:{language}").into_bytes())
    }
}

pub fn artifact(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn repo(nwo: &str, status: AnalysisStatus, count: u64) -> ScannedRepository {
    ScannedRepository {
        repository: RepositoryRef {
            full_name: nwo.into(),
            stargazers_count: 7,
            private: false,
        },
        analysis_status: status,
        result_count: Some(count),
        artifact_size_in_bytes: Some(1024),
    }
}

pub fn detail(id: u64, status: RunStatus, repos: Vec<ScannedRepository>) -> RunDetail {
    RunDetail {
        id,
        status,
        failure_reason: None,
        scanned_repositories: repos,
        skipped_repositories: SkippedRepositories::default(),
    }
}

pub fn session(name: &str, run_ids: &[u64]) -> Session {
    Session {
        name: name.to_string(),
        timestamp: Utc::now(),
        controller: "octo/ctl".into(),
        language: "java".into(),
        list_file: "lists.json".into(),
        list: "top".into(),
        repository_count: 10,
        runs: run_ids
            .iter()
            .map(|id| Run {
                id: *id,
                query: "Q.ql".into(),
                query_id: "java/q".into(),
            })
            .collect(),
    }
}
