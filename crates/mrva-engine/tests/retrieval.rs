mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{BROKEN_REPO, FakeClient, detail, repo, session};
use mrva_core::{AnalysisStatus, ArtifactKind, RunStatus};
use mrva_engine::retrieval::{execute, plan};
use mrva_engine::{EngineError, RetrievalRequest, retrieve};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn finished_client() -> FakeClient {
    FakeClient::new().with_run(detail(
        1,
        RunStatus::Succeeded,
        vec![
            repo("o/a", AnalysisStatus::Succeeded, 5),
            repo("o/b", AnalysisStatus::Succeeded, 1),
            repo("o/empty", AnalysisStatus::Succeeded, 0),
            repo("o/failed", AnalysisStatus::Failed, 0),
        ],
    ))
}

#[tokio::test]
async fn downloads_and_relabels_results() {
    let out = TempDir::new().unwrap();
    let client = Arc::new(finished_client());

    let report = retrieve(
        Arc::clone(&client),
        &session("s", &[1]),
        &RetrievalRequest::new(out.path()),
        |_| {},
    )
    .await
    .unwrap();

    assert_eq!(report.planned, 2);
    assert_eq!(report.downloaded, 2);
    assert!(report.failures.is_empty());
    let sarif = std::fs::read_to_string(out.path().join("o_a_1.sarif")).unwrap();
    assert_eq!(sarif, r#"{"rules":[{"id":"java/q"}]}"#);
    assert!(out.path().join("o_b_1.bqrs").exists());
    assert!(!out.path().join("o_empty_1.sarif").exists());
}

#[tokio::test]
async fn second_retrieval_makes_no_download_calls() {
    let out = TempDir::new().unwrap();
    let client = Arc::new(finished_client());
    let s = session("s", &[1]);
    let mut request = RetrievalRequest::new(out.path());
    request.download_databases = true;

    retrieve(Arc::clone(&client), &s, &request, |_| {})
        .await
        .unwrap();
    let after_first = client.download_calls();
    assert_eq!(client.database_calls.load(Ordering::SeqCst), 2);

    let report = retrieve(Arc::clone(&client), &s, &request, |_| {})
        .await
        .unwrap();

    assert_eq!(client.download_calls(), after_first);
    assert_eq!(report.planned, 0);
    assert_eq!(report.already_present, 4);
}

#[tokio::test]
async fn repository_filter_limits_tasks() {
    let out = TempDir::new().unwrap();
    let client = finished_client();
    let mut request = RetrievalRequest::new(out.path());
    request.nwo = Some("o/a".into());
    request.download_databases = true;

    let planned = plan(&client, &session("s", &[1]), &request).await.unwrap();

    assert_eq!(planned.tasks.len(), 2);
    assert!(planned.tasks.iter().all(|task| task.nwo == "o/a"));
    let kinds: HashSet<ArtifactKind> = planned.tasks.iter().map(|task| task.kind).collect();
    assert_eq!(kinds.len(), 2);
}

#[tokio::test]
async fn in_progress_run_aborts_before_any_download() {
    let out = TempDir::new().unwrap();
    let client = Arc::new(
        finished_client().with_run(detail(
            2,
            RunStatus::InProgress,
            vec![repo("o/c", AnalysisStatus::Succeeded, 3)],
        )),
    );

    let err = retrieve(
        Arc::clone(&client),
        &session("s", &[1, 2]),
        &RetrievalRequest::new(out.path()),
        |_| {},
    )
    .await
    .unwrap_err();

    assert!(matches!(err, EngineError::NotReady { run_id: 2 }));
    assert_eq!(client.download_calls(), 0);
}

#[tokio::test]
async fn task_failure_does_not_stop_siblings() {
    let out = TempDir::new().unwrap();
    let client = Arc::new(FakeClient::new().with_run(detail(
        1,
        RunStatus::Succeeded,
        vec![
            repo(BROKEN_REPO, AnalysisStatus::Succeeded, 1),
            repo("o/a", AnalysisStatus::Succeeded, 1),
        ],
    )));

    let report = retrieve(
        Arc::clone(&client),
        &session("s", &[1]),
        &RetrievalRequest::new(out.path()),
        |_| {},
    )
    .await
    .unwrap();

    assert_eq!(report.downloaded, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].nwo, BROKEN_REPO);
    assert!(out.path().join("o_a_1.sarif").exists());
}

#[tokio::test]
async fn three_workers_complete_ten_tasks_exactly_once() {
    let out = TempDir::new().unwrap();
    let repos = (0..10)
        .map(|i| repo(&format!("o/r{i}"), AnalysisStatus::Succeeded, 1))
        .collect();
    let client = Arc::new(FakeClient::new().with_run(detail(1, RunStatus::Succeeded, repos)));
    let request = RetrievalRequest::new(out.path());
    let planned = plan(client.as_ref(), &session("s", &[1]), &request)
        .await
        .unwrap();
    assert_eq!(planned.tasks.len(), 10);

    let mut seen = Vec::new();
    let mut last = 0;
    let report = execute(Arc::clone(&client), planned.tasks, 3, |event| {
        assert_eq!(event.completed, last + 1);
        assert_eq!(event.total, 10);
        last = event.completed;
        seen.push(event.task.nwo.clone());
    })
    .await
    .unwrap();

    assert_eq!(last, 10);
    assert_eq!(report.downloaded, 10);
    let unique: HashSet<&String> = seen.iter().collect();
    assert_eq!(unique.len(), 10);
    assert_eq!(client.blob_calls.load(Ordering::SeqCst), 10);
}
