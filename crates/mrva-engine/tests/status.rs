mod common;

use common::{FakeClient, detail, repo, session};
use mrva_core::{AnalysisStatus, FailedRunPolicy, RunStatus, SessionStatus};
use mrva_engine::{EngineError, SessionSelector, aggregate, aggregate_session};
use mrva_store::SessionStore;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[tokio::test]
async fn unfinished_run_keeps_session_in_progress_but_is_reported() {
    let client = FakeClient::new()
        .with_run(detail(
            1,
            RunStatus::Succeeded,
            vec![repo("o/a", AnalysisStatus::Succeeded, 5)],
        ))
        .with_run(detail(
            2,
            RunStatus::InProgress,
            vec![repo("o/b", AnalysisStatus::Succeeded, 2)],
        ));

    let results = aggregate_session(&client, &session("s", &[1, 2]), FailedRunPolicy::default())
        .await
        .unwrap();

    assert_eq!(results.status, SessionStatus::InProgress);
    assert_eq!(results.runs.len(), 2);
    assert_eq!(results.total_findings_count, 7);
    assert_eq!(results.total_repositories_with_findings, 2);
}

#[tokio::test]
async fn all_succeeded_session_succeeds() {
    let client = FakeClient::new()
        .with_run(detail(1, RunStatus::Succeeded, vec![]))
        .with_run(detail(2, RunStatus::Succeeded, vec![]));

    let results = aggregate_session(&client, &session("s", &[1, 2]), FailedRunPolicy::default())
        .await
        .unwrap();
    assert_eq!(results.status, SessionStatus::Succeeded);
}

#[tokio::test]
async fn failed_run_follows_policy() {
    let client = FakeClient::new()
        .with_run(detail(1, RunStatus::Succeeded, vec![]))
        .with_run(detail(2, RunStatus::Failed, vec![]));
    let s = session("s", &[1, 2]);

    let folded = aggregate_session(&client, &s, FailedRunPolicy::FoldIntoInProgress)
        .await
        .unwrap();
    let marked = aggregate_session(&client, &s, FailedRunPolicy::MarkFailed)
        .await
        .unwrap();

    assert_eq!(folded.status, SessionStatus::InProgress);
    assert_eq!(marked.status, SessionStatus::Failed);
}

#[tokio::test]
async fn prefix_selects_sorted_sessions() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::open(dir.path().join("sessions.json")).unwrap();
    store.put(session("exp-b", &[2])).unwrap();
    store.put(session("exp-a", &[1])).unwrap();
    store.put(session("other", &[3])).unwrap();
    let client = FakeClient::new()
        .with_run(detail(1, RunStatus::Succeeded, vec![]))
        .with_run(detail(2, RunStatus::Succeeded, vec![]));

    let all = aggregate(
        &client,
        &store,
        &SessionSelector::Prefix("exp-".into()),
        FailedRunPolicy::default(),
    )
    .await
    .unwrap();

    let names: Vec<&str> = all.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["exp-a", "exp-b"]);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::open(dir.path().join("sessions.json")).unwrap();

    let err = aggregate(
        &FakeClient::new(),
        &store,
        &SessionSelector::Name("nope".into()),
        FailedRunPolicy::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { ref name } if name == "nope"));
}
