//! Folds live run details into a per-session [`Results`] summary.

use mrva_client::AnalysisClient;
use mrva_core::{
    AnalysisStatus, FailedRunPolicy, RepoWithFindings, Results, Run, RunDetail, RunStatus,
    RunStatusEntry, Session, SessionStatus, SkipCategory,
};
use mrva_store::SessionStore;

use crate::error::EngineError;

/// Which stored sessions a status request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSelector {
    Name(String),
    Prefix(String),
}

/// Sessions matching `selector`, sorted by name for prefixes.
///
/// # Errors
///
/// [`EngineError::NotFound`] if a named session is absent.
pub fn select_sessions(
    store: &SessionStore,
    selector: &SessionSelector,
) -> Result<Vec<Session>, EngineError> {
    match selector {
        SessionSelector::Name(name) => Ok(vec![store.get(name)?]),
        SessionSelector::Prefix(prefix) => store
            .names_with_prefix(prefix)?
            .iter()
            .map(|name| store.get(name).map_err(EngineError::from))
            .collect(),
    }
}

/// Add one run's detail to `results`.
///
/// Only the per-repository counters and the run entry are touched; the
/// session status is decided by [`rollup_status`].
pub fn fold_run(results: &mut Results, run: &Run, detail: &RunDetail) {
    results.runs.push(RunStatusEntry {
        id: run.id,
        query: run.query.clone(),
        query_id: run.query_id.clone(),
        status: detail.status,
        failure_reason: detail.failure_reason.clone(),
    });

    for scanned in &detail.scanned_repositories {
        match scanned.analysis_status {
            AnalysisStatus::Succeeded => {
                results.total_successful_scans += 1;
                if scanned.has_findings() {
                    let count = scanned.findings();
                    results.total_findings_count += count;
                    results.total_repositories_with_findings += 1;
                    results.repositories_with_findings.push(RepoWithFindings {
                        nwo: scanned.repository.full_name.clone(),
                        query: run.query.clone(),
                        query_id: run.query_id.clone(),
                        count,
                        run_id: run.id,
                        stars: scanned.repository.stargazers_count,
                    });
                }
            }
            AnalysisStatus::Failed => results.total_failed_scans += 1,
            _ => {}
        }
    }

    for category in SkipCategory::ALL {
        let count = detail.skipped_repositories.group(category).repository_count;
        results.add_skipped(category, count);
    }
}

/// Session status from the statuses of its runs.
#[must_use]
pub fn rollup_status(statuses: &[RunStatus], policy: FailedRunPolicy) -> SessionStatus {
    if statuses.iter().all(|status| *status == RunStatus::Succeeded) {
        return SessionStatus::Succeeded;
    }
    match policy {
        FailedRunPolicy::FoldIntoInProgress => SessionStatus::InProgress,
        FailedRunPolicy::MarkFailed => {
            if statuses.contains(&RunStatus::InProgress) {
                SessionStatus::InProgress
            } else {
                SessionStatus::Failed
            }
        }
    }
}

/// Fetch every run of `session` and summarize it.
///
/// Every run is reported, even after one is found unfinished.
///
/// # Errors
///
/// [`EngineError::Remote`] if any status fetch fails.
pub async fn aggregate_session<C>(
    client: &C,
    session: &Session,
    policy: FailedRunPolicy,
) -> Result<Results, EngineError>
where
    C: AnalysisClient + ?Sized,
{
    let mut results = Results::new(&session.name);
    let mut statuses = Vec::with_capacity(session.runs.len());
    for run in &session.runs {
        let detail = client.run_status(&session.controller, run.id).await?;
        tracing::debug!(session = %session.name, run_id = run.id, status = %detail.status, "fetched run");
        statuses.push(detail.status);
        fold_run(&mut results, run, &detail);
    }
    results.status = rollup_status(&statuses, policy);
    Ok(results)
}

/// Summaries for every session matched by `selector`.
///
/// # Errors
///
/// See [`select_sessions`] and [`aggregate_session`].
pub async fn aggregate<C>(
    client: &C,
    store: &SessionStore,
    selector: &SessionSelector,
    policy: FailedRunPolicy,
) -> Result<Vec<Results>, EngineError>
where
    C: AnalysisClient + ?Sized,
{
    let sessions = select_sessions(store, selector)?;
    let mut all = Vec::with_capacity(sessions.len());
    for session in &sessions {
        all.push(aggregate_session(client, session, policy).await?);
    }
    Ok(all)
}
