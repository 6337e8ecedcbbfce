//! Idempotent, concurrent download of run artifacts and databases.
//!
//! Retrieval is split in two phases. Planning is sequential: it fetches the
//! status of every run, refuses to continue while any run is in progress and
//! decides which files are missing. Execution drains the planned tasks with a
//! fixed pool of workers sharing one queue, reporting each completion as it
//! arrives.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mrva_client::AnalysisClient;
use mrva_core::{
    ArtifactKind, DownloadTask, RESULT_ENTRIES, RunStatus, Session, database_path, output_stem,
    result_path,
};
use serde::Serialize;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;

use crate::error::EngineError;
use crate::worker::{TaskOutcome, run_task};

/// Default size of the download worker pool.
pub const DEFAULT_WORKERS: usize = 10;

/// What to download and where.
#[derive(Debug, Clone)]
pub struct RetrievalRequest {
    pub output_dir: PathBuf,
    pub download_databases: bool,
    pub nwo: Option<String>,
    pub workers: usize,
}

impl RetrievalRequest {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            download_databases: false,
            nwo: None,
            workers: DEFAULT_WORKERS,
        }
    }

    fn wants(&self, nwo: &str) -> bool {
        self.nwo.as_deref().is_none_or(|filter| filter == nwo)
    }
}

/// Tasks to run plus how many downloads were already on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalPlan {
    pub tasks: Vec<DownloadTask>,
    pub already_present: usize,
}

/// Reported once per finished task, in completion order.
#[derive(Debug)]
pub struct DownloadEvent<'a> {
    pub completed: usize,
    pub total: usize,
    pub task: &'a DownloadTask,
    pub outcome: &'a TaskOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskFailure {
    pub nwo: String,
    pub run_id: u64,
    pub kind: ArtifactKind,
    pub reason: String,
}

/// Summary of a retrieval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetrievalReport {
    pub session: String,
    pub output_dir: PathBuf,
    pub planned: usize,
    pub already_present: usize,
    pub downloaded: usize,
    pub failures: Vec<TaskFailure>,
}

/// Decide which downloads `session` still needs.
///
/// # Errors
///
/// [`EngineError::NotReady`] if any run is still in progress,
/// [`EngineError::Remote`] if a status fetch fails and
/// [`EngineError::Io`] if the output directory cannot be created.
pub async fn plan<C>(
    client: &C,
    session: &Session,
    request: &RetrievalRequest,
) -> Result<RetrievalPlan, EngineError>
where
    C: AnalysisClient + ?Sized,
{
    let dir = &request.output_dir;
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| EngineError::Io {
            path: dir.clone(),
            source,
        })?;

    let mut details = Vec::with_capacity(session.runs.len());
    for run in &session.runs {
        let detail = client.run_status(&session.controller, run.id).await?;
        if detail.status == RunStatus::InProgress {
            return Err(EngineError::NotReady { run_id: run.id });
        }
        details.push((run, detail));
    }

    let mut plan = RetrievalPlan::default();
    for (run, detail) in &details {
        for scanned in &detail.scanned_repositories {
            let nwo = &scanned.repository.full_name;
            if !scanned.has_findings() || !request.wants(nwo) {
                continue;
            }
            let stem = output_stem(nwo, run.id);
            let task = |kind| DownloadTask {
                run_id: run.id,
                nwo: nwo.clone(),
                controller: session.controller.clone(),
                query_id: run.query_id.clone(),
                language: session.language.clone(),
                kind,
                output_dir: dir.clone(),
                stem: stem.clone(),
            };

            if results_present(dir, &stem) {
                plan.already_present += 1;
            } else {
                plan.tasks.push(task(ArtifactKind::Artifact));
            }
            if request.download_databases {
                if database_path(dir, &stem).exists() {
                    plan.already_present += 1;
                } else {
                    plan.tasks.push(task(ArtifactKind::Database));
                }
            }
        }
    }
    tracing::info!(
        session = %session.name,
        planned = plan.tasks.len(),
        already_present = plan.already_present,
        "planned retrieval"
    );
    Ok(plan)
}

fn results_present(dir: &Path, stem: &str) -> bool {
    RESULT_ENTRIES
        .iter()
        .any(|(_, extension)| result_path(dir, stem, extension).exists())
}

/// Run `tasks` on `workers` concurrent workers.
///
/// `on_event` is called on the calling task once per completion, so it needs
/// no synchronisation. Returns after every task has finished.
///
/// # Errors
///
/// [`EngineError::Worker`] if a worker panicked. Individual download
/// failures are reported in the returned report instead.
pub async fn execute<C, F>(
    client: Arc<C>,
    tasks: Vec<DownloadTask>,
    workers: usize,
    mut on_event: F,
) -> Result<RetrievalReport, EngineError>
where
    C: AnalysisClient + ?Sized + 'static,
    F: FnMut(&DownloadEvent<'_>),
{
    let total = tasks.len();
    let mut report = RetrievalReport {
        planned: total,
        ..RetrievalReport::default()
    };
    if total == 0 {
        return Ok(report);
    }

    let (queue_tx, queue_rx) = mpsc::unbounded_channel();
    for task in tasks {
        // The receiver is alive until the workers below drop it.
        let _ = queue_tx.send(task);
    }
    drop(queue_tx);
    let queue = Arc::new(Mutex::new(queue_rx));

    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(DownloadTask, TaskOutcome)>();
    let mut pool = JoinSet::new();
    for _ in 0..workers.clamp(1, total) {
        let queue = Arc::clone(&queue);
        let done = done_tx.clone();
        let client = Arc::clone(&client);
        pool.spawn(async move {
            loop {
                let next = queue.lock().await.recv().await;
                let Some(task) = next else { break };
                let outcome = run_task(client.as_ref(), &task).await;
                if done.send((task, outcome)).is_err() {
                    break;
                }
            }
        });
    }
    drop(done_tx);

    let mut completed = 0;
    while let Some((task, outcome)) = done_rx.recv().await {
        completed += 1;
        on_event(&DownloadEvent {
            completed,
            total,
            task: &task,
            outcome: &outcome,
        });
        match outcome {
            TaskOutcome::Downloaded { .. } => report.downloaded += 1,
            TaskOutcome::Failed { reason } => report.failures.push(TaskFailure {
                nwo: task.nwo,
                run_id: task.run_id,
                kind: task.kind,
                reason,
            }),
        }
    }

    while let Some(joined) = pool.join_next().await {
        joined?;
    }
    Ok(report)
}

/// Plan and execute retrieval of `session` into `request.output_dir`.
///
/// # Errors
///
/// See [`plan`] and [`execute`].
pub async fn retrieve<C, F>(
    client: Arc<C>,
    session: &Session,
    request: &RetrievalRequest,
    on_event: F,
) -> Result<RetrievalReport, EngineError>
where
    C: AnalysisClient + ?Sized + 'static,
    F: FnMut(&DownloadEvent<'_>),
{
    let plan = plan(client.as_ref(), session, request).await?;
    let mut report = execute(client, plan.tasks, request.workers, on_event).await?;
    report.session.clone_from(&session.name);
    report.output_dir.clone_from(&request.output_dir);
    report.already_present = plan.already_present;
    Ok(report)
}
