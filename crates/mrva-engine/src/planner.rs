//! Chunked submission of one or more queries against a repository list.

use chrono::Utc;
use mrva_client::AnalysisClient;
use mrva_core::{QueryBundle, Run, Session};
use mrva_store::SessionStore;

use crate::error::EngineError;

/// Most repositories the controller accepts in one run.
pub const MAX_REPOSITORIES_PER_RUN: usize = 1000;

/// Everything needed to submit a new session.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub name: String,
    pub controller: String,
    pub language: String,
    pub list_file: String,
    pub list: String,
    pub repositories: Vec<String>,
    pub bundles: Vec<QueryBundle>,
}

/// Contiguous chunks of at most `ceiling` repositories, in input order.
pub fn chunk_repositories(
    repositories: &[String],
    ceiling: usize,
) -> impl Iterator<Item = &[String]> {
    repositories.chunks(ceiling.max(1))
}

/// Fail with [`EngineError::AlreadyExists`] if `name` is taken.
///
/// # Errors
///
/// Also fails if the store cannot be read.
pub fn ensure_available(store: &SessionStore, name: &str) -> Result<(), EngineError> {
    if store.contains(name)? {
        return Err(EngineError::AlreadyExists {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Submit every bundle against every chunk and persist the session.
///
/// The session is only written once all submissions succeeded. Runs created
/// before a failing submission are left on the controller and logged.
///
/// # Errors
///
/// Before any remote call: [`EngineError::AlreadyExists`] if the name is
/// taken, [`EngineError::Invalid`] for a blank name or controller,
/// [`EngineError::NothingToSubmit`] for an empty list or no queries.
/// [`EngineError::Remote`] on the first failed submission.
pub async fn submit<C>(
    client: &C,
    store: &SessionStore,
    request: SubmitRequest,
    ceiling: usize,
) -> Result<Session, EngineError>
where
    C: AnalysisClient + ?Sized,
{
    ensure_available(store, &request.name)?;
    let mut session = Session {
        name: request.name,
        timestamp: Utc::now(),
        controller: request.controller,
        language: request.language,
        list_file: request.list_file,
        list: request.list,
        repository_count: request.repositories.len(),
        runs: Vec::new(),
    };
    session.validate()?;
    if request.repositories.is_empty() {
        return Err(EngineError::NothingToSubmit("repository list is empty"));
    }
    if request.bundles.is_empty() {
        return Err(EngineError::NothingToSubmit("no queries given"));
    }

    let mut runs = Vec::new();
    for bundle in &request.bundles {
        for chunk in chunk_repositories(&request.repositories, ceiling) {
            let submitted = client
                .submit_run(&session.controller, &session.language, chunk, &bundle.encoded)
                .await;
            let id = match submitted {
                Ok(id) => id,
                Err(error) => {
                    if !runs.is_empty() {
                        let orphaned: Vec<u64> = runs.iter().map(|run: &Run| run.id).collect();
                        tracing::warn!(
                            session = %session.name,
                            ?orphaned,
                            "submission failed, earlier runs are not tracked"
                        );
                    }
                    return Err(error.into());
                }
            };
            tracing::info!(
                session = %session.name,
                run_id = id,
                query = %bundle.query_path,
                repositories = chunk.len(),
                "submitted run"
            );
            runs.push(Run {
                id,
                query: bundle.query_path.clone(),
                query_id: bundle.query_id.clone(),
            });
        }
    }

    session.runs = runs;
    store.put(session.clone())?;
    Ok(session)
}
