//! # mrva-engine
//!
//! Orchestration of multi-repository variant analysis runs:
//! - [`planner`]: chunked submission of queries and session creation
//! - [`status`]: roll-up of live run details into [`mrva_core::Results`]
//! - [`retrieval`]: idempotent, concurrent artifact and database downloads
//!
//! Every remote interaction goes through [`mrva_client::AnalysisClient`];
//! sessions are read from and written to [`mrva_store::SessionStore`].

mod error;
pub mod planner;
pub mod retrieval;
pub mod status;
mod worker;

pub use error::{EngineError, TaskError};
pub use planner::{MAX_REPOSITORIES_PER_RUN, SubmitRequest, ensure_available, submit};
pub use retrieval::{
    DEFAULT_WORKERS, DownloadEvent, RetrievalPlan, RetrievalReport, RetrievalRequest, TaskFailure,
    retrieve,
};
pub use status::{SessionSelector, aggregate, aggregate_session};
pub use worker::TaskOutcome;
