use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// One remote job handle: a single (query, repository chunk) submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Run {
    /// Identifier assigned by the controller.
    pub id: u64,
    /// Query file that produced this run.
    pub query: String,
    /// Stable logical id of the query, used to relabel artifact contents.
    #[serde(default)]
    pub query_id: String,
}

/// A named, durable collection of runs sharing one submission context.
///
/// Sessions are written once by the submission planner and never mutated
/// afterwards; the only other transition is deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub controller: String,
    pub language: String,
    pub list_file: String,
    pub list: String,
    pub repository_count: usize,
    #[serde(default)]
    pub runs: Vec<Run>,
}

impl Session {
    /// Check the invariants a session must satisfy before it is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the name or controller is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("session name must not be empty".into()));
        }
        if self.controller.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "session '{}' has no controller",
                self.name
            )));
        }
        Ok(())
    }

    /// Find a run by its controller-assigned id.
    #[must_use]
    pub fn run(&self, id: u64) -> Option<&Run> {
        self.runs.iter().find(|run| run.id == id)
    }

    /// A copy of this session restricted to the single run `id`.
    #[must_use]
    pub fn fragment_for_run(&self, id: u64) -> Option<Self> {
        let run = self.run(id)?.clone();
        Some(Self {
            runs: vec![run],
            ..self.clone()
        })
    }
}

/// An encoded query pack ready for submission.
///
/// The planner treats `encoded` as opaque; it is produced by a bundle builder
/// and forwarded verbatim to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBundle {
    pub query_path: String,
    pub query_id: String,
    pub encoded: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session {
            name: "s1".into(),
            timestamp: Utc::now(),
            controller: "octo/controller".into(),
            language: "java".into(),
            list_file: "lists.json".into(),
            list: "top".into(),
            repository_count: 3,
            runs: vec![
                Run {
                    id: 1,
                    query: "a.ql".into(),
                    query_id: "java/a".into(),
                },
                Run {
                    id: 2,
                    query: "b.ql".into(),
                    query_id: "java/b".into(),
                },
            ],
        }
    }

    #[test]
    fn fragment_keeps_metadata_and_one_run() {
        let s = session();
        let fragment = s.fragment_for_run(2).expect("run 2 exists");
        assert_eq!(fragment.name, "s1");
        assert_eq!(fragment.controller, "octo/controller");
        assert_eq!(fragment.runs.len(), 1);
        assert_eq!(fragment.runs[0].query_id, "java/b");
        assert!(s.fragment_for_run(99).is_none());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let mut s = session();
        s.name = "  ".into();
        assert!(s.validate().is_err());
        assert!(session().validate().is_ok());
    }

    #[test]
    fn run_without_query_id_deserializes() {
        let run: Run = serde_json::from_str(r#"{"id": 7, "query": "x.ql"}"#).unwrap();
        assert_eq!(run.id, 7);
        assert!(run.query_id.is_empty());
    }
}
