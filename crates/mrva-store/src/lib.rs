//! # mrva-store
//!
//! Durable mapping from a run name to its [`Session`].
//!
//! The store is a single JSON document (`name -> Session`). Every mutation
//! reads the whole document, changes it in memory and rewrites it; there are
//! no partial updates. Concurrent writers are not coordinated and the last
//! writer wins.

mod error;

pub use error::StoreError;

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use mrva_core::Session;
use tempfile::NamedTempFile;

type SessionMap = BTreeMap<String, Session>;

/// File-backed session store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Open the store at `path`, creating an empty document (and its parent
    /// directory) if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory or file cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(&path, b"").map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "created empty session store");
        }
        Ok(Self { path })
    }

    /// Persist a new session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if the name is taken, or
    /// [`StoreError::Invalid`] if the session fails validation.
    pub fn put(&self, session: Session) -> Result<(), StoreError> {
        session.validate()?;
        let mut sessions = self.read_all()?;
        if sessions.contains_key(&session.name) {
            return Err(StoreError::AlreadyExists { name: session.name });
        }
        tracing::debug!(name = %session.name, runs = session.runs.len(), "storing session");
        sessions.insert(session.name.clone(), session);
        self.write_all(&sessions)
    }

    /// Look up a session by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no session has this name.
    pub fn get(&self, name: &str) -> Result<Session, StoreError> {
        self.read_all()?
            .remove(name)
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_string(),
            })
    }

    /// Whether a session with this name exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn contains(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.read_all()?.contains_key(name))
    }

    /// The session containing run `run_id`, restricted to that single run.
    ///
    /// Linear scan over every session's runs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RunNotFound`] if no session contains the run.
    pub fn get_by_run_id(&self, run_id: u64) -> Result<Session, StoreError> {
        self.read_all()?
            .values()
            .find_map(|session| session.fragment_for_run(run_id))
            .ok_or(StoreError::RunNotFound { run_id })
    }

    /// Names of every session starting with `prefix`, in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn names_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .read_all()?
            .into_keys()
            .filter(|name| name.starts_with(prefix))
            .collect())
    }

    /// Every stored session, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn list(&self) -> Result<Vec<Session>, StoreError> {
        Ok(self.read_all()?.into_values().collect())
    }

    /// Remove a session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no session has this name.
    pub fn delete(&self, name: &str) -> Result<Session, StoreError> {
        let mut sessions = self.read_all()?;
        let removed = sessions.remove(name).ok_or_else(|| StoreError::NotFound {
            name: name.to_string(),
        })?;
        self.write_all(&sessions)?;
        tracing::debug!(name, "deleted session");
        Ok(removed)
    }

    fn read_all(&self) -> Result<SessionMap, StoreError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(SessionMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(SessionMap::new());
        }
        serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, sessions: &SessionMap) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(sessions).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        // Write beside the store and rename over it, so a crash never leaves
        // a truncated document behind.
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(dir).map_err(io_error)?;
        staged.write_all(&body).map_err(io_error)?;
        staged.as_file().sync_all().map_err(io_error)?;
        staged
            .persist(&self.path)
            .map_err(|error| io_error(error.error))?;
        Ok(())
    }
}
