//! In-memory session store
//!
//! Sessions live for the lifetime of the process. Each record sits behind its
//! own mutex, so submissions for one session are serialized while different
//! sessions only share the brief map lookup.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::record::SessionRecord;

/// Shared handle to one session's record
pub type SessionHandle = Arc<Mutex<SessionRecord>>;

/// Lookup result for a submission target
#[derive(Debug)]
pub enum SessionLookup {
    /// Existing or newly created session
    Active(SessionHandle),
    /// Id was deleted earlier in this process lifetime
    Deleted,
}

#[derive(Debug, Default)]
struct StoreInner {
    sessions: HashMap<String, SessionHandle>,
    /// Deleted ids; never resurrected
    tombstones: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<StoreInner>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for `session_id`, creating it on first use
    pub async fn get_or_create(&self, session_id: &str) -> SessionLookup {
        {
            let inner = self.inner.read().await;
            if inner.tombstones.contains(session_id) {
                return SessionLookup::Deleted;
            }
            if let Some(handle) = inner.sessions.get(session_id) {
                return SessionLookup::Active(Arc::clone(handle));
            }
        }

        let mut inner = self.inner.write().await;
        // Re-check: another request may have created or deleted it meanwhile
        if inner.tombstones.contains(session_id) {
            return SessionLookup::Deleted;
        }
        let handle = inner
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::info!(session_id = %session_id, "Created progressive session");
                Arc::new(Mutex::new(SessionRecord::new(session_id)))
            });
        SessionLookup::Active(Arc::clone(handle))
    }

    /// Existing session, if any
    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.inner.read().await.sessions.get(session_id).cloned()
    }

    /// Run `commit` only while `handle` is still the live record for
    /// `session_id`.
    ///
    /// The map read lock is held across the check and `commit`, so a
    /// concurrent [`Self::delete`] lands entirely before (`None`) or after.
    pub async fn commit_if_live<T>(
        &self,
        session_id: &str,
        handle: &SessionHandle,
        commit: impl FnOnce() -> T,
    ) -> Option<T> {
        let inner = self.inner.read().await;
        let live = inner
            .sessions
            .get(session_id)
            .is_some_and(|current| Arc::ptr_eq(current, handle));
        if !live {
            return None;
        }
        Some(commit())
    }

    /// Discard a session and tombstone its id. Returns whether a record existed.
    ///
    /// Only ids that held a record are tombstoned, so deletes of unknown ids
    /// leave no trace.
    pub async fn delete(&self, session_id: &str) -> bool {
        let mut inner = self.inner.write().await;
        let existed = inner.sessions.remove(session_id).is_some();
        if existed {
            inner.tombstones.insert(session_id.to_string());
        }
        existed
    }

    pub async fn is_deleted(&self, session_id: &str) -> bool {
        self.inner.read().await.tombstones.contains(session_id)
    }

    pub async fn session_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }
}
