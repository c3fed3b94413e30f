//! Session storage for the dialog.
//!
//! Sessions live in process memory only. A session that sees no activity for
//! the configured idle period is evicted, which is indistinguishable from a
//! fresh `Idle` session the next time that chat writes.

use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::channel::SessionId;
use crate::dialog::state::Session;

const MAX_SESSIONS: u64 = 100_000;

/// Keyed storage of dialog sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current session for `id`; a fresh idle session if none is stored.
    async fn get(&self, id: SessionId) -> Session;

    async fn put(&self, id: SessionId, session: Session);
}

/// In-memory store backed by a `moka` cache with idle expiry.
#[derive(Clone)]
pub struct MemorySessionStore {
    sessions: Cache<SessionId, Session>,
}

impl MemorySessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(idle_timeout)
            .max_capacity(MAX_SESSIONS)
            .build();
        Self { sessions }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, id: SessionId) -> Session {
        self.sessions.get(&id).await.unwrap_or_default()
    }

    async fn put(&self, id: SessionId, session: Session) {
        // Idle sessions carry no data, so there is nothing worth keeping.
        if session.is_idle() {
            self.sessions.invalidate(&id).await;
        } else {
            self.sessions.insert(id, session).await;
        }
    }
}

/// One async mutex per session key.
///
/// Holding the guard for a session while handling its message keeps messages
/// of that session strictly sequential even when the transport delivers them
/// concurrently; different sessions never wait on each other.
#[derive(Clone)]
pub struct SessionLocks {
    locks: Cache<SessionId, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new(idle_timeout: Duration) -> Self {
        let locks = Cache::builder()
            .time_to_idle(idle_timeout)
            .max_capacity(MAX_SESSIONS)
            .build();
        Self { locks }
    }

    pub async fn acquire(&self, id: SessionId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .get_with(id, async { Arc::new(Mutex::new(())) })
            .await;
        lock.lock_owned().await
    }
}
