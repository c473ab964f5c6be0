pub mod memory;
pub mod postgres;
pub mod redis_store;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::interview::models::InterviewSession;

pub use memory::InMemorySessionStore;
pub use postgres::PostgresSessionStore;
pub use redis_store::RedisSessionStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt session {id}: {reason}")]
    Corrupt { id: Uuid, reason: String },
}

/// Persistence for interview sessions.
///
/// `save` overwrites the whole session. Callers serialize writers for the
/// same interview through [`SessionLocks`].
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<InterviewSession>, StoreError>;
    async fn save(&self, session: &InterviewSession) -> Result<(), StoreError>;
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

/// One async mutex per interview id.
///
/// An entry lives only while some caller holds or waits for it, so ids that
/// were never found or never completed do not accumulate.
#[derive(Default)]
pub struct SessionLocks {
    inner: std::sync::Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other operation holds `id`, then returns the guard.
    pub async fn acquire(&self, id: Uuid) -> SessionGuard<'_> {
        let lock = self.map().entry(id).or_default().clone();
        SessionGuard {
            locks: self,
            id,
            guard: Some(lock.lock_owned().await),
        }
    }

    fn map(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Arc<Mutex<()>>>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.map().len()
    }
}

/// Held for the duration of one operation on an interview.
pub struct SessionGuard<'a> {
    locks: &'a SessionLocks,
    id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut map = self.locks.map();
        // The map holds one reference; any other is a waiter or holder.
        if map.get(&self.id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            map.remove(&self.id);
        }
    }
}
