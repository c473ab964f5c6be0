use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SessionStore, StoreError};
use crate::interview::models::InterviewSession;

/// Process-local store. Sessions are lost on restart.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, InterviewSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<InterviewSession>, StoreError> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn save(&self, session: &InterviewSession) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(session.interview_id, session.clone());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::Message;

    #[tokio::test]
    async fn test_missing_session_is_none() {
        let store = InMemorySessionStore::new();
        assert!(store.load(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = InMemorySessionStore::new();
        let mut session = InterviewSession::new(Uuid::new_v4());
        store.save(&session).await.unwrap();

        session.push(Message::assistant("Welcome aboard."));
        store.save(&session).await.unwrap();

        let loaded = store.load(session.interview_id).await.unwrap().unwrap();
        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(loaded, session);
    }
}
