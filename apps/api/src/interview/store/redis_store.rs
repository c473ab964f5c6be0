use std::time::Duration;

use async_trait::async_trait;
use redis::Client as RedisClient;
use tracing::{debug, info};
use uuid::Uuid;

use super::{SessionStore, StoreError};
use crate::interview::models::InterviewSession;

/// Sessions as JSON strings under `interview:session:{id}`, expiring after `ttl`.
/// Every save refreshes the expiry.
pub struct RedisSessionStore {
    client: RedisClient,
    ttl: Duration,
}

impl RedisSessionStore {
    pub fn new(redis_url: &str, ttl: Duration) -> Result<Self, StoreError> {
        let client = RedisClient::open(redis_url)?;
        info!("Redis session store initialized (ttl: {}s)", ttl.as_secs());
        Ok(Self { client, ttl })
    }

    fn key(id: Uuid) -> String {
        format!("interview:session:{id}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<InterviewSession>, StoreError> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = redis::cmd("GET")
            .arg(Self::key(id))
            .query_async(&mut con)
            .await?;

        match payload {
            Some(json) => {
                let session: InterviewSession =
                    serde_json::from_str(&json).map_err(|e| StoreError::Corrupt {
                        id,
                        reason: e.to_string(),
                    })?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, session: &InterviewSession) -> Result<(), StoreError> {
        let payload = serde_json::to_string(session)?;
        let mut con = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(Self::key(session.interview_id))
            .arg(payload)
            .arg("EX")
            .arg(self.ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut con)
            .await?;
        debug!("Saved session {} to redis", session.interview_id);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
