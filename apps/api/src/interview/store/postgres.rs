use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{SessionStore, StoreError};
use crate::interview::models::InterviewSession;
use crate::models::interview::InterviewSessionRow;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS interview_sessions (
    interview_id             UUID PRIMARY KEY,
    phase                    TEXT NOT NULL,
    question_count           INTEGER NOT NULL DEFAULT 0,
    candidate_question_count INTEGER NOT NULL DEFAULT 0,
    messages                 JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at               TIMESTAMPTZ NOT NULL,
    updated_at               TIMESTAMPTZ NOT NULL
)
"#;

pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Opens a pool and makes sure the sessions table exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        info!("PostgreSQL connection pool established");

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<InterviewSession>, StoreError> {
        let row: Option<InterviewSessionRow> = sqlx::query_as(
            r#"
            SELECT interview_id, phase, question_count, candidate_question_count,
                   messages, created_at, updated_at
            FROM interview_sessions
            WHERE interview_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| InterviewSession::try_from(r).map_err(|reason| StoreError::Corrupt { id, reason }))
            .transpose()
    }

    async fn save(&self, session: &InterviewSession) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO interview_sessions
                (interview_id, phase, question_count, candidate_question_count,
                 messages, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (interview_id) DO UPDATE SET
                phase = EXCLUDED.phase,
                question_count = EXCLUDED.question_count,
                candidate_question_count = EXCLUDED.candidate_question_count,
                messages = EXCLUDED.messages,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(session.interview_id)
        .bind(session.phase.as_str())
        .bind(session.question_count as i32)
        .bind(session.candidate_question_count as i32)
        .bind(Json(&session.messages))
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
