use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::{openai, DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    Redis,
    Postgres,
}

impl FromStr for SessionBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(SessionBackend::Memory),
            "redis" => Ok(SessionBackend::Redis),
            "postgres" | "postgresql" => Ok(SessionBackend::Postgres),
            other => bail!("SESSION_STORE must be one of memory, redis, postgres (got '{other}')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Only the variables of the selected session backend are required.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Takes precedence over Gemini when both keys are set.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    /// With no OpenAI key either, `None` runs the service in simulation mode.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub llm_timeout: Duration,
    pub llm_max_attempts: u32,
    pub llm_retry_backoff: Duration,
    pub session_store: SessionBackend,
    pub redis_url: Option<String>,
    pub database_url: Option<String>,
    pub session_ttl: Duration,
    pub interviewer_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let session_store: SessionBackend = get("SESSION_STORE")
            .unwrap_or_else(|| "memory".to_string())
            .parse()?;
        let redis_url = get("REDIS_URL");
        let database_url = get("DATABASE_URL");
        match session_store {
            SessionBackend::Redis if redis_url.is_none() => {
                bail!("Required environment variable 'REDIS_URL' is not set (SESSION_STORE=redis)")
            }
            SessionBackend::Postgres if database_url.is_none() => bail!(
                "Required environment variable 'DATABASE_URL' is not set (SESSION_STORE=postgres)"
            ),
            _ => {}
        }

        Ok(Config {
            port: parse_or(&get, "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| openai::DEFAULT_MODEL.to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string()),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_timeout: Duration::from_secs(parse_or(&get, "LLM_TIMEOUT_SECS", 60)?),
            llm_max_attempts: parse_or(&get, "LLM_MAX_ATTEMPTS", 3)?,
            llm_retry_backoff: Duration::from_millis(parse_or(&get, "LLM_RETRY_BACKOFF_MS", 1000)?),
            session_store,
            redis_url,
            database_url,
            session_ttl: Duration::from_secs(parse_or(&get, "SESSION_TTL_SECS", 86_400)?),
            interviewer_name: get("INTERVIEWER_NAME").unwrap_or_else(|| "Zavi".to_string()),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number (got '{raw}')")),
        None => Ok(default),
    }
}
