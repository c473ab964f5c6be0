//! LLM Gateway: bounded retry around a `TextGenerator`.
//!
//! An attempt is one transport call plus the caller's validation of the text.
//! Either failing burns the attempt. After the last failure the error is handed
//! back and the caller substitutes its deterministic fallback.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{LlmError, TextGenerator};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Fixed delay between attempts (no exponential growth).
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

#[derive(Clone)]
pub struct LlmGateway {
    generator: Option<Arc<dyn TextGenerator>>,
    policy: RetryPolicy,
}

impl LlmGateway {
    pub fn new(generator: Arc<dyn TextGenerator>, policy: RetryPolicy) -> Self {
        Self {
            generator: Some(generator),
            policy,
        }
    }

    /// A gateway with no backend. Every call fails fast with `NotConfigured`,
    /// which puts all callers on their fallback path (simulation mode).
    pub fn disabled() -> Self {
        Self {
            generator: None,
            policy: RetryPolicy::default(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Backend name, or `"simulation"` when there is none.
    pub fn provider(&self) -> &'static str {
        self.generator.as_ref().map_or("simulation", |g| g.provider())
    }

    pub fn model(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.model())
    }

    /// Calls the backend and runs `validate` on the reply, retrying both
    /// together up to `max_attempts` times.
    pub async fn generate_with<T, F>(&self, prompt: &str, validate: F) -> Result<T, LlmError>
    where
        T: Send,
        F: Fn(&str) -> Result<T, LlmError> + Send + Sync,
    {
        let generator = self.generator.as_ref().ok_or(LlmError::NotConfigured)?;
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error: Option<LlmError> = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.policy.backoff).await;
            }

            match generator
                .generate(prompt)
                .await
                .and_then(|text| validate(&text))
            {
                Ok(value) => {
                    debug!(attempt, "LLM call succeeded");
                    return Ok(value);
                }
                Err(e) => {
                    warn!(attempt, max_attempts, error = %e, "LLM attempt failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(LlmError::EmptyContent))
    }
}
