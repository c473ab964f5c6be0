mod assessment;
mod config;
mod errors;
mod extract;
mod interview;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, SessionBackend};
use crate::interview::store::{
    InMemorySessionStore, PostgresSessionStore, RedisSessionStore, SessionStore,
};
use crate::interview::Interviewer;
use crate::llm_client::{GeminiClient, LlmGateway, OpenAiClient, RetryPolicy, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    let llm = build_gateway(&config)?;
    let store = build_store(&config).await?;
    info!("Session store: {}", store.backend());

    let interviewer = Interviewer::new(llm.clone(), store, config.interviewer_name.clone());

    let state = AppState {
        interviewer: Arc::new(interviewer),
        llm,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAI first, then Gemini, otherwise simulation mode.
fn build_gateway(config: &Config) -> Result<LlmGateway> {
    let generator: Arc<dyn TextGenerator> = if let Some(api_key) = config.openai_api_key.clone() {
        Arc::new(OpenAiClient::new(
            api_key,
            config.openai_base_url.clone(),
            config.openai_model.clone(),
            config.llm_timeout,
        )?)
    } else if let Some(api_key) = config.gemini_api_key.clone() {
        Arc::new(GeminiClient::new(
            api_key,
            config.gemini_base_url.clone(),
            config.gemini_model.clone(),
            config.llm_timeout,
        )?)
    } else {
        warn!("No OPENAI_API_KEY or GEMINI_API_KEY set, running in simulation mode with fallback replies");
        return Ok(LlmGateway::disabled());
    };

    info!(
        "LLM client initialized (provider: {}, model: {}, attempts: {}, backoff: {:?})",
        generator.provider(),
        generator.model(),
        config.llm_max_attempts,
        config.llm_retry_backoff
    );

    Ok(LlmGateway::new(
        generator,
        RetryPolicy {
            max_attempts: config.llm_max_attempts,
            backoff: config.llm_retry_backoff,
        },
    ))
}

async fn build_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match config.session_store {
        SessionBackend::Memory => Arc::new(InMemorySessionStore::new()),
        SessionBackend::Redis => {
            let url = config.redis_url.as_deref().unwrap_or_default();
            Arc::new(RedisSessionStore::new(url, config.session_ttl)?)
        }
        SessionBackend::Postgres => {
            let url = config.database_url.as_deref().unwrap_or_default();
            Arc::new(PostgresSessionStore::connect(url).await?)
        }
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn gateway_for(vars: &[(&str, &str)]) -> LlmGateway {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        let config = Config::from_lookup(|key| map.get(key).map(|v| v.to_string())).unwrap();
        build_gateway(&config).unwrap()
    }

    #[test]
    fn test_provider_priority() {
        let both = gateway_for(&[("OPENAI_API_KEY", "sk-1"), ("GEMINI_API_KEY", "g-1")]);
        assert_eq!(both.provider(), "openai");
        assert_eq!(both.model(), Some("gpt-4"));

        let gemini = gateway_for(&[("GEMINI_API_KEY", "g-1")]);
        assert_eq!(gemini.provider(), "gemini");

        let none = gateway_for(&[]);
        assert_eq!(none.provider(), "simulation");
        assert!(!none.is_configured());
    }
}
