mod config;
mod errors;
mod llm_client;
mod models;
mod parsing;
mod routes;
mod screening;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::parsing::name::LlmEntityRecognizer;
use crate::parsing::skills::SkillVocabulary;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Ranker API v{}", env!("CARGO_PKG_VERSION"));

    let vocabulary = SkillVocabulary::load(config.skill_vocabulary_path.as_deref())
        .context("Failed to load skill vocabulary")?;

    // Name extraction is unusable without the recognizer: refuse to start.
    let llm = LlmClient::new(config.anthropic_api_key.clone())
        .context("Failed to build LLM HTTP client")?;
    let recognizer = LlmEntityRecognizer::load(llm, config.ner_max_input_chars)
        .await
        .context("Entity recognizer failed to initialize")?;

    let state = AppState {
        config: config.clone(),
        vocabulary: Arc::new(vocabulary),
        recognizer: Arc::new(recognizer),
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
