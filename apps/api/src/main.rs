mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::scoring::invoker::ScoringInvoker;
use crate::scoring::registry::registry;
use crate::scoring::store::{self, PgResumeStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting scoring API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = store::connect(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.scoring_model.clone(),
        config.aspect_timeout,
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let invoker = Arc::new(ScoringInvoker::new(Arc::new(llm), config.aspect_timeout));
    info!(
        "Scoring {} aspects (aspect timeout {}s, run timeout {}s)",
        registry().len(),
        config.aspect_timeout.as_secs(),
        config.run_timeout.as_secs()
    );

    // Build app state
    let state = AppState {
        store: Arc::new(PgResumeStore::new(db)),
        invoker,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the dashboard host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
