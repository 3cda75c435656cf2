mod config;
mod errors;
mod interview;
mod llm_client;
mod pdf;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::ai::{AiService, GeminiAiService};
use crate::interview::flow::InterviewService;
use crate::interview::store::StateStore;
use crate::llm_client::LlmClient;
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

    info!("Starting ApexHire API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone());
    let ai: Arc<dyn AiService> = Arc::new(GeminiAiService::new(llm));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Rehydrate session + archive from the namespaced state file
    let store = StateStore::new(&config.state_dir);
    let persisted = match store.load().await {
        Ok(Some(state)) => {
            info!(
                "Rehydrated state: session {:?}, {} archived candidate(s)",
                state.session.status,
                state.candidates.len()
            );
            Some(state)
        }
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to load persisted state, starting fresh: {e:?}");
            None
        }
    };
    let interview = InterviewService::new(ai.clone(), Some(store), persisted);

    // Build router
    let app = build_router(AppState { ai, interview })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
