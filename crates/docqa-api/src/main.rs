//! docqa API Server
//!
//! HTTP server for retrieval-grounded question answering over the
//! organization's documents.

use docqa_api::{create_router, AppState};
use docqa_core::AppConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docqa_api=debug,tower_http=debug".into()),
        )
        .init();

    // Missing required keys (LLM API key, retrieval proxy URL/key) are
    // fatal here: the process exits instead of serving a broken config.
    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = Arc::new(AppState::new(config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("docqa API server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
