//! docqa API - HTTP server
//!
//! Single-endpoint chat surface plus service info, health, and
//! lightweight metrics.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::root_info,
        handlers::health::health_check,
        handlers::health::metrics,
        handlers::chat::chat_handler,
    ),
    components(schemas(
        handlers::health::ServiceInfo,
        handlers::health::HealthResponse,
        handlers::health::MetricsResponse,
        handlers::chat::ChatResponse,
        handlers::chat::DebugInfo,
        error::ApiError,
    )),
    tags(
        (name = "chat", description = "Retrieval-grounded question answering"),
        (name = "health", description = "Service info and probes")
    )
)]
pub struct ApiDoc;
