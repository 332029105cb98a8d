//! Application state management

use docqa_core::{AppConfig, LlmClient, RetrievalBackend};
use docqa_rag::ChatPipeline;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
///
/// Configuration is immutable after startup; the only mutable state is
/// the request counter.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Chat pipeline
    pub pipeline: ChatPipeline,
}

impl AppState {
    /// Create state with the production collaborators
    pub fn new(config: AppConfig) -> Self {
        let pipeline = ChatPipeline::from_config(config.clone());
        Self {
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            pipeline,
        }
    }

    /// Create state with injected collaborators (used by tests)
    pub fn with_backends(
        config: AppConfig,
        retrieval: Arc<dyn RetrievalBackend>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        let pipeline = ChatPipeline::new(retrieval, llm, config.clone());
        Self {
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            pipeline,
        }
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
