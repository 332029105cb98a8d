//! docqa RAG - Request-orchestration and answer-shaping pipeline
//!
//! This crate implements the chat pipeline that:
//! - resolves the effective retrieval parameters
//! - fetches snippets from the external retrieval proxy
//! - assembles a bounded context block and a source hint
//! - calls the language model with an ordered message sequence
//! - gates evasive answers behind a single stricter retry
//! - falls back to a deterministic answer when the model yields nothing
//! - guarantees a sources section in the final answer
//!
//! Retrieval failures abort the request; completion failures degrade
//! silently so the caller always receives an answer.

use docqa_core::{
    AppConfig, ChatRequest, EffectiveParams, LlmClient, RetrievalBackend, Result, RetrieveResult,
    Snippet, SourceFile,
};
use std::sync::Arc;

pub mod context;
pub mod fallback;
pub mod fetch;
pub mod gate;
pub mod llm;
pub mod prompt;
pub mod retrieval;

pub use fallback::FALLBACK_HEADER;
pub use gate::{ensure_sources_section, is_evasive};
pub use llm::OpenAiClient;
pub use retrieval::ProxyRetrievalClient;

/// How many characters of the context block are echoed back to the
/// caller in the debug preview
const CONTEXT_PREVIEW_CHARS: usize = 300;

/// Result of a pipeline run, ready to be shaped into the HTTP response
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// The retrieval parameters actually used
    pub used: EffectiveParams,

    /// Final answer, never empty
    pub answer: String,

    /// Snippets as returned by the proxy, order preserved
    pub snippets: Vec<Snippet>,

    /// Candidate source files as returned by the proxy
    pub top_files: Vec<SourceFile>,

    /// First characters of the assembled context block
    pub context_preview: String,

    /// Number of snippets that fed the context
    pub snippets_count: usize,
}

/// Chat pipeline orchestrator
///
/// Holds the two external collaborators behind trait objects so tests
/// can substitute fakes without network access.
pub struct ChatPipeline {
    retrieval: Arc<dyn RetrievalBackend>,
    llm: Arc<dyn LlmClient>,
    config: AppConfig,
}

impl ChatPipeline {
    pub fn new(
        retrieval: Arc<dyn RetrievalBackend>,
        llm: Arc<dyn LlmClient>,
        config: AppConfig,
    ) -> Self {
        Self {
            retrieval,
            llm,
            config,
        }
    }

    /// Construct the production pipeline from configuration.
    pub fn from_config(config: AppConfig) -> Self {
        let retrieval = Arc::new(ProxyRetrievalClient::new(config.retrieval.clone()));
        let llm = Arc::new(OpenAiClient::from_config(&config.llm));
        Self::new(retrieval, llm, config)
    }

    /// Execute the full pipeline for one validated request.
    ///
    /// The only error path is retrieval: validation happens before this
    /// call and completion failures are absorbed here.
    pub async fn answer(&self, request: &ChatRequest) -> Result<ChatOutcome> {
        let chat = &self.config.chat;

        // 1. Resolve effective parameters
        let used = retrieval::resolve_params(chat, request);
        tracing::debug!(
            top_k = used.top_k,
            path_prefix = used.path_prefix.as_deref().unwrap_or("<all>"),
            "Resolved retrieval parameters"
        );

        // 2. Retrieve (mandatory path: failures abort the request)
        let retrieve_request = retrieval::build_retrieve_request(
            &request.query,
            &used,
            self.config.retrieval.max_chars_per_chunk,
        );
        let result: RetrieveResult = self.retrieval.retrieve(&retrieve_request).await?;
        tracing::info!(
            snippets = result.snippets.len(),
            files = result.top_files.len(),
            backend = self.retrieval.name(),
            "Retrieval completed"
        );

        // 3. Assemble context and source hint
        let context_block = context::build_context(&result.snippets, chat.snippet_char_cap);
        let source_hint = context::build_source_hint(&result.top_files, chat.source_hint_max);

        // 4-5. Build messages and call the model (failures absorbed)
        let messages = prompt::build_messages(&request.query, &context_block, &source_hint);
        let mut answer = match self
            .llm
            .complete(&messages, self.config.llm.temperature)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Completion failed, deferring to fallback");
                String::new()
            }
        };

        // 6. Quality gate: one stricter retry, only when context exists
        if !context_block.is_empty() && gate::is_evasive(&answer, chat.min_answer_len) {
            tracing::info!("Answer looks evasive, retrying once with strict instruction");
            let retry_messages =
                prompt::build_retry_messages(&request.query, &context_block, &source_hint);
            match self
                .llm
                .complete(&retry_messages, self.config.llm.retry_temperature)
                .await
            {
                Ok(retry_answer) if !retry_answer.trim().is_empty() => {
                    answer = retry_answer;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Retry completion failed, keeping original answer");
                }
            }
        }

        // 7. Fallback when the model produced nothing usable
        if answer.trim().is_empty() {
            tracing::info!("Empty answer, composing deterministic fallback");
            answer = fallback::compose_fallback(&result.snippets, &result.top_files);
        }

        // 8. Sources enforcement
        let answer = gate::ensure_sources_section(&answer, &result.top_files, chat.source_hint_max);

        let snippets_count = result
            .snippets
            .iter()
            .filter(|s| !s.text.trim().is_empty())
            .count();

        Ok(ChatOutcome {
            used,
            answer,
            context_preview: context::truncate_chars(&context_block, CONTEXT_PREVIEW_CHARS),
            snippets_count,
            snippets: result.snippets,
            top_files: result.top_files,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
