//! docqa Core - Domain models, traits, and shared types
//!
//! This crate defines the abstractions used throughout the docqa service:
//! - Chat request/response models and the retrieval wire format
//! - Common error types
//! - Traits for the two external collaborators (retrieval proxy, LLM)
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ChatConfig, ConfigError, LlmConfig, LoggingConfig, RetrievalConfig, ServerConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for docqa operations
#[derive(Error, Debug)]
pub enum DocqaError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Retrieval failed: {message}")]
    Retrieval {
        /// HTTP status returned by the retrieval proxy, if any
        status: Option<u16>,
        message: String,
        /// Parsed error body from the proxy, if it was JSON
        details: Option<serde_json::Value>,
    },

    #[error("Completion failed: {0}")]
    Completion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DocqaError {
    /// Build a retrieval error from a transport-level failure (no HTTP status)
    pub fn retrieval_transport(message: impl Into<String>) -> Self {
        Self::Retrieval {
            status: None,
            message: message.into(),
            details: None,
        }
    }
}

impl From<serde_json::Error> for DocqaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(err.into())
    }
}

pub type Result<T> = std::result::Result<T, DocqaError>;

// ============================================================================
// Chat Models
// ============================================================================

/// A validated chat request
///
/// `query` is guaranteed non-empty by the HTTP handler; the remaining
/// fields are optional overrides of process-wide defaults.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// User's question, verbatim
    pub query: String,

    /// Overrides the configured default path prefix
    pub path_prefix: Option<String>,

    /// Overrides the configured default result count (ignored unless positive)
    pub top_k: Option<i64>,

    /// File-extension filter (ignored when empty)
    pub file_types: Option<Vec<String>>,
}

impl ChatRequest {
    /// Create a request with only a query, using defaults for everything else
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            path_prefix: None,
            top_k: None,
            file_types: None,
        }
    }
}

/// The retrieval parameters actually used for a request, echoed back
/// to the caller as `used`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveParams {
    /// Resolved path prefix; `None` means the proxy searched everything
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,

    pub top_k: usize,

    pub file_types: Vec<String>,
}

// ============================================================================
// Retrieval Wire Format
// ============================================================================

/// Request body for the retrieval proxy's `POST /retrieve`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveRequest {
    pub query: String,

    /// Omitted entirely when empty: signals "search everything"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,

    pub top_k: usize,

    pub max_chars_per_chunk: usize,

    pub file_types: Vec<String>,

    pub include_file_text: bool,
}

/// Retrieval proxy response
///
/// Both lists default to empty so a sparse or partial proxy response
/// never fails the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveResult {
    #[serde(default)]
    pub snippets: Vec<Snippet>,

    #[serde(default)]
    pub top_files: Vec<SourceFile>,
}

/// A passage of text returned by the retrieval proxy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snippet {
    #[serde(default)]
    pub text: String,

    /// Source file this passage came from, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<SourceFile>,
}

/// A candidate source document, consumed only for display
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub web_url: String,
}

// ============================================================================
// LLM Models
// ============================================================================

/// A role-tagged message for the chat-completion API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Trait for the document-retrieval proxy
#[async_trait::async_trait]
pub trait RetrievalBackend: Send + Sync {
    /// Fetch snippets and candidate files for a query
    async fn retrieve(&self, request: &RetrieveRequest) -> Result<RetrieveResult>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Trait for the language-model provider
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for an ordered message sequence
    async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String>;
}

// ============================================================================
// Tests
// ============================================================================
