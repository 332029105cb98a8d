//! docqa Configuration Management
//!
//! Handles configuration from environment variables with sensible
//! defaults for development. Required secrets (LLM API key, retrieval
//! proxy URL and key) have no defaults: their absence is fatal at
//! startup. The resulting [`AppConfig`] is immutable after boot and
//! injected into request handlers.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Retrieval proxy configuration
    pub retrieval: RetrievalConfig,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Chat pipeline configuration
    pub chat: ChatConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Fails when any required key is missing; callers are expected to
    /// exit on error rather than run with a partial configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        let llm_api_key = require_env("OPENAI_API_KEY")?;
        let retrieval_base_url = require_env("RETRIEVAL_BASE_URL")?;
        let retrieval_api_key = require_env("RETRIEVAL_API_KEY")?;

        let mut config = Self {
            server: ServerConfig::default(),
            retrieval: RetrievalConfig {
                base_url: retrieval_base_url,
                api_key: retrieval_api_key,
                ..RetrievalConfig::default()
            },
            llm: LlmConfig {
                api_key: llm_api_key,
                ..LlmConfig::default()
            },
            chat: ChatConfig::default(),
            logging: LoggingConfig::default(),
        };

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }

        // CORS origins (comma-separated)
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // LLM
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.llm.model = model;
        }

        // Chat defaults
        if let Ok(prefix) = std::env::var("DEFAULT_PATH_PREFIX") {
            config.chat.default_path_prefix = prefix;
        }
        if let Ok(top_k) = std::env::var("DEFAULT_TOP_K") {
            config.chat.default_top_k =
                top_k.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "DEFAULT_TOP_K".to_string(),
                    value: top_k,
                })?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Configuration for tests: required keys filled with placeholders
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            retrieval: RetrievalConfig {
                base_url: "http://localhost:9999".to_string(),
                api_key: "test-key".to_string(),
                ..RetrievalConfig::default()
            },
            llm: LlmConfig {
                api_key: "test-key".to_string(),
                ..LlmConfig::default()
            },
            chat: ChatConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingRequired(key.to_string())),
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS (empty means allow any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec![],
        }
    }
}

/// Retrieval proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Base URL of the retrieval proxy
    pub base_url: String,

    /// API key sent as `x-api-key`
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum characters per chunk requested from the proxy
    pub max_chars_per_chunk: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            timeout_secs: 20,
            max_chars_per_chunk: 1200,
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the provider
    pub api_key: String,

    /// API base URL (for Azure or compatible APIs)
    pub base_url: String,

    /// Model name to use
    pub model: String,

    /// Temperature for the initial completion call
    pub temperature: f32,

    /// Temperature for the single quality-gate retry
    pub retry_temperature: f32,

    /// Maximum tokens for completion
    pub max_tokens: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            retry_temperature: 0.0,
            max_tokens: 1024,
            timeout_secs: 25,
        }
    }
}

/// Chat pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Default path prefix when the request supplies none (empty means
    /// "search everything")
    pub default_path_prefix: String,

    /// Default number of snippets to retrieve
    pub default_top_k: usize,

    /// Default file-extension filter
    pub default_file_types: Vec<String>,

    /// Per-snippet character cap when assembling the context block
    pub snippet_char_cap: usize,

    /// Maximum number of files in the source hint and sources section
    pub source_hint_max: usize,

    /// Answers shorter than this trip the quality gate
    pub min_answer_len: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_path_prefix: String::new(),
            default_top_k: 6,
            default_file_types: vec![
                "pdf".to_string(),
                "docx".to_string(),
                "txt".to_string(),
            ],
            snippet_char_cap: 1000,
            source_hint_max: 5,
            min_answer_len: 30,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
