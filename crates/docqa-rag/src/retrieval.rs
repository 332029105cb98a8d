//! Retrieval proxy client
//!
//! Translates a chat request into the proxy's wire format and invokes
//! the outbound JSON fetcher. Parameter resolution (path prefix, topK,
//! file types) lives here so both the proxy call and the `used` echo in
//! the response see the same values.

use crate::fetch;
use docqa_core::{
    ChatConfig, ChatRequest, EffectiveParams, RetrievalBackend, RetrievalConfig, RetrieveRequest,
    RetrieveResult, Result,
};
use reqwest::Client;
use std::time::Duration;

/// Resolve the effective retrieval parameters for a request.
///
/// - path prefix: request value if non-empty after trimming, else the
///   configured default; `None` when both are empty (global search)
/// - topK: request value if positive, else the configured default
/// - file types: request value if non-empty, else {pdf, docx, txt}
pub fn resolve_params(config: &ChatConfig, request: &ChatRequest) -> EffectiveParams {
    let path_prefix = request
        .path_prefix
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .or_else(|| {
            let default = config.default_path_prefix.trim();
            (!default.is_empty()).then(|| default.to_string())
        });

    let top_k = match request.top_k {
        Some(k) if k > 0 => k as usize,
        _ => config.default_top_k,
    };

    let file_types = match &request.file_types {
        Some(types) if !types.is_empty() => types.clone(),
        _ => config.default_file_types.clone(),
    };

    EffectiveParams {
        path_prefix,
        top_k,
        file_types,
    }
}

/// Build the proxy request body from resolved parameters.
pub fn build_retrieve_request(
    query: &str,
    params: &EffectiveParams,
    max_chars_per_chunk: usize,
) -> RetrieveRequest {
    RetrieveRequest {
        query: query.to_string(),
        path_prefix: params.path_prefix.clone(),
        top_k: params.top_k,
        max_chars_per_chunk,
        file_types: params.file_types.clone(),
        include_file_text: false,
    }
}

/// HTTP client for the external retrieval proxy
pub struct ProxyRetrievalClient {
    client: Client,
    config: RetrievalConfig,
}

impl ProxyRetrievalClient {
    pub fn new(config: RetrievalConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait::async_trait]
impl RetrievalBackend for ProxyRetrievalClient {
    async fn retrieve(&self, request: &RetrieveRequest) -> Result<RetrieveResult> {
        let url = format!("{}/retrieve", self.config.base_url.trim_end_matches('/'));
        let body = serde_json::to_value(request)?;

        let value = fetch::post_json(
            &self.client,
            &url,
            &self.config.api_key,
            &body,
            Duration::from_secs(self.config.timeout_secs),
        )
        .await?;

        // A structurally unexpected success body is treated as an empty
        // result, not a failure.
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    fn name(&self) -> &str {
        "retrieval-proxy"
    }
}
