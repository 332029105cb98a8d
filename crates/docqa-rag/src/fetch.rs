//! Outbound JSON fetcher
//!
//! Issues a POST with a bounded timeout, parses the JSON body, and
//! normalizes non-2xx responses into a structured failure carrying the
//! status code and the parsed error body.

use docqa_core::{DocqaError, Result};
use reqwest::Client;
use std::time::Duration;

/// POST a JSON body and return the parsed JSON response.
///
/// The timeout is enforced per request; on expiry the in-flight call is
/// aborted and reported as a transport failure. An empty success body
/// parses to `{}`.
pub async fn post_json(
    client: &Client,
    url: &str,
    api_key: &str,
    body: &serde_json::Value,
    timeout: Duration,
) -> Result<serde_json::Value> {
    let response = client
        .post(url)
        .header("x-api-key", api_key)
        .header("Content-Type", "application/json")
        .json(body)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| DocqaError::retrieval_transport(format!("Request to {url} failed: {e}")))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| DocqaError::retrieval_transport(format!("Failed to read body: {e}")))?;

    if !status.is_success() {
        let details = serde_json::from_str::<serde_json::Value>(&text).ok();
        return Err(DocqaError::Retrieval {
            status: Some(status.as_u16()),
            message: format!("{url} returned {status}"),
            details,
        });
    }

    if text.trim().is_empty() {
        return Ok(serde_json::json!({}));
    }

    // A 2xx status with an unparseable body is not a proxy-reported
    // failure; leave the status out so the API layer defaults to 500.
    serde_json::from_str(&text)
        .map_err(|e| DocqaError::retrieval_transport(format!("Invalid JSON from {url}: {e}")))
}
