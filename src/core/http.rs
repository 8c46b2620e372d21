use std::time::Duration;

use reqwest::{
    header::{
        HeaderMap,
        HeaderValue,
        USER_AGENT,
    },
    Client,
};

use crate::core::GengoError;

pub fn http_client(timeout: Duration) -> Result<Client, GengoError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("gengo/0.1 (+reqwest)"));

    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .map_err(|e| GengoError::Configuration(format!("HTTP client build failed: {e}")))
}

/// Pulls `error.message` out of a Google-style error body, falling back to the raw text.
pub fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body.trim()))
}
