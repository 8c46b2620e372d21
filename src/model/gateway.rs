use std::time::Instant;

use async_trait::async_trait;
use reqwest::{
    Client,
    StatusCode,
};
use serde_json::{
    json,
    Value,
};
use tracing::{
    debug,
    warn,
};

use super::ModelRequest;
use crate::core::{
    http::{
        error_message,
        http_client,
    },
    Config,
    GengoError,
};

/// Narrow boundary to the generative model: request in, raw text out.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: &ModelRequest) -> Result<String, GengoError>;
}

/// Google Generative Language `generateContent` endpoint.
pub struct GeminiGateway {
    client: Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiGateway {
    pub fn new(config: &Config) -> Result<Self, GengoError> {
        Ok(Self {
            client: http_client(config.request_timeout)?,
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &ModelRequest) -> Result<String, GengoError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            GengoError::Configuration("GEMINI_API_KEY is not set".to_string())
        })?;

        let start = Instant::now();
        debug!("Sending {} request to {}", request.kind.label(), self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Model request failed with status {}", status);
            return Err(classify_failure(status, &body));
        }

        let text = extract_text(&body)?;
        debug!(
            "{} request finished in {:?} ({} chars)",
            request.kind.label(),
            start.elapsed(),
            text.len()
        );
        Ok(text)
    }
}

pub fn request_body(request: &ModelRequest) -> Value {
    let mut body = json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt }]
        }]
    });

    if let Some(schema) = &request.schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema
        });
    }

    body
}

fn classify_failure(status: StatusCode, body: &str) -> GengoError {
    let message = error_message(status, body);
    let bad_key = body.contains("API_KEY_INVALID") || message.contains("API key not valid");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GengoError::Configuration(message),
        StatusCode::BAD_REQUEST if bad_key => GengoError::Configuration(message),
        _ => GengoError::Service(message),
    }
}

/// Joins the text parts of the first candidate. No candidates yields an empty string.
pub fn extract_text(body: &str) -> Result<String, GengoError> {
    if body.trim().is_empty() {
        return Err(GengoError::Service("empty response body".to_string()));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| GengoError::Service(format!("response is not JSON: {e}")))?;

    if let Some(error) = value.get("error") {
        let message = error["message"].as_str().unwrap_or("unknown error");
        return Err(GengoError::Service(message.to_string()));
    }

    let text = value["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|part| part["text"].as_str()).collect::<String>())
        .unwrap_or_default();

    if text.is_empty() {
        if let Some(reason) = value["promptFeedback"]["blockReason"].as_str() {
            warn!("Model returned no candidates (blocked: {})", reason);
        }
    }

    Ok(text)
}
