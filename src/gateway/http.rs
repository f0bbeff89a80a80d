use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use super::{GenerationError, GenerationRequest, Transport};
use crate::config::Config;

/// Blocking transport for the hosted `generateContent` API.
pub struct HttpTransport {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(config: &Config, api_key: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

fn request_body(request: &GenerationRequest) -> Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.schema
        }
    })
}

/// Concatenates the text parts of the first candidate.
fn candidate_text(body: &Value) -> Option<String> {
    let parts = body
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

impl Transport for HttpTransport {
    fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let response = self
            .agent
            .post(&self.url())
            .set("x-goog-api-key", &self.api_key)
            .set("Content-Type", "application/json")
            .send_json(request_body(request))
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => GenerationError::Server { status: code },
                other => GenerationError::Http(other),
            })?;

        let body: Value = response.into_json()?;
        debug!(kind = %request.kind, "generation response received");
        candidate_text(&body).ok_or(GenerationError::EmptyResponse)
    }
}
