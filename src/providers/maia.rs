use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{ImageProvider, api_error, bearer};
use crate::provider::{ProviderCapabilities, ProviderKind};
use crate::types::{GenerationRequest, GenerationResponse, ImageRef, Warning};
use crate::{ImagenError, Result};

const SYSTEM_PROMPT: &str = "You are an AI image generator.";

/// Maia router adapter. The endpoint is chat-shaped: the prompt goes out as
/// a user message and the assistant's reply is expected to be an image
/// reference. Replies that classify as neither a URL nor a data URI fail
/// closed instead of being handed to a renderer.
#[derive(Clone)]
pub struct Maia {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl Maia {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: ProviderKind::Maia.default_base_url().to_string(),
            model: ProviderKind::Maia
                .default_model()
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for Maia {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn snippet(raw: &str) -> String {
    let raw = raw.trim();
    let mut out = raw.chars().take(120).collect::<String>();
    if out.len() < raw.len() {
        out.push_str("...");
    }
    out
}

#[async_trait]
impl ImageProvider for Maia {
    fn name(&self) -> &str {
        "maia"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderKind::Maia.capabilities()
    }

    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse> {
        let mut warnings = Vec::<Warning>::new();
        if !request.images().is_empty() {
            tracing::warn!(
                provider = "maia",
                count = request.images().len(),
                "provider does not take image input; dropping attached images"
            );
            warnings.push(Warning::DroppedImages {
                provider: "maia".to_string(),
                count: request.images().len(),
            });
        }

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": request.prompt() },
            ],
        });

        let req = self.http.post(&self.endpoint).json(&body);
        let req = bearer(req, api_key)?;
        let response = req.send().await?;

        if !response.status().is_success() {
            return Err(api_error(self.name(), response).await);
        }

        let parsed = serde_json::from_str::<ChatCompletionResponse>(&response.text().await?)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty());
        let Some(content) = content else {
            return Err(ImagenError::EmptyResult(
                "maia returned no message content".to_string(),
            ));
        };

        match ImageRef::classify(&content) {
            Some(image) => Ok(GenerationResponse { image, warnings }),
            None => Err(ImagenError::EmptyResult(format!(
                "maia returned text that is not an image reference: {}",
                snippet(&content)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_caps_long_content() {
        let long = "x".repeat(500);
        let out = snippet(&long);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 123);
    }
}
