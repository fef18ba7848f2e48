use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ImageProvider, api_error, auth_header};
use crate::provider::{ProviderCapabilities, ProviderKind};
use crate::types::{GenerationRequest, GenerationResponse, ImageRef};
use crate::{ImagenError, Result};

/// Gemini `generateContent` adapter. The only provider that forwards image
/// input: each attached image becomes one `inlineData` part, in input order,
/// followed by a single `text` part carrying the prompt.
#[derive(Clone)]
pub struct Google {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl Google {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: ProviderKind::Google.default_base_url().to_string(),
            model: ProviderKind::Google
                .default_model()
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn model_path(&self) -> String {
        let model = self.model.trim();
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn generate_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/{}:generateContent", self.model_path())
    }

    fn build_parts(request: &GenerationRequest) -> Vec<Value> {
        let mut parts = request
            .images()
            .iter()
            .map(|image| {
                json!({
                    "inlineData": {
                        "data": BASE64.encode(&image.data),
                        "mimeType": image.media_type,
                    }
                })
            })
            .collect::<Vec<_>>();
        parts.push(json!({ "text": request.prompt() }));
        parts
    }
}

impl Default for Google {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

#[async_trait]
impl ImageProvider for Google {
    fn name(&self) -> &str {
        "google"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderKind::Google.capabilities()
    }

    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse> {
        let body = json!({
            "contents": [{ "role": "user", "parts": Self::build_parts(request) }]
        });

        let req = self.http.post(self.generate_url()).json(&body);
        let req = auth_header(req, "x-goog-api-key", None, api_key)?;
        let response = req.send().await?;

        if !response.status().is_success() {
            return Err(api_error(self.name(), response).await);
        }

        // A malformed 2xx body is a json error, not a transport failure.
        let parsed = serde_json::from_str::<GenerateContentResponse>(&response.text().await?)?;
        let Some(content) = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
        else {
            return Err(ImagenError::EmptyResult(
                "google returned no candidates".to_string(),
            ));
        };

        // Generated images come back as inline data; take the first one.
        for part in &content.parts {
            if let Some(inline) = &part.inline_data {
                if !inline.data.trim().is_empty() {
                    return Ok(GenerationResponse::new(ImageRef::Inline {
                        media_type: inline
                            .mime_type
                            .clone()
                            .unwrap_or_else(|| "image/png".to_string()),
                        data: inline.data.clone(),
                    }));
                }
            }
        }

        // Text-only candidates are passed through: the model may answer with
        // a data URI or URL, and this provider's contract is that any
        // non-empty content counts as the payload.
        let mut text = String::new();
        for part in &content.parts {
            if let Some(chunk) = &part.text {
                text.push_str(chunk);
            }
        }
        if text.trim().is_empty() {
            return Err(ImagenError::EmptyResult(
                "google returned no image content".to_string(),
            ));
        }
        let image = ImageRef::classify(&text).unwrap_or(ImageRef::Opaque { content: text });
        Ok(GenerationResponse::new(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageInput;

    #[test]
    fn parts_are_images_in_order_then_prompt() {
        let request = GenerationRequest::new(
            vec![
                ImageInput::new(vec![1u8], "image/png").unwrap(),
                ImageInput::new(vec![2u8], "image/jpeg").unwrap(),
            ],
            "Restore this photo",
        )
        .unwrap();

        let parts = Google::build_parts(&request);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], BASE64.encode([1u8]));
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[2]["text"], "Restore this photo");
    }

    #[test]
    fn generate_url_accepts_prefixed_model() {
        let google = Google::new().with_model("models/gemini-1.5-flash");
        assert_eq!(
            google.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
