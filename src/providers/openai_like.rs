use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{ImageProvider, api_error, bearer, join_endpoint};
use crate::provider::{ProviderCapabilities, ProviderKind};
use crate::types::{GenerationRequest, GenerationResponse, ImageRef, Warning};
use crate::{ImagenError, Result};

/// Shared wire shape for the OpenAI-style `images/generations` endpoint.
/// The body is always `{prompt, n: 1, size: "1024x1024"}`: these providers
/// do not take image input, so attached images are dropped and recorded as a
/// warning on the response.
#[derive(Clone)]
struct OpenAiLike {
    http: reqwest::Client,
    kind: ProviderKind,
    base_url: String,
}

impl OpenAiLike {
    fn new(kind: ProviderKind) -> Self {
        Self {
            http: reqwest::Client::new(),
            kind,
            base_url: kind.default_base_url().to_string(),
        }
    }

    fn images_url(&self) -> String {
        join_endpoint(&self.base_url, "images/generations")
    }

    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse> {
        let name = self.kind.as_str();
        let mut warnings = Vec::<Warning>::new();
        if !request.images().is_empty() {
            tracing::warn!(
                provider = name,
                count = request.images().len(),
                "provider does not take image input; dropping attached images"
            );
            warnings.push(Warning::DroppedImages {
                provider: name.to_string(),
                count: request.images().len(),
            });
        }

        let body = json!({
            "prompt": request.prompt(),
            "n": 1,
            "size": "1024x1024",
        });

        let req = self.http.post(self.images_url()).json(&body);
        let req = bearer(req, api_key)?;
        let response = req.send().await?;

        if !response.status().is_success() {
            return Err(api_error(name, response).await);
        }

        let parsed = serde_json::from_str::<ImagesResponse>(&response.text().await?)?;
        let Some(item) = parsed.data.into_iter().next() else {
            return Err(ImagenError::EmptyResult(format!(
                "{name} returned no image data"
            )));
        };

        if let Some(url) = item.url.filter(|u| !u.trim().is_empty()) {
            return Ok(GenerationResponse {
                image: ImageRef::Url { url },
                warnings,
            });
        }
        if let Some(data) = item.b64_json.filter(|d| !d.trim().is_empty()) {
            return Ok(GenerationResponse {
                image: ImageRef::Inline {
                    media_type: "image/png".to_string(),
                    data,
                },
                warnings,
            });
        }
        Err(ImagenError::EmptyResult(format!(
            "{name} image item is missing both url and b64_json"
        )))
    }
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageItem>,
}

#[derive(Debug, Deserialize)]
struct ImageItem {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiImages(OpenAiLike);

impl OpenAiImages {
    pub fn new() -> Self {
        Self(OpenAiLike::new(ProviderKind::OpenAi))
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.0.http = http;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.0.base_url = base_url.into();
        self
    }
}

impl Default for OpenAiImages {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageProvider for OpenAiImages {
    fn name(&self) -> &str {
        "openai"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderKind::OpenAi.capabilities()
    }

    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse> {
        self.0.generate(api_key, request).await
    }
}

#[cfg(feature = "openrouter")]
#[derive(Clone)]
pub struct OpenRouterImages(OpenAiLike);

#[cfg(feature = "openrouter")]
impl OpenRouterImages {
    pub fn new() -> Self {
        Self(OpenAiLike::new(ProviderKind::OpenRouter))
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.0.http = http;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.0.base_url = base_url.into();
        self
    }
}

#[cfg(feature = "openrouter")]
impl Default for OpenRouterImages {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "openrouter")]
#[async_trait]
impl ImageProvider for OpenRouterImages {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderKind::OpenRouter.capabilities()
    }

    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse> {
        self.0.generate(api_key, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_url_appends_endpoint_once() {
        let openai = OpenAiImages::new();
        assert_eq!(
            openai.0.images_url(),
            "https://api.openai.com/v1/images/generations"
        );

        let custom = OpenAiImages::new().with_base_url("http://localhost:9000/v1/");
        assert_eq!(
            custom.0.images_url(),
            "http://localhost:9000/v1/images/generations"
        );
    }

    #[cfg(feature = "openrouter")]
    #[test]
    fn openrouter_uses_its_own_default_endpoint() {
        let openrouter = OpenRouterImages::new();
        assert_eq!(
            openrouter.0.images_url(),
            "https://openrouter.ai/api/images/generations"
        );
    }
}
