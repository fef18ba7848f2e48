use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::HeaderValue;
use serde::Deserialize;

use crate::provider::ProviderCapabilities;
use crate::types::{GenerationRequest, GenerationResponse};
use crate::{ImagenError, Result};

#[cfg(feature = "google")]
pub mod google;
#[cfg(feature = "maia")]
pub mod maia;
#[cfg(feature = "openai")]
mod openai_like;

#[cfg(feature = "google")]
pub use google::Google;
#[cfg(feature = "maia")]
pub use maia::Maia;
#[cfg(feature = "openai")]
pub use openai_like::OpenAiImages;
#[cfg(feature = "openrouter")]
pub use openai_like::OpenRouterImages;

/// One handler per provider variant: build the provider's wire request from
/// the agnostic one, issue it, and normalize the response. Adapters hold
/// endpoint/model configuration but never credentials; the key is passed per
/// call so settings changes between submits take effect immediately.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &str;
    fn capabilities(&self) -> ProviderCapabilities;

    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse>;
}

const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

pub(crate) fn join_endpoint(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    if base.ends_with(&format!("/{endpoint}")) {
        base.to_string()
    } else {
        format!("{base}/{endpoint}")
    }
}

/// Attach the credential as a request header, rejecting keys that cannot be
/// carried in one (e.g. embedded newlines) before anything goes on the wire.
pub(crate) fn auth_header(
    req: reqwest::RequestBuilder,
    header: &'static str,
    prefix: Option<&str>,
    api_key: &str,
) -> Result<reqwest::RequestBuilder> {
    let mut raw = String::new();
    if let Some(prefix) = prefix {
        raw.push_str(prefix);
    }
    raw.push_str(api_key);

    let mut value = HeaderValue::from_str(&raw).map_err(|err| {
        ImagenError::InvalidRequest(format!("api key is not a valid header value: {err}"))
    })?;
    value.set_sensitive(true);
    Ok(req.header(header, value))
}

pub(crate) fn bearer(
    req: reqwest::RequestBuilder,
    api_key: &str,
) -> Result<reqwest::RequestBuilder> {
    auth_header(req, "authorization", Some("Bearer "), api_key)
}

async fn response_text_truncated(response: reqwest::Response, max_bytes: usize) -> String {
    let mut out = Vec::<u8>::new();
    let mut truncated = false;

    let mut stream = response.bytes_stream();
    while let Some(next) = stream.next().await {
        let Ok(chunk) = next else {
            break;
        };
        let remaining = max_bytes.saturating_sub(out.len());
        if remaining == 0 {
            truncated = true;
            break;
        }
        if chunk.len() <= remaining {
            out.extend_from_slice(chunk.as_ref());
        } else {
            out.extend_from_slice(&chunk.as_ref()[..remaining]);
            truncated = true;
            break;
        }
    }

    let mut body = String::from_utf8_lossy(&out).to_string();
    if truncated {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str("...(truncated)");
    }
    body
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Turn a non-2xx response into an `Api` error carrying the status code and
/// the provider's `error.message` when the body has the common shape, else
/// the raw (size-bounded) body.
pub(crate) async fn api_error(provider: &str, response: reqwest::Response) -> ImagenError {
    let status = response.status();
    let body = response_text_truncated(response, MAX_ERROR_BODY_BYTES).await;
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|detail| detail.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(body);
    ImagenError::Api {
        provider: provider.to_string(),
        status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_endpoint_handles_trailing_slash_and_duplicates() {
        assert_eq!(
            join_endpoint("https://api.openai.com/v1/", "images/generations"),
            "https://api.openai.com/v1/images/generations"
        );
        assert_eq!(
            join_endpoint("https://example.com/v1/images/generations", "images/generations"),
            "https://example.com/v1/images/generations"
        );
    }

    #[test]
    fn auth_header_rejects_control_characters() {
        let req = reqwest::Client::new().post("http://localhost/ignored");
        let err = bearer(req, "bad\nkey").expect_err("newline in key");
        match err {
            ImagenError::InvalidRequest(message) => assert!(message.contains("header")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
