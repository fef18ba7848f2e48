use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::provider::{ProviderCapabilities, ProviderKind};
use crate::providers::ImageProvider;
use crate::settings::SettingsStore;
use crate::types::{GenerationRequest, GenerationResponse};
use crate::{ImagenError, Result};

/// How long a dispatch call may run before it resolves as a transport
/// failure instead of leaving the form stuck in `Dispatching`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Caller-side cancellation for an in-flight dispatch call. Cloneable;
/// aborting from any clone resolves the call with `ImagenError::Aborted`.
#[derive(Debug, Clone, Default)]
pub struct AbortToken {
    inner: CancellationToken,
}

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.inner.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.inner.is_cancelled()
    }

    pub(crate) async fn aborted(&self) {
        self.inner.cancelled().await;
    }
}

/// The generation dispatch client: resolves the active provider and
/// credential from the injected settings store, issues exactly one outbound
/// request, and normalizes the response. No retries; every failure is
/// terminal for that submission and a new one takes an explicit user action.
pub struct DispatchClient {
    http: reqwest::Client,
    settings: Arc<dyn SettingsStore>,
    timeout: Duration,
    base_urls: BTreeMap<ProviderKind, String>,
    models: BTreeMap<ProviderKind, String>,
}

impl DispatchClient {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
            timeout: DEFAULT_TIMEOUT,
            base_urls: BTreeMap::new(),
            models: BTreeMap::new(),
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override a provider's endpoint, e.g. for a self-hosted router or a
    /// test server.
    pub fn with_base_url(mut self, provider: ProviderKind, base_url: impl Into<String>) -> Self {
        self.base_urls.insert(provider, base_url.into());
        self
    }

    pub fn with_model(mut self, provider: ProviderKind, model: impl Into<String>) -> Self {
        self.models.insert(provider, model.into());
        self
    }

    /// The per-provider capability flags, so callers can warn users (e.g.
    /// about dropped image uploads) before dispatching.
    pub fn capabilities(provider: ProviderKind) -> ProviderCapabilities {
        provider.capabilities()
    }

    /// Dispatch with a fresh, never-aborted token.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        self.generate_with(request, &AbortToken::new()).await
    }

    /// Dispatch one generation request. The settings store is read at call
    /// time; a missing or blank credential fails before any network
    /// activity. The call resolves within the configured timeout or when
    /// `abort` fires, whichever comes first.
    pub async fn generate_with(
        &self,
        request: GenerationRequest,
        abort: &AbortToken,
    ) -> Result<GenerationResponse> {
        let credential = self.settings.load()?.ok_or(ImagenError::MissingCredential)?;
        if credential.api_key.trim().is_empty() {
            return Err(ImagenError::MissingCredential);
        }

        let provider = self.provider_for(credential.provider)?;
        tracing::debug!(
            provider = provider.name(),
            images = request.images().len(),
            prompt_len = request.prompt().len(),
            "dispatching generation request"
        );

        let outcome = tokio::select! {
            _ = abort.aborted() => Err(ImagenError::Aborted),
            outcome = tokio::time::timeout(
                self.timeout,
                provider.generate(&credential.api_key, &request),
            ) => match outcome {
                Ok(result) => result,
                Err(_) => Err(ImagenError::Timeout(self.timeout)),
            },
        };

        match &outcome {
            Ok(response) => tracing::debug!(
                provider = provider.name(),
                warnings = response.warnings.len(),
                "generation request succeeded"
            ),
            Err(err) => tracing::debug!(
                provider = provider.name(),
                error = %err,
                "generation request failed"
            ),
        }
        outcome
    }

    fn provider_for(&self, kind: ProviderKind) -> Result<Box<dyn ImageProvider>> {
        let base_url = self.base_urls.get(&kind).cloned();
        let model = self.models.get(&kind).cloned();

        match kind {
            #[cfg(feature = "google")]
            ProviderKind::Google => {
                let mut google =
                    crate::providers::Google::new().with_http_client(self.http.clone());
                if let Some(base_url) = base_url {
                    google = google.with_base_url(base_url);
                }
                if let Some(model) = model {
                    google = google.with_model(model);
                }
                Ok(Box::new(google))
            }
            #[cfg(feature = "openai")]
            ProviderKind::OpenAi => {
                let mut openai =
                    crate::providers::OpenAiImages::new().with_http_client(self.http.clone());
                if let Some(base_url) = base_url {
                    openai = openai.with_base_url(base_url);
                }
                Ok(Box::new(openai))
            }
            #[cfg(feature = "openrouter")]
            ProviderKind::OpenRouter => {
                let mut openrouter =
                    crate::providers::OpenRouterImages::new().with_http_client(self.http.clone());
                if let Some(base_url) = base_url {
                    openrouter = openrouter.with_base_url(base_url);
                }
                Ok(Box::new(openrouter))
            }
            #[cfg(feature = "maia")]
            ProviderKind::Maia => {
                let mut maia = crate::providers::Maia::new().with_http_client(self.http.clone());
                if let Some(endpoint) = base_url {
                    maia = maia.with_endpoint(endpoint);
                }
                if let Some(model) = model {
                    maia = maia.with_model(model);
                }
                Ok(Box::new(maia))
            }
            #[allow(unreachable_patterns)]
            other => Err(ImagenError::UnsupportedProvider(format!(
                "{other} (not enabled in this build)"
            ))),
        }
    }
}
