use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImagenError {
    #[error("api key is not configured; save one in settings or set {}", crate::settings::DEFAULT_KEY_ENV)]
    MissingCredential,
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("{provider} api error ({status}): {message}")]
    Api {
        provider: String,
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("request aborted")]
    Aborted,
    #[error("empty result: {0}")]
    EmptyResult(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse settings: {0}")]
    SettingsParse(#[from] toml::de::Error),
    #[error("failed to encode settings: {0}")]
    SettingsEncode(#[from] toml::ser::Error),
}

impl ImagenError {
    /// Network-level failures: the request never produced a usable provider
    /// response. A timed-out or aborted call is terminal for the submission
    /// just like a connection error.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout(_) | Self::Aborted)
    }
}

pub type Result<T> = std::result::Result<T, ImagenError>;
