use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ImagenError;

/// The providers the dispatch client can target. Adding one means adding a
/// variant here plus an adapter in `providers/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Google,
    OpenAi,
    OpenRouter,
    Maia,
}

/// What a provider can actually do with the request, surfaced so callers can
/// warn users before dispatch instead of discovering it from the wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    /// Whether uploaded images are forwarded to the provider. When false the
    /// dispatch client drops them and records a warning on the response.
    #[serde(default)]
    pub image_input: bool,
}

impl ProviderKind {
    pub const ALL: [Self; 4] = [Self::Google, Self::OpenAi, Self::OpenRouter, Self::Maia];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::OpenAi => "openai",
            Self::OpenRouter => "openrouter",
            Self::Maia => "maia",
        }
    }

    pub fn capabilities(self) -> ProviderCapabilities {
        match self {
            Self::Google => ProviderCapabilities { image_input: true },
            Self::OpenAi | Self::OpenRouter | Self::Maia => {
                ProviderCapabilities { image_input: false }
            }
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Google => "https://generativelanguage.googleapis.com/v1beta",
            Self::OpenAi => "https://api.openai.com/v1",
            Self::OpenRouter => "https://openrouter.ai/api",
            Self::Maia => "https://api.maiarouter.ai/v1/chat/completions",
        }
    }

    /// Default model identifier, for the providers whose wire format carries
    /// one. The OpenAI-shaped images endpoint takes no model field.
    pub fn default_model(self) -> Option<&'static str> {
        match self {
            Self::Google => Some("gemini-1.5-flash"),
            Self::Maia => Some("maia-1.5"),
            Self::OpenAi | Self::OpenRouter => None,
        }
    }

    /// Advisory shape check for a pasted API key, as the settings form
    /// applies it. The store itself saves whatever it is told.
    pub fn plausible_key(self, key: &str) -> bool {
        let key = key.trim();
        match self {
            Self::Google => key.len() >= 30 && key.starts_with("AIza"),
            Self::OpenAi => key.starts_with("sk-"),
            Self::OpenRouter | Self::Maia => key.len() >= 20,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ImagenError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "google" => Ok(Self::Google),
            "openai" => Ok(Self::OpenAi),
            "openrouter" => Ok(Self::OpenRouter),
            "maia" => Ok(Self::Maia),
            other => Err(ImagenError::UnsupportedProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_provider_strings() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn rejects_unknown_provider_string() {
        let err = "stability".parse::<ProviderKind>().expect_err("unknown");
        match err {
            ImagenError::UnsupportedProvider(name) => assert_eq!(name, "stability"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn only_google_forwards_images() {
        assert!(ProviderKind::Google.capabilities().image_input);
        assert!(!ProviderKind::OpenAi.capabilities().image_input);
        assert!(!ProviderKind::OpenRouter.capabilities().image_input);
        assert!(!ProviderKind::Maia.capabilities().image_input);
    }

    #[test]
    fn key_shape_checks_match_settings_form() {
        assert!(ProviderKind::Google.plausible_key("AIzaSyA-0123456789abcdefghijklmnop"));
        assert!(!ProviderKind::Google.plausible_key("sk-short"));
        assert!(ProviderKind::OpenAi.plausible_key("sk-anything"));
        assert!(!ProviderKind::OpenAi.plausible_key("pk-anything"));
        assert!(ProviderKind::OpenRouter.plausible_key("or-0123456789abcdefghij"));
        assert!(!ProviderKind::Maia.plausible_key("short"));
    }
}
