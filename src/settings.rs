use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::provider::ProviderKind;
use crate::{ImagenError, Result};

/// Environment variable holding the build-time default API key, used when no
/// credential has been saved.
pub const DEFAULT_KEY_ENV: &str = "FOTO_PRO_API_KEY";

const DEFAULT_PROVIDER: ProviderKind = ProviderKind::Google;

/// The active provider selection plus its API key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub provider: ProviderKind,
    pub api_key: String,
}

impl Credential {
    pub fn new(provider: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Key-value overlay for the default-key lookup: a dotenv map consulted
/// before the process environment.
#[derive(Debug, Clone, Default)]
pub struct Env {
    pub dotenv: BTreeMap<String, String>,
}

impl Env {
    pub fn parse_dotenv(contents: &str) -> Self {
        Self {
            dotenv: parse_dotenv(contents),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.dotenv.get(key) {
            return Some(value.clone());
        }
        std::env::var(key)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

pub fn parse_dotenv(contents: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::<String, String>::new();

    for raw_line in contents.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line).trim();
        let Some((raw_key, raw_value)) = line.split_once('=') else {
            continue;
        };
        let key = raw_key.trim();
        if key.is_empty() {
            continue;
        }

        let mut value = raw_value.trim().to_string();
        if let Some(stripped) = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        {
            value = stripped.to_string();
        }

        if value.trim().is_empty() {
            continue;
        }

        out.insert(key.to_string(), value);
    }

    out
}

/// Injected settings service consumed by the dispatch client. Implementors
/// read on every call; the dispatch client never caches a credential.
pub trait SettingsStore: Send + Sync {
    /// The active credential, or `None` when neither a saved key nor the
    /// environment default is available.
    fn load(&self) -> Result<Option<Credential>>;
    fn save(&self, credential: &Credential) -> Result<()>;
    /// Drop the saved credential; subsequent loads fall back to the
    /// environment default.
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

impl StoredSettings {
    fn resolve(self, env: &Env) -> Result<Option<Credential>> {
        let provider = match self.provider.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(raw) => raw.parse::<ProviderKind>()?,
            None => DEFAULT_PROVIDER,
        };

        if let Some(key) = self.api_key.filter(|k| !k.trim().is_empty()) {
            return Ok(Some(Credential::new(provider, key)));
        }
        Ok(env
            .get(DEFAULT_KEY_ENV)
            .map(|key| Credential::new(provider, key)))
    }
}

/// TOML-file-backed store with two keys, `provider` and `api_key`. The file
/// is re-read on every load; concurrent writers are last-write-wins, which
/// matches how the app treats its settings.
pub struct FileSettings {
    path: PathBuf,
    env: Env,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env: Env::default(),
        }
    }

    pub fn with_env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    fn read(&self) -> Result<StoredSettings> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredSettings::default());
            }
            Err(err) => return Err(ImagenError::Io(err)),
        };
        Ok(toml::from_str::<StoredSettings>(&contents)?)
    }
}

impl SettingsStore for FileSettings {
    fn load(&self) -> Result<Option<Credential>> {
        self.read()?.resolve(&self.env)
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let stored = StoredSettings {
            provider: Some(credential.provider.as_str().to_string()),
            api_key: Some(credential.api_key.clone()),
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, toml::to_string_pretty(&stored)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ImagenError::Io(err)),
        }
    }
}

/// In-memory store for tests and embedders with their own persistence.
#[derive(Default)]
pub struct MemorySettings {
    inner: Mutex<Option<Credential>>,
    env: Env,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    pub fn with_credential(self, credential: Credential) -> Self {
        *self.inner.lock().expect("settings lock") = Some(credential);
        self
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> Result<Option<Credential>> {
        let saved = self.inner.lock().expect("settings lock").clone();
        let provider = saved
            .as_ref()
            .map(|c| c.provider)
            .unwrap_or(DEFAULT_PROVIDER);
        if let Some(credential) = saved {
            if !credential.api_key.trim().is_empty() {
                return Ok(Some(credential));
            }
        }
        Ok(self
            .env
            .get(DEFAULT_KEY_ENV)
            .map(|key| Credential::new(provider, key)))
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        *self.inner.lock().expect("settings lock") = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.inner.lock().expect("settings lock") = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotenv_basic() {
        let parsed = parse_dotenv(
            r#"
# comment
export FOTO_PRO_API_KEY="AIza-test"
FOO=bar
EMPTY=
"#,
        );
        assert_eq!(
            parsed.get("FOTO_PRO_API_KEY").map(String::as_str),
            Some("AIza-test")
        );
        assert_eq!(parsed.get("FOO").map(String::as_str), Some("bar"));
        assert_eq!(parsed.get("EMPTY"), None);
    }

    #[test]
    fn file_store_roundtrips_provider_and_key() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileSettings::new(dir.path().join("settings.toml"));

        let saved = Credential::new(ProviderKind::OpenRouter, "or-0123456789abcdefghij");
        store.save(&saved)?;

        let loaded = store.load()?.expect("credential saved");
        assert_eq!(loaded, saved);
        Ok(())
    }

    #[test]
    fn missing_file_without_default_yields_none() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileSettings::new(dir.path().join("settings.toml"));
        assert_eq!(store.load()?, None);
        Ok(())
    }

    #[test]
    fn clear_falls_back_to_env_default() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let env = Env::parse_dotenv("FOTO_PRO_API_KEY=default-key");
        let store = FileSettings::new(dir.path().join("settings.toml")).with_env(env);

        store.save(&Credential::new(ProviderKind::Maia, "maia-0123456789abcdef"))?;
        store.clear()?;

        let loaded = store.load()?.expect("env default");
        assert_eq!(loaded.provider, ProviderKind::Google);
        assert_eq!(loaded.api_key, "default-key");
        Ok(())
    }

    #[test]
    fn unknown_stored_provider_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "provider = \"stability\"\napi_key = \"k\"\n")?;

        let err = FileSettings::new(path).load().expect_err("unknown provider");
        match err {
            ImagenError::UnsupportedProvider(name) => assert_eq!(name, "stability"),
            other => panic!("unexpected error: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn blank_saved_key_uses_env_default_provider_selection() -> Result<()> {
        let env = Env::parse_dotenv("FOTO_PRO_API_KEY=default-key");
        let store = MemorySettings::new()
            .with_env(env)
            .with_credential(Credential::new(ProviderKind::OpenAi, "  "));

        let loaded = store.load()?.expect("env default");
        // A blank key falls back to the env default; the provider selection
        // is an independent entry and survives.
        assert_eq!(loaded.provider, ProviderKind::OpenAi);
        assert_eq!(loaded.api_key, "default-key");
        Ok(())
    }

    #[test]
    fn credential_debug_redacts_key() {
        let credential = Credential::new(ProviderKind::Google, "AIza-secret");
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("AIza-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
