mod dispatch;
mod error;
pub mod presets;
mod provider;
pub mod providers;
mod settings;
mod submission;
mod types;

pub use dispatch::{AbortToken, DEFAULT_TIMEOUT, DispatchClient};
pub use error::{ImagenError, Result};
pub use provider::{ProviderCapabilities, ProviderKind};
pub use settings::{
    Credential, DEFAULT_KEY_ENV, Env, FileSettings, MemorySettings, SettingsStore, parse_dotenv,
};
pub use submission::{Submission, SubmissionState, SubmissionTicket};
pub use types::{
    GenerationRequest, GenerationResponse, ImageInput, ImageRef, MAX_IMAGE_BYTES, MAX_IMAGES,
    SUPPORTED_MEDIA_TYPES, Warning,
};

pub use providers::ImageProvider;

#[cfg(feature = "google")]
pub use providers::Google;
#[cfg(feature = "maia")]
pub use providers::Maia;
#[cfg(feature = "openai")]
pub use providers::OpenAiImages;
#[cfg(feature = "openrouter")]
pub use providers::OpenRouterImages;
