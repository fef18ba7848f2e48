use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{ImagenError, Result};

/// Upload limits enforced before dispatch, matching what the app accepts.
pub const MAX_IMAGES: usize = 10;
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const SUPPORTED_MEDIA_TYPES: &[&str] =
    &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// One source image attached to a generation request.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub data: Bytes,
    pub media_type: String,
}

impl ImageInput {
    pub fn new(data: impl Into<Bytes>, media_type: impl Into<String>) -> Result<Self> {
        let data = data.into();
        let media_type = media_type.into();
        if !SUPPORTED_MEDIA_TYPES.contains(&media_type.as_str()) {
            return Err(ImagenError::InvalidRequest(format!(
                "unsupported image media type {media_type:?} (expected one of: {})",
                SUPPORTED_MEDIA_TYPES.join(", ")
            )));
        }
        if data.is_empty() {
            return Err(ImagenError::InvalidRequest(
                "image data must be non-empty".to_string(),
            ));
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(ImagenError::InvalidRequest(format!(
                "image is {} bytes, max is {MAX_IMAGE_BYTES}",
                data.len()
            )));
        }
        Ok(Self { data, media_type })
    }
}

/// A provider-agnostic generation request: source images plus the assembled
/// prompt. Immutable once constructed; the dispatch client never mutates it.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    images: Vec<ImageInput>,
    prompt: String,
}

impl GenerationRequest {
    pub fn new(images: Vec<ImageInput>, prompt: impl Into<String>) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(ImagenError::InvalidRequest(
                "prompt must be non-empty".to_string(),
            ));
        }
        if images.len() > MAX_IMAGES {
            return Err(ImagenError::InvalidRequest(format!(
                "{} images attached, max is {MAX_IMAGES}",
                images.len()
            )));
        }
        Ok(Self { images, prompt })
    }

    pub fn text_only(prompt: impl Into<String>) -> Result<Self> {
        Self::new(Vec::new(), prompt)
    }

    pub fn images(&self) -> &[ImageInput] {
        &self.images
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// The normalized success payload: one image reference, in whichever form
/// the provider returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageRef {
    /// Remote image URL.
    Url { url: String },
    /// Full `data:` URI, renderable as-is.
    DataUri { uri: String },
    /// Base64 payload with its media type.
    Inline { media_type: String, data: String },
    /// Unlabeled model output. Only the google path produces this: the
    /// provider returns generated content without saying whether it is an
    /// image, and the contract there is to pass it through. Callers render
    /// it at their own risk.
    Opaque { content: String },
}

impl ImageRef {
    /// Classify a raw string as a usable image reference. Returns `None`
    /// for anything that is neither an http(s) URL nor a `data:` URI, so
    /// chat-shaped providers fail closed instead of handing prose to an
    /// image renderer.
    pub fn classify(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.starts_with("data:") {
            return Some(Self::DataUri {
                uri: raw.to_string(),
            });
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Some(Self::Url {
                url: raw.to_string(),
            });
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    /// The active provider does not forward image input; the attached
    /// images were dropped from the outbound request.
    DroppedImages { provider: String, count: usize },
    Compatibility { feature: String, details: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub image: ImageRef,
    #[serde(default)]
    pub warnings: Vec<Warning>,
}

impl GenerationResponse {
    pub fn new(image: ImageRef) -> Self {
        Self {
            image,
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_recognizes_urls_and_data_uris() {
        assert_eq!(
            ImageRef::classify("https://cdn.example.com/out.png"),
            Some(ImageRef::Url {
                url: "https://cdn.example.com/out.png".to_string()
            })
        );
        assert_eq!(
            ImageRef::classify("  data:image/png;base64,AQID  "),
            Some(ImageRef::DataUri {
                uri: "data:image/png;base64,AQID".to_string()
            })
        );
    }

    #[test]
    fn classify_rejects_prose() {
        assert_eq!(ImageRef::classify("Sure! Here is your image."), None);
        assert_eq!(ImageRef::classify(""), None);
        assert_eq!(ImageRef::classify("ftp://example.com/a.png"), None);
    }

    #[test]
    fn request_requires_nonempty_prompt() {
        let err = GenerationRequest::text_only("   ").expect_err("blank prompt");
        match err {
            ImagenError::InvalidRequest(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn request_caps_image_count() {
        let image = ImageInput::new(vec![1, 2, 3], "image/png").expect("image");
        let images = vec![image; MAX_IMAGES + 1];
        let err = GenerationRequest::new(images, "prompt").expect_err("too many images");
        match err {
            ImagenError::InvalidRequest(message) => assert!(message.contains("max")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn image_input_rejects_unknown_media_type() {
        let err = ImageInput::new(vec![1], "image/gif").expect_err("gif is not accepted");
        match err {
            ImagenError::InvalidRequest(message) => assert!(message.contains("image/gif")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn image_input_rejects_oversized_data() {
        let err =
            ImageInput::new(vec![0; MAX_IMAGE_BYTES + 1], "image/png").expect_err("too large");
        match err {
            ImagenError::InvalidRequest(message) => assert!(message.contains("bytes")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
