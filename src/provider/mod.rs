//! Vision completion provider trait and the chat-completions implementation.

pub mod http;
pub mod vision;

pub use vision::VisionClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::VisionError;
use crate::media::MediaKind;

/// URL wrapper used by media content items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRef {
    pub url: String,
}

/// One item of the user message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    ImageUrl { image_url: UrlRef },
    VideoUrl { video_url: UrlRef },
    Text { text: String },
}

impl ContentItem {
    /// Media item for an encoded source (data URI or remote URL).
    pub fn media(kind: MediaKind, url: impl Into<String>) -> Self {
        let url = UrlRef { url: url.into() };
        match kind {
            MediaKind::Image => Self::ImageUrl { image_url: url },
            MediaKind::Video => Self::VideoUrl { video_url: url },
        }
    }
}

/// A single-turn vision request: media items followed by the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionRequest {
    pub media: Vec<ContentItem>,
    pub prompt: String,
}

impl VisionRequest {
    pub fn single(kind: MediaKind, encoded: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            media: vec![ContentItem::media(kind, encoded)],
            prompt: prompt.into(),
        }
    }

    /// Message content: the media items, then a trailing text item with the prompt.
    pub fn content(&self) -> Vec<ContentItem> {
        let mut content = self.media.clone();
        content.push(ContentItem::Text {
            text: self.prompt.clone(),
        });
        content
    }
}

/// Anything that can answer a [`VisionRequest`] with completion text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn model_id(&self) -> &str;

    async fn complete(&self, request: &VisionRequest) -> Result<String, VisionError>;
}
