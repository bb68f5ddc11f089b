//! Media sources: classification, validation, encoding and inspection.

pub mod encoding;
pub mod inspect;
pub mod source;
pub mod validation;

pub use encoding::{encode_source, mime_type_for};
pub use inspect::{inspect_source, MediaInfo};
pub use source::MediaSource;
pub use validation::{validate_prompt, validate_source};

use serde::{Deserialize, Serialize};
use strum::Display;

/// Bytes per MiB, the unit of all size limits.
pub const BYTES_PER_MIB: u64 = 1_048_576;

/// Extensions accepted for local image files.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

/// What kind of media a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Capitalized noun used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Video => "Video",
        }
    }
}

/// Checks applied to a local file of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaPolicy {
    pub kind: MediaKind,
    pub max_size_mib: u64,
    /// Lower-cased extensions including the dot. `None` skips the format check.
    pub allowed_extensions: Option<&'static [&'static str]>,
}

impl MediaPolicy {
    /// Images: size limit plus the `.jpg`/`.jpeg`/`.png` format check.
    pub fn image(max_size_mib: u64) -> Self {
        Self {
            kind: MediaKind::Image,
            max_size_mib,
            allowed_extensions: Some(IMAGE_EXTENSIONS),
        }
    }

    /// Videos: size limit only. The extension is not checked.
    pub fn video(max_size_mib: u64) -> Self {
        Self {
            kind: MediaKind::Video,
            max_size_mib,
            allowed_extensions: None,
        }
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mib.saturating_mul(BYTES_PER_MIB)
    }
}

/// A validated prompt paired with a validated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub kind: MediaKind,
    pub source: MediaSource,
    pub prompt: String,
}
