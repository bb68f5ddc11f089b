//! Turn a validated source into what the upstream API accepts: a data URI for
//! local files, the URL itself for remote sources.

use std::path::Path;

use base64::Engine;

use super::source::MediaSource;
use super::MediaKind;
use crate::error::VisionError;

/// MIME type for a file extension. Unknown extensions fall back to
/// `image/png` for images and `video/mp4` for videos.
pub fn mime_type_for(path: &Path, kind: MediaKind) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match kind {
        MediaKind::Image => match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            _ => "image/png",
        },
        MediaKind::Video => match extension.as_str() {
            "mp4" => "video/mp4",
            "avi" => "video/x-msvideo",
            "mov" => "video/quicktime",
            "wmv" => "video/x-ms-wmv",
            "webm" => "video/webm",
            "m4v" => "video/x-m4v",
            _ => "video/mp4",
        },
    }
}

/// Build `data:<mime>;base64,<payload>` from raw bytes.
pub fn to_data_uri(bytes: &[u8], mime_type: &str) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime_type};base64,{payload}")
}

/// Encode a source for transport. Remote URLs are returned unchanged and never fetched.
pub async fn encode_source(source: &MediaSource, kind: MediaKind) -> Result<String, VisionError> {
    match source {
        MediaSource::RemoteUrl(url) => Ok(url.clone()),
        MediaSource::LocalFile(path) => {
            let bytes = tokio::fs::read(path).await?;
            Ok(to_data_uri(&bytes, mime_type_for(path, kind)))
        }
    }
}
