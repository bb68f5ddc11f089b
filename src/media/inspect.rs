//! Non-failing description of a media source.

use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::Serialize;

use super::encoding::mime_type_for;
use super::source::MediaSource;
use super::{MediaKind, BYTES_PER_MIB};
use crate::provider::http::shared_client;

const HEAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Whether a source was a local file or a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    File,
    Url,
}

/// What is known about a source without analyzing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaInfo {
    pub source: String,
    pub origin: SourceOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_mib: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    pub accessible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MediaInfo {
    fn empty(source: &str, origin: SourceOrigin) -> Self {
        Self {
            source: source.to_string(),
            origin,
            size_bytes: None,
            size_mib: None,
            content_type: None,
            extension: None,
            accessible: false,
            error: None,
        }
    }
}

/// Describe `raw`. Local files are stat'ed; URLs get a HEAD request.
pub async fn inspect_source(raw: &str, kind: MediaKind) -> MediaInfo {
    match MediaSource::parse(raw) {
        MediaSource::LocalFile(path) => {
            let mut info = MediaInfo::empty(raw, SourceOrigin::File);
            match tokio::fs::metadata(&path).await {
                Ok(metadata) => {
                    let extension = MediaSource::LocalFile(path.clone()).extension();
                    info.size_bytes = Some(metadata.len());
                    info.size_mib = Some(metadata.len() as f64 / BYTES_PER_MIB as f64);
                    info.content_type = Some(mime_type_for(&path, kind).to_string());
                    info.extension = (!extension.is_empty()).then_some(extension);
                    info.accessible = true;
                }
                Err(_) => info.error = Some("File not found".to_string()),
            }
            info
        }
        MediaSource::RemoteUrl(url) => {
            let mut info = MediaInfo::empty(raw, SourceOrigin::Url);
            let response = shared_client()
                .head(&url)
                .timeout(HEAD_TIMEOUT)
                .send()
                .await
                .and_then(|resp| resp.error_for_status());
            match response {
                Ok(resp) => {
                    info.content_type = resp
                        .headers()
                        .get(CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    info.size_bytes = resp
                        .headers()
                        .get(CONTENT_LENGTH)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse().ok());
                    info.size_mib = info.size_bytes.map(|len| len as f64 / BYTES_PER_MIB as f64);
                    info.accessible = true;
                }
                Err(e) => info.error = Some(e.to_string()),
            }
            info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_local_file_is_reported_not_raised() {
        let info = inspect_source("/no/such/file.mp4", MediaKind::Video).await;
        assert_eq!(info.origin, SourceOrigin::File);
        assert!(!info.accessible);
        assert_eq!(info.error.as_deref(), Some("File not found"));
    }

    #[tokio::test]
    async fn local_file_reports_size_and_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.webm");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let info = inspect_source(path.to_str().unwrap(), MediaKind::Video).await;

        assert!(info.accessible);
        assert_eq!(info.size_bytes, Some(2048));
        assert_eq!(info.content_type.as_deref(), Some("video/webm"));
        assert_eq!(info.extension.as_deref(), Some(".webm"));
    }
}
