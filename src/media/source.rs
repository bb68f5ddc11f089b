//! Classification of raw source strings.

use std::fmt;
use std::path::PathBuf;

use reqwest::Url;

/// Where the media lives. Derived from the raw request string, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    LocalFile(PathBuf),
    /// The raw string, passed upstream untouched.
    RemoteUrl(String),
}

impl MediaSource {
    /// `http`/`https` URLs with a host are remote; everything else is a local path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_remote_url(trimmed) {
            Self::RemoteUrl(trimmed.to_string())
        } else {
            Self::LocalFile(PathBuf::from(raw))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteUrl(_))
    }

    /// Lower-cased extension including the leading dot, or `""`.
    pub fn extension(&self) -> String {
        let path = match self {
            Self::LocalFile(path) => path.clone(),
            Self::RemoteUrl(url) => Url::parse(url)
                .map(|u| PathBuf::from(u.path()))
                .unwrap_or_default(),
        };
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default()
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalFile(path) => write!(f, "{}", path.display()),
            Self::RemoteUrl(url) => f.write_str(url),
        }
    }
}

fn is_remote_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().map(|h| !h.is_empty()).unwrap_or(false)
        }
        Err(_) => false,
    }
}
