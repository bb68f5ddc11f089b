//! Immutable runtime configuration, resolved once at startup and injected.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bon::Builder;
use strum::{Display, EnumString};
use thiserror::Error;

use crate::media::{MediaKind, MediaPolicy};
use crate::util::retry::RetryPolicy;

pub const DEFAULT_MODEL: &str = "glm-4.5v";
pub const ZAI_BASE_URL: &str = "https://api.z.ai/api/paas/v4/";
pub const ZHIPU_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4/";

/// Configuration failure. Raised before any request runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Which hosted platform the API key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum PlatformMode {
    Zai,
    Zhipu,
    Auto,
}

impl PlatformMode {
    /// Resolve `Auto` from the API key: keys mentioning `zhipu` or `glm` belong to Zhipu.
    pub fn resolve(self, api_key: &str) -> PlatformMode {
        match self {
            Self::Auto => {
                let key = api_key.to_ascii_lowercase();
                if key.contains("zhipu") || key.contains("glm") {
                    Self::Zhipu
                } else {
                    Self::Zai
                }
            }
            other => other,
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Zhipu => ZHIPU_BASE_URL,
            Self::Zai | Self::Auto => ZAI_BASE_URL,
        }
    }
}

/// Settings for the vision API and the local media limits.
#[derive(Clone, Builder)]
pub struct VisionConfig {
    #[builder(into)]
    api_key: String,
    #[builder(into, default = ZAI_BASE_URL.to_string())]
    base_url: String,
    #[builder(default = PlatformMode::Zai)]
    platform: PlatformMode,
    #[builder(into, default = DEFAULT_MODEL.to_string())]
    model: String,
    #[builder(default = 0.8)]
    temperature: f64,
    #[builder(default = 0.6)]
    top_p: f64,
    #[builder(default = 16_384)]
    max_tokens: u32,
    #[builder(default = Duration::from_secs(300))]
    timeout: Duration,
    #[builder(default = 2)]
    retry_count: u32,
    #[builder(default = Duration::from_secs(1))]
    retry_delay: Duration,
    #[builder(default = 5)]
    max_image_size_mib: u64,
    #[builder(default = 8)]
    max_video_size_mib: u64,
    #[builder(default = Duration::from_secs(1))]
    recovery_delay: Duration,
}

impl fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisionConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("platform", &self.platform)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("retry_count", &self.retry_count)
            .field("retry_delay", &self.retry_delay)
            .field("max_image_size_mib", &self.max_image_size_mib)
            .field("max_video_size_mib", &self.max_video_size_mib)
            .field("recovery_delay", &self.recovery_delay)
            .finish()
    }
}

impl VisionConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv(); // .env is optional
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Used by [`Self::from_env`] and tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("Z_AI_API_KEY").ok_or(ConfigError::Missing("Z_AI_API_KEY"))?;

        let platform = match get("PLATFORM_MODE") {
            Some(raw) => PlatformMode::from_str(&raw).map_err(|_| ConfigError::Invalid {
                key: "PLATFORM_MODE",
                message: format!("expected ZAI, ZHIPU or AUTO, got '{raw}'"),
            })?,
            None => PlatformMode::Auto,
        }
        .resolve(&api_key);

        let base_url = match get("Z_AI_BASE_URL") {
            Some(url) => {
                let parsed = reqwest::Url::parse(&url).map_err(|e| ConfigError::Invalid {
                    key: "Z_AI_BASE_URL",
                    message: e.to_string(),
                })?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ConfigError::Invalid {
                        key: "Z_AI_BASE_URL",
                        message: format!("unsupported scheme '{}'", parsed.scheme()),
                    });
                }
                url
            }
            None => platform.default_base_url().to_string(),
        };

        let timeout = match get("TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(parse_in_range(
                "TIMEOUT_MS",
                &raw,
                1_000u64,
                3_600_000,
            )?),
            None => Duration::from_secs(parse_or(
                "TIMEOUT_SECONDS",
                get("TIMEOUT_SECONDS"),
                300u64,
                1,
                3_600,
            )?),
        };

        let retry_delay_secs = parse_or("RETRY_DELAY_SECONDS", get("RETRY_DELAY_SECONDS"), 1.0f64, 0.1, 60.0)?;
        let recovery_delay_ms = parse_or("RECOVERY_DELAY_MS", get("RECOVERY_DELAY_MS"), 1_000u64, 0, 600_000)?;

        Ok(Self {
            api_key,
            base_url,
            platform,
            model: get("VISION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: parse_or("TEMPERATURE", get("TEMPERATURE"), 0.8, 0.0, 2.0)?,
            top_p: parse_or("TOP_P", get("TOP_P"), 0.6, 0.0, 1.0)?,
            max_tokens: parse_or("MAX_TOKENS", get("MAX_TOKENS"), 16_384u32, 1, 32_768)?,
            timeout,
            retry_count: parse_or("RETRY_COUNT", get("RETRY_COUNT"), 2u32, 0, 5)?,
            retry_delay: Duration::from_secs_f64(retry_delay_secs),
            max_image_size_mib: parse_or("MAX_IMAGE_SIZE_MB", get("MAX_IMAGE_SIZE_MB"), 5u64, 1, 100)?,
            max_video_size_mib: parse_or("MAX_VIDEO_SIZE_MB", get("MAX_VIDEO_SIZE_MB"), 8u64, 1, 500)?,
            recovery_delay: Duration::from_millis(recovery_delay_ms),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn platform(&self) -> PlatformMode {
        self.platform
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn top_p(&self) -> f64 {
        self.top_p
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    pub fn recovery_delay(&self) -> Duration {
        self.recovery_delay
    }

    /// Full chat-completions URL.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_count, self.retry_delay)
    }

    /// Local-file policy for a media kind.
    pub fn media_policy(&self, kind: MediaKind) -> MediaPolicy {
        match kind {
            MediaKind::Image => MediaPolicy::image(self.max_image_size_mib),
            MediaKind::Video => MediaPolicy::video(self.max_video_size_mib),
        }
    }
}

fn parse_in_range<T>(key: &'static str, raw: &str, min: T, max: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + fmt::Display + Copy,
{
    let value: T = raw.parse().map_err(|_| ConfigError::Invalid {
        key,
        message: format!("could not parse '{raw}'"),
    })?;
    if value < min || value > max {
        return Err(ConfigError::Invalid {
            key,
            message: format!("{value} is outside {min}..={max}"),
        });
    }
    Ok(value)
}

fn parse_or<T>(
    key: &'static str,
    raw: Option<String>,
    default: T,
    min: T,
    max: T,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + fmt::Display + Copy,
{
    match raw {
        Some(raw) => parse_in_range(key, &raw, min, max),
        None => Ok(default),
    }
}
