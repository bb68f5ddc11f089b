//! Tests for configuration loading.

use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pretty_assertions::assert_eq;

use vision_relay::config::{ConfigError, PlatformMode, VisionConfig, ZHIPU_BASE_URL};
use vision_relay::media::MediaKind;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_ENV_VARS: [&str; 8] = [
    "Z_AI_API_KEY",
    "Z_AI_BASE_URL",
    "PLATFORM_MODE",
    "VISION_MODEL",
    "TIMEOUT_SECONDS",
    "TIMEOUT_MS",
    "RETRY_COUNT",
    "MAX_IMAGE_SIZE_MB",
];

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn capture(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| ((*key).to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[test]
fn from_env_reads_process_environment() {
    let _lock = env_lock_guard();
    let _guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
    std::env::set_var("Z_AI_API_KEY", "env-key");
    std::env::set_var("RETRY_COUNT", "4");
    std::env::set_var("MAX_IMAGE_SIZE_MB", "12");

    let config = VisionConfig::from_env().unwrap();

    assert_eq!(config.api_key(), "env-key");
    assert_eq!(config.retry_count(), 4);
    assert_eq!(config.media_policy(MediaKind::Image).max_size_mib, 12);
}

#[test]
fn from_env_requires_api_key() {
    let _lock = env_lock_guard();
    let _guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    std::env::remove_var("Z_AI_API_KEY");

    match VisionConfig::from_env() {
        Err(ConfigError::Missing(key)) => assert_eq!(key, "Z_AI_API_KEY"),
        other => panic!("expected missing key error, got {other:?}"),
    }
}

#[test]
fn from_env_honours_platform_and_model_overrides() {
    let _lock = env_lock_guard();
    let _guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
    std::env::set_var("Z_AI_API_KEY", "plain-key");
    std::env::set_var("PLATFORM_MODE", "zhipu");
    std::env::set_var("VISION_MODEL", "glm-4.5v-flash");
    std::env::set_var("TIMEOUT_SECONDS", "30");

    let config = VisionConfig::from_env().unwrap();

    assert_eq!(config.platform(), PlatformMode::Zhipu);
    assert_eq!(config.base_url(), ZHIPU_BASE_URL);
    assert_eq!(config.model(), "glm-4.5v-flash");
    assert_eq!(config.timeout(), Duration::from_secs(30));
}

#[test]
fn from_env_rejects_non_http_base_url() {
    let _lock = env_lock_guard();
    let _guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
    std::env::set_var("Z_AI_API_KEY", "abc");
    std::env::set_var("Z_AI_BASE_URL", "ftp://example.com/v4");

    let err = VisionConfig::from_env().unwrap_err();

    assert!(matches!(err, ConfigError::Invalid { key: "Z_AI_BASE_URL", .. }));
}
