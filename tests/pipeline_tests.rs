//! End-to-end pipeline tests with a scripted provider.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::Builder;

use common::{fast_config, ScriptedProvider};
use vision_relay::config::VisionConfig;
use vision_relay::error::{ErrorKind, VisionError};
use vision_relay::media::MediaKind;
use vision_relay::pipeline::AnalysisPipeline;
use vision_relay::provider::ContentItem;

fn pipeline_with(provider: Arc<ScriptedProvider>) -> AnalysisPipeline {
    AnalysisPipeline::with_provider(Arc::new(fast_config()), provider)
}

#[tokio::test]
async fn missing_image_never_reaches_provider() {
    let provider = ScriptedProvider::new();
    let pipeline = pipeline_with(provider.clone());

    let err = pipeline
        .analyze(MediaKind::Image, "/nonexistent.png", "describe this")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    assert_eq!(err.message(), "Image file not found: /nonexistent.png");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn empty_prompt_fails_before_any_call() {
    let provider = ScriptedProvider::new();
    let pipeline = pipeline_with(provider.clone());

    let envelope = pipeline
        .analyze_video("https://example.com/v.mp4", "")
        .await;

    assert!(!envelope.is_success());
    assert!(envelope.error().unwrap().starts_with("Prompt is required"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn remote_url_is_sent_unchanged() {
    let provider = ScriptedProvider::new();
    provider.queue_text("A dog on a beach.");
    let pipeline = pipeline_with(provider.clone());

    let envelope = pipeline
        .analyze_image("https://example.com/dog.jpg", "What is shown?")
        .await;

    assert!(envelope.is_success());
    assert_eq!(envelope.data(), Some(&serde_json::json!("A dog on a beach.")));
    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].content(),
        vec![
            ContentItem::media(MediaKind::Image, "https://example.com/dog.jpg"),
            ContentItem::Text {
                text: "What is shown?".into()
            },
        ]
    );
}

#[tokio::test]
async fn local_image_is_sent_as_data_uri() {
    let file = Builder::new().suffix(".jpg").tempfile().unwrap();
    std::fs::write(file.path(), b"jpeg-bytes").unwrap();
    let provider = ScriptedProvider::new();
    let pipeline = pipeline_with(provider.clone());

    pipeline
        .analyze(MediaKind::Image, &file.path().to_string_lossy(), "describe")
        .await
        .unwrap();

    let requests = provider.requests();
    match &requests[0].media[0] {
        ContentItem::ImageUrl { image_url } => {
            assert!(image_url.url.starts_with("data:image/jpeg;base64,"));
        }
        other => panic!("expected image item, got {other:?}"),
    }
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let provider = ScriptedProvider::new();
    provider.queue_error(VisionError::network("connection reset by peer"));
    provider.queue_error(VisionError::api(502, "bad gateway"));
    provider.queue_text("Recovered.");
    let pipeline = pipeline_with(provider.clone());

    let text = pipeline
        .analyze(MediaKind::Video, "https://example.com/v.mp4", "summarize")
        .await
        .unwrap();

    assert_eq!(text, "Recovered.");
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn exhausted_retries_classify_last_fault() {
    let provider = ScriptedProvider::new();
    for _ in 0..3 {
        provider.queue_error(VisionError::api(401, "invalid api key"));
    }
    let pipeline = pipeline_with(provider.clone());

    let err = pipeline
        .analyze(MediaKind::Image, "https://example.com/a.png", "describe")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(provider.calls(), 3);
    assert_eq!(
        err.context().operation.as_deref(),
        Some("analyze_image")
    );
    assert_eq!(err.context().get("max_attempts"), Some(&serde_json::json!(3)));
    assert!(err.context().get("request_id").is_some());
}

#[tokio::test(start_paused = true)]
async fn failing_request_waits_through_backoff_and_recovery() {
    let provider = ScriptedProvider::new();
    for _ in 0..3 {
        provider.queue_error(VisionError::network("connection refused"));
    }
    let config = VisionConfig::builder()
        .api_key("test-key")
        .retry_count(2)
        .retry_delay(Duration::from_millis(1000))
        .recovery_delay(Duration::from_millis(500))
        .build();
    let pipeline = AnalysisPipeline::with_provider(Arc::new(config), provider.clone());
    let started = tokio::time::Instant::now();

    let err = pipeline
        .analyze(MediaKind::Image, "https://example.com/a.png", "describe")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(provider.calls(), 3);
    // 1000ms + 2000ms of backoff, then the recovery delay.
    assert_eq!(started.elapsed(), Duration::from_millis(3500));
}

#[tokio::test]
async fn oversized_video_is_a_validation_failure() {
    let file = Builder::new().suffix(".mp4").tempfile().unwrap();
    file.as_file().set_len(2 * 1_048_576).unwrap();
    let config = VisionConfig::builder()
        .api_key("test-key")
        .retry_count(0)
        .max_video_size_mib(1)
        .recovery_delay(Duration::ZERO)
        .build();
    let provider = ScriptedProvider::new();
    let pipeline = AnalysisPipeline::with_provider(Arc::new(config), provider.clone());

    let envelope = pipeline
        .analyze_video(&file.path().to_string_lossy(), "summarize")
        .await;

    assert_eq!(
        envelope.error(),
        Some("Video file too large: 2.00MB. Maximum allowed: 1MB")
    );
    assert_eq!(provider.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn missing_file_is_revalidated_on_every_attempt() {
    let provider = ScriptedProvider::new();
    let config = VisionConfig::builder()
        .api_key("test-key")
        .retry_count(2)
        .retry_delay(Duration::from_millis(1000))
        .recovery_delay(Duration::from_millis(500))
        .build();
    let pipeline = AnalysisPipeline::with_provider(Arc::new(config), provider.clone());
    let started = tokio::time::Instant::now();

    let err = pipeline
        .analyze(MediaKind::Image, "/nonexistent.png", "describe this")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    assert_eq!(provider.calls(), 0);
    // Three validation passes separated by 1000ms and 2000ms. Business errors get no recovery wait.
    assert_eq!(started.elapsed(), Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn file_appearing_between_attempts_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("late.png");
    let raw = path.to_string_lossy().into_owned();
    let provider = ScriptedProvider::new();
    provider.queue_text("Found it.");
    let config = VisionConfig::builder()
        .api_key("test-key")
        .retry_count(2)
        .retry_delay(Duration::from_millis(1000))
        .build();
    let pipeline = AnalysisPipeline::with_provider(Arc::new(config), provider.clone());

    let task = tokio::spawn(async move {
        pipeline
            .analyze(MediaKind::Image, &raw, "describe")
            .await
    });
    // First attempt has failed validation and is backing off.
    tokio::time::sleep(Duration::from_millis(500)).await;
    std::fs::write(&path, b"png-bytes").unwrap();

    let text = task.await.unwrap().unwrap();

    assert_eq!(text, "Found it.");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn remote_url_is_trimmed_before_sending() {
    let provider = ScriptedProvider::new();
    let pipeline = pipeline_with(provider.clone());

    pipeline
        .analyze(MediaKind::Video, "  https://example.com/v.mp4 ", "summarize")
        .await
        .unwrap();

    assert_eq!(
        provider.requests()[0].media,
        vec![ContentItem::media(MediaKind::Video, "https://example.com/v.mp4")]
    );
}
