//! Request validation: prompt first, then the source.

use tracing::debug;

use super::source::MediaSource;
use super::{MediaPolicy, BYTES_PER_MIB};
use crate::error::VisionError;

/// Reject empty or whitespace-only prompts.
pub fn validate_prompt(prompt: &str) -> Result<&str, VisionError> {
    if prompt.trim().is_empty() {
        return Err(VisionError::invalid_field(
            "prompt",
            "Prompt is required and cannot be empty",
        ));
    }
    Ok(prompt)
}

/// Classify `raw` and, for local files, check existence, size and (images only) format.
///
/// Remote URLs are returned without any check.
pub async fn validate_source(raw: &str, policy: &MediaPolicy) -> Result<MediaSource, VisionError> {
    let source = MediaSource::parse(raw);
    let path = match &source {
        MediaSource::RemoteUrl(_) => {
            debug!(kind = %policy.kind, "Remote source, skipping local checks");
            return Ok(source);
        }
        MediaSource::LocalFile(path) => path,
    };
    let label = policy.kind.label();

    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(VisionError::not_found(
                format!("{label} file not found: {raw}"),
                raw,
            ));
        }
        Err(e) => return Err(VisionError::Io(e)),
    };

    if !metadata.is_file() {
        return Err(VisionError::invalid_field(
            "source",
            format!("Path is not a file: {raw}"),
        ));
    }

    let size = metadata.len();
    if size > policy.max_size_bytes() {
        let size_mib = size as f64 / BYTES_PER_MIB as f64;
        return Err(VisionError::invalid_field(
            "source",
            format!(
                "{label} file too large: {size_mib:.2}MB. Maximum allowed: {}MB",
                policy.max_size_mib
            ),
        ));
    }

    if let Some(allowed) = policy.allowed_extensions {
        let extension = source.extension();
        if !allowed.contains(&extension.as_str()) {
            return Err(VisionError::invalid_field(
                "source",
                format!(
                    "Unsupported {} format: {}. Supported formats: {}",
                    policy.kind,
                    if extension.is_empty() { "(none)" } else { extension.as_str() },
                    allowed.join(", ")
                ),
            ));
        }
    }

    debug!(kind = %policy.kind, path = %path.display(), size, "Local source validated");
    Ok(source)
}
