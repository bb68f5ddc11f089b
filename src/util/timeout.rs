//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::VisionError;

/// Wrap a future with a deadline. Past the deadline the future is dropped,
/// aborting whatever it had in flight.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, VisionError>>,
) -> Result<T, VisionError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(VisionError::Timeout(duration.as_millis() as u64)),
    }
}
