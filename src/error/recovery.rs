//! Best-effort mitigation hooks run after classification.
//!
//! Recovery never retries the failed operation; retrying belongs to
//! [`crate::util::retry::RetryPolicy`] at the call boundary.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use super::unified::{ErrorCategory, StandardError};

/// Marker describing what a recovery strategy did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryOutcome {
    pub strategy: String,
    pub action: String,
}

/// A recovery strategy failed. Logged by the handler, never surfaced.
#[derive(Error, Debug)]
#[error("recovery strategy '{strategy}' failed: {message}")]
pub struct RecoveryError {
    pub strategy: String,
    pub message: String,
}

#[async_trait]
pub trait RecoveryStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn can_recover(&self, error: &StandardError) -> bool;

    async fn recover(&self, error: &StandardError) -> Result<RecoveryOutcome, RecoveryError>;
}

/// Waits out transient network/API trouble before control returns to the caller.
#[derive(Debug, Clone)]
pub struct TransientBackoffRecovery {
    delay: Duration,
}

impl TransientBackoffRecovery {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for TransientBackoffRecovery {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl RecoveryStrategy for TransientBackoffRecovery {
    fn name(&self) -> &str {
        "transient_backoff"
    }

    fn can_recover(&self, error: &StandardError) -> bool {
        matches!(error.category(), ErrorCategory::Network | ErrorCategory::Api)
            && error.is_recoverable()
    }

    async fn recover(&self, error: &StandardError) -> Result<RecoveryOutcome, RecoveryError> {
        debug!(
            code = error.code(),
            delay_ms = self.delay.as_millis() as u64,
            "Backing off after transient failure"
        );
        tokio::time::sleep(self.delay).await;
        Ok(RecoveryOutcome {
            strategy: self.name().to_string(),
            action: format!("waited {}ms", self.delay.as_millis()),
        })
    }
}

/// Ordered list of recovery strategies; the first one that accepts an error runs.
#[derive(Clone)]
pub struct RecoveryCoordinator {
    strategies: Vec<Arc<dyn RecoveryStrategy>>,
}

impl RecoveryCoordinator {
    pub fn new(strategies: Vec<Arc<dyn RecoveryStrategy>>) -> Self {
        Self { strategies }
    }

    /// Coordinator with no strategies; every error is left alone.
    pub fn disabled() -> Self {
        Self::new(Vec::new())
    }

    /// Default coordinator with a single [`TransientBackoffRecovery`].
    pub fn with_delay(delay: Duration) -> Self {
        Self::new(vec![Arc::new(TransientBackoffRecovery::new(delay))])
    }

    /// Run the first matching strategy. `None` when no strategy accepts the error.
    pub async fn attempt(
        &self,
        error: &StandardError,
    ) -> Option<Result<RecoveryOutcome, RecoveryError>> {
        let strategy = self.strategies.iter().find(|s| s.can_recover(error))?;
        Some(strategy.recover(error).await)
    }
}

impl Default for RecoveryCoordinator {
    fn default() -> Self {
        Self::with_delay(Duration::from_secs(1))
    }
}

impl std::fmt::Debug for RecoveryCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("RecoveryCoordinator")
            .field("strategies", &names)
            .finish()
    }
}
