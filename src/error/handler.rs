//! Classification of raw faults into [`StandardError`] values.
//!
//! Strategies are evaluated in a fixed order and the first match wins. The
//! default order is the network-signature matcher followed by the catch-all
//! [`DefaultStrategy`].

use std::future::Future;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, error, info, warn};

use super::context::ErrorContext;
use super::recovery::RecoveryCoordinator;
use super::unified::{ErrorCategory, ErrorKind, Severity, StandardError};
use super::VisionError;

/// Maps a raw fault to a classified error.
pub trait HandlingStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn can_handle(&self, fault: &VisionError) -> bool;

    fn handle(&self, fault: VisionError, context: ErrorContext) -> StandardError;
}

fn network_signature() -> &'static Regex {
    static SIGNATURE: OnceLock<Regex> = OnceLock::new();
    SIGNATURE.get_or_init(|| {
        Regex::new(r"(?i)network|timeout|connection").expect("network signature regex is valid")
    })
}

/// Matches faults whose message or type name mentions network, timeout or connection.
///
/// Already-classified errors are left to the default strategy so they pass through intact.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetworkFaultStrategy;

impl HandlingStrategy for NetworkFaultStrategy {
    fn name(&self) -> &str {
        "network"
    }

    fn can_handle(&self, fault: &VisionError) -> bool {
        if matches!(fault, VisionError::Standard(_)) {
            return false;
        }
        let signature = network_signature();
        signature.is_match(fault.name()) || signature.is_match(&fault.to_string())
    }

    fn handle(&self, fault: VisionError, context: ErrorContext) -> StandardError {
        let code = match fault {
            VisionError::Timeout(_) => "NETWORK_TIMEOUT",
            _ => "NETWORK_ERROR",
        };
        let context = match &fault {
            VisionError::Network { url: Some(url), .. } => context.with("url", url.as_str()),
            _ => context,
        };
        StandardError::network(fault.to_string())
            .with_code(code)
            .with_context(context.with("fault", fault.name()))
            .with_cause(fault)
    }
}

/// Catch-all strategy. Always matches.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultStrategy;

impl HandlingStrategy for DefaultStrategy {
    fn name(&self) -> &str {
        "default"
    }

    fn can_handle(&self, _fault: &VisionError) -> bool {
        true
    }

    fn handle(&self, fault: VisionError, context: ErrorContext) -> StandardError {
        let context = context.with("fault", fault.name());
        let classified = match &fault {
            VisionError::Standard(existing) => return existing.clone(),
            VisionError::Validation { message, field } => {
                let context = match field {
                    Some(field) => context.with("field", field.as_str()),
                    None => context,
                };
                StandardError::validation(message.as_str()).with_context(context)
            }
            VisionError::NotFound { message, path } => {
                StandardError::not_found(message.as_str()).with_context(context.with("path", path.as_str()))
            }
            VisionError::Network { message, url } => {
                let context = match url {
                    Some(url) => context.with("url", url.as_str()),
                    None => context,
                };
                StandardError::network(message.as_str()).with_context(context)
            }
            VisionError::Timeout(_) => StandardError::network(fault.to_string())
                .with_code("NETWORK_TIMEOUT")
                .with_context(context),
            VisionError::Api { status, body, .. } => {
                let kind = match status {
                    401 => ErrorKind::Authentication,
                    403 => ErrorKind::Authorization,
                    _ => ErrorKind::Api,
                };
                let context = context.with("status", *status);
                let context = match body {
                    Some(body) => context.with("body", body.as_str()),
                    None => context,
                };
                StandardError::new(kind, fault.to_string()).with_context(context)
            }
            VisionError::Http(err) if err.is_connect() || err.is_timeout() => {
                StandardError::network(fault.to_string()).with_context(context)
            }
            VisionError::Http(_) | VisionError::Serialization(_) => {
                StandardError::api(fault.to_string()).with_context(context)
            }
            VisionError::Io(_) | VisionError::Other(_) => {
                StandardError::unknown(fault.to_string()).with_context(context)
            }
        };
        classified.with_cause(fault)
    }
}

/// Classifies faults, logs them by severity and runs recovery.
#[derive(Clone)]
pub struct ErrorHandler {
    strategies: Vec<Arc<dyn HandlingStrategy>>,
    recovery: RecoveryCoordinator,
}

impl ErrorHandler {
    /// Handler with the default strategy order.
    pub fn new(recovery: RecoveryCoordinator) -> Self {
        Self::with_strategies(
            vec![Arc::new(NetworkFaultStrategy), Arc::new(DefaultStrategy)],
            recovery,
        )
    }

    /// Handler with an explicit strategy order. The list should end with a catch-all.
    pub fn with_strategies(
        strategies: Vec<Arc<dyn HandlingStrategy>>,
        recovery: RecoveryCoordinator,
    ) -> Self {
        Self {
            strategies,
            recovery,
        }
    }

    /// Classify without logging or recovery.
    pub fn classify(&self, fault: VisionError, context: ErrorContext) -> StandardError {
        match self.strategies.iter().find(|s| s.can_handle(&fault)) {
            Some(strategy) => {
                debug!(strategy = strategy.name(), fault = fault.name(), "Classifying fault");
                strategy.handle(fault, context)
            }
            None => StandardError::new(
                ErrorKind::Unknown,
                format!("No error handler available for: {fault}"),
            )
            .with_code("NO_HANDLER")
            .with_category(ErrorCategory::System)
            .with_context(context)
            .with_cause(fault),
        }
    }

    /// Classify, log at a severity-keyed level, then run recovery.
    ///
    /// Recovery failures are logged and swallowed; the classification is always returned.
    pub async fn classify_and_handle(&self, fault: VisionError, context: ErrorContext) -> StandardError {
        let classified = self.classify(fault, context);
        log_classified(&classified);

        match self.recovery.attempt(&classified).await {
            Some(Ok(outcome)) => debug!(
                code = classified.code(),
                strategy = %outcome.strategy,
                action = %outcome.action,
                "Recovery completed"
            ),
            Some(Err(err)) => warn!(code = classified.code(), error = %err, "Recovery failed"),
            None => {}
        }

        classified
    }

    /// Await `operation`; on failure classify and handle it under `operation_name`.
    pub async fn with_error_handling<T, F>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, StandardError>
    where
        F: Future<Output = Result<T, VisionError>>,
    {
        match operation.await {
            Ok(value) => Ok(value),
            Err(fault) => Err(self
                .classify_and_handle(fault, ErrorContext::for_operation(operation_name))
                .await),
        }
    }
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new(RecoveryCoordinator::default())
    }
}

impl std::fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("ErrorHandler")
            .field("strategies", &names)
            .field("recovery", &self.recovery)
            .finish()
    }
}

fn log_classified(err: &StandardError) {
    let context = serde_json::to_string(err.context()).unwrap_or_default();
    let causes = err.cause_chain().join(" <- ");
    match err.severity() {
        Severity::Critical | Severity::High => error!(
            code = err.code(),
            kind = %err.kind(),
            category = %err.category(),
            severity = %err.severity(),
            context = %context,
            causes = %causes,
            "{}",
            err.message()
        ),
        Severity::Medium => warn!(
            code = err.code(),
            kind = %err.kind(),
            category = %err.category(),
            severity = %err.severity(),
            context = %context,
            causes = %causes,
            "{}",
            err.message()
        ),
        Severity::Low => info!(
            code = err.code(),
            kind = %err.kind(),
            category = %err.category(),
            severity = %err.severity(),
            context = %context,
            causes = %causes,
            "{}",
            err.message()
        ),
    }
}
