//! Reporting sink used by the match engine.

use tracing::{debug, error, info, warn};

/// Fire-and-forget log sink. Implementations must never fail or panic.
pub trait MatchLogger: std::fmt::Debug + Send + Sync {
    /// Normal operation events.
    fn info(&self, message: &str);
    /// Suspicious but handled events.
    fn warning(&self, message: &str);
    /// Failures propagated to the caller.
    fn error(&self, message: &str);
    /// Diagnostic detail.
    fn debug(&self, message: &str);
}

/// Forwards engine messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl MatchLogger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "strictly_matches::engine", "{}", message);
    }

    fn warning(&self, message: &str) {
        warn!(target: "strictly_matches::engine", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "strictly_matches::engine", "{}", message);
    }

    fn debug(&self, message: &str) {
        debug!(target: "strictly_matches::engine", "{}", message);
    }
}
