//! Store error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Category of a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StoreErrorKind {
    /// Store is misconfigured (bad path, migrations failed).
    Config,
    /// Could not reach the backing database.
    Connection,
    /// Creating a match failed.
    Save,
    /// Reading a match failed or the stored data is corrupt.
    Get,
    /// Writing an updated match failed.
    Update,
    /// Update targeted an id the store does not know.
    MatchNotFound,
    /// Update was based on a stale version of the match.
    Conflict,
}

/// Store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error ({}): {} at {}:{}", kind, message, file, line)]
pub struct StoreError {
    /// Failure category.
    pub kind: StoreErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(StoreErrorKind::Connection, format!("Connection error: {}", err))
    }
}

impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(StoreErrorKind::Get, format!("Stored board is not valid: {}", err))
    }
}
