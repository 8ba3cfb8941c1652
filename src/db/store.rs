//! Storage contract consumed by the match engine.

use crate::db::StoreError;
use crate::games::tictactoe::{Match, MatchId};

/// Durable home for match records.
///
/// Implementations own their state; nothing is shared between two store
/// instances unless the caller clones a handle.
///
/// `update` must only succeed when the stored record still has the version
/// carried by `record`, and must return the record with its version bumped.
/// An unknown id fails with [`StoreErrorKind::MatchNotFound`], a stale
/// version with [`StoreErrorKind::Conflict`].
///
/// [`StoreErrorKind::MatchNotFound`]: crate::db::StoreErrorKind::MatchNotFound
/// [`StoreErrorKind::Conflict`]: crate::db::StoreErrorKind::Conflict
pub trait MatchStore: std::fmt::Debug + Send + Sync {
    /// Loads a match, `None` if the id is unknown.
    fn get(&self, id: &MatchId) -> Result<Option<Match>, StoreError>;

    /// Stores a new match and returns it as stored.
    fn create(&self, record: Match) -> Result<Match, StoreError>;

    /// Replaces an existing match and returns it as stored.
    fn update(&self, record: Match) -> Result<Match, StoreError>;
}
