//! In-memory match store.

use crate::db::{MatchStore, StoreError, StoreErrorKind};
use crate::games::tictactoe::{Match, MatchId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// Match store backed by a map in process memory.
///
/// Each instance has its own map. Clones share it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMatchStore {
    matches: Arc<Mutex<HashMap<MatchId, Match>>>,
}

impl InMemoryMatchStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory match store");
        Self::default()
    }

    /// Number of stored matches.
    #[instrument(skip(self))]
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock(StoreErrorKind::Get)?.len())
    }

    #[track_caller]
    fn lock(
        &self,
        kind: StoreErrorKind,
    ) -> Result<MutexGuard<'_, HashMap<MatchId, Match>>, StoreError> {
        self.matches
            .lock()
            .map_err(|e| StoreError::new(kind, format!("Match map poisoned: {}", e)))
    }
}

impl MatchStore for InMemoryMatchStore {
    #[instrument(skip(self), fields(match_id = %id))]
    fn get(&self, id: &MatchId) -> Result<Option<Match>, StoreError> {
        let found = self.lock(StoreErrorKind::Get)?.get(id).cloned();
        if found.is_none() {
            debug!("Match not found");
        }
        Ok(found)
    }

    #[instrument(skip(self, record), fields(match_id = %record.id()))]
    fn create(&self, record: Match) -> Result<Match, StoreError> {
        let mut matches = self.lock(StoreErrorKind::Save)?;
        if matches.contains_key(record.id()) {
            warn!("Match id already stored");
            return Err(StoreError::new(
                StoreErrorKind::Save,
                format!("Error saving match: {} already exists", record.id()),
            ));
        }
        matches.insert(*record.id(), record.clone());
        debug!("Match stored");
        Ok(record)
    }

    #[instrument(skip(self, record), fields(match_id = %record.id(), version = record.version()))]
    fn update(&self, record: Match) -> Result<Match, StoreError> {
        let mut matches = self.lock(StoreErrorKind::Update)?;
        let stored = matches.get(record.id()).ok_or_else(|| {
            StoreError::new(
                StoreErrorKind::MatchNotFound,
                format!("Match {} not found", record.id()),
            )
        })?;

        if stored.version() != record.version() {
            warn!(stored_version = stored.version(), "Stale match update rejected");
            return Err(StoreError::new(
                StoreErrorKind::Conflict,
                format!(
                    "Match {} was modified concurrently, reload and retry",
                    record.id()
                ),
            ));
        }

        let updated = record.bumped();
        matches.insert(*updated.id(), updated.clone());
        debug!(version = updated.version(), "Match updated");
        Ok(updated)
    }
}
