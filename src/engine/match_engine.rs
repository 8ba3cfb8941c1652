//! Match state machine and move validation.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::db::{MatchStore, StoreError, StoreErrorKind};
use crate::engine::{MatchError, MatchLogger, TracingLogger};
use crate::games::tictactoe::{Mark, Match, MatchId, MatchStatus, Movement, rules};

/// Every match opens with X to move.
pub const FIRST_TURN: Mark = Mark::X;

/// A move that passed every precondition, resolved to board indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ValidatedMove {
    mark: Mark,
    row: usize,
    col: usize,
}

/// Runs match operations against an injected store.
///
/// The engine keeps no state of its own: each call loads the match, validates
/// and applies the request in memory, and persists the result with a single
/// store call. Clones share the same store and logger.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    store: Arc<dyn MatchStore>,
    logger: Arc<dyn MatchLogger>,
}

impl MatchEngine {
    /// Creates an engine over `store`, reporting through `logger`.
    #[instrument(skip(store, logger))]
    pub fn new(store: Arc<dyn MatchStore>, logger: Arc<dyn MatchLogger>) -> Self {
        debug!(?store, "Creating match engine");
        Self { store, logger }
    }

    /// Creates an engine that reports through `tracing`.
    pub fn with_tracing(store: Arc<dyn MatchStore>) -> Self {
        Self::new(store, Arc::new(TracingLogger))
    }

    /// Starts a new match with an empty board and persists it.
    ///
    /// # Errors
    ///
    /// Returns a store-kind [`MatchError`] if the match cannot be saved.
    #[instrument(skip(self))]
    pub fn create(&self) -> Result<Match, MatchError> {
        let fresh = Match::start(FIRST_TURN);
        let id = *fresh.id();

        let created = self
            .store
            .create(fresh)
            .map_err(|e| self.store_failure("create", &id, e))?;

        self.logger.info(&format!("Match created: {}", created.id()));
        Ok(created)
    }

    /// Applies a movement and returns a message describing the outcome.
    ///
    /// Preconditions are checked in order and the first failure is returned:
    /// match exists, mark is valid, coordinates are present, match is still
    /// playing, it is the mark's turn, coordinates are on the board, the cell
    /// is empty. Nothing is persisted unless all of them hold.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] naming the first violated precondition, or a
    /// store-kind error if loading or saving fails.
    #[instrument(skip(self, movement), fields(match_id = %movement.match_id, player = %movement.player))]
    pub fn make_move(&self, movement: &Movement) -> Result<String, MatchError> {
        self.logger
            .info(&format!("New movement request received: {}", movement));

        let mut record = self.load(&movement.match_id, "make_move")?;

        let action = Self::validate(movement, &record).inspect_err(|e| {
            self.logger.info(&format!("Movement rejected: {}", e));
        })?;
        self.logger.debug(&format!(
            "Movement validated: {} at [{}, {}] with board {} occupied",
            action.mark,
            action.row,
            action.col,
            record.board().occupied()
        ));

        record.place(action.row, action.col, action.mark)?;
        let status = rules::evaluate(record.board());
        record.set_status(status);

        let message = match status {
            MatchStatus::Winner => format!("Player '{}' Wins!!!!", action.mark),
            MatchStatus::Draw => "Draw!!!".to_string(),
            MatchStatus::Playing => format!("Movement performed. Next turn: {}", record.turn()),
        };

        let stored = self
            .store
            .update(record)
            .map_err(|e| self.store_failure("make_move", &movement.match_id, e))?;

        self.logger.info(&format!(
            "Movement performed in match {}: {} at [{}, {}], status {}",
            stored.id(),
            action.mark,
            action.row,
            action.col,
            stored.status()
        ));
        Ok(message)
    }

    /// Returns the status of a match.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] of kind `MatchNotFound` for an unknown id.
    #[instrument(skip(self), fields(match_id = %id))]
    pub fn status(&self, id: &MatchId) -> Result<MatchStatus, MatchError> {
        let record = self.load(id, "status")?;
        Ok(*record.status())
    }

    /// Returns the full match record.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] of kind `MatchNotFound` for an unknown id.
    #[instrument(skip(self), fields(match_id = %id))]
    pub fn get(&self, id: &MatchId) -> Result<Match, MatchError> {
        self.load(id, "get")
    }

    fn load(&self, id: &MatchId, operation: &str) -> Result<Match, MatchError> {
        match self.store.get(id) {
            Ok(Some(record)) => Ok(record),
            Ok(None) => {
                self.logger.info(&format!("Match not found: {}", id));
                Err(MatchError::match_not_found(id))
            }
            Err(e) => Err(self.store_failure(operation, id, e)),
        }
    }

    fn validate(movement: &Movement, record: &Match) -> Result<ValidatedMove, MatchError> {
        let mark = movement
            .player
            .parse::<Mark>()
            .map_err(|_| MatchError::invalid_player())?;

        let position = movement.position.ok_or_else(MatchError::invalid_position)?;

        if record.status().is_terminal() {
            return Err(MatchError::already_ended(record.id()));
        }

        if *record.turn() != mark {
            return Err(MatchError::not_your_turn(mark));
        }

        let size = record.board().size();
        let on_board = |index: i64| usize::try_from(index).ok().filter(|i| *i < size);
        let (Some(row), Some(col)) = (on_board(position.row), on_board(position.col)) else {
            return Err(MatchError::out_of_bounds(position));
        };

        if !record.board().is_empty(row, col) {
            return Err(MatchError::not_available(position));
        }

        Ok(ValidatedMove { mark, row, col })
    }

    fn store_failure(&self, operation: &str, id: &MatchId, err: StoreError) -> MatchError {
        let line = format!("{} failed for match {}: {}", operation, id, err);
        match err.kind {
            StoreErrorKind::MatchNotFound | StoreErrorKind::Conflict => self.logger.warning(&line),
            _ => self.logger.error(&line),
        }
        err.into()
    }
}

/// Runs a blocking engine call on the blocking thread pool.
///
/// # Errors
///
/// Returns the call's own error, or an `Internal` [`MatchError`] if the task
/// panicked or was cancelled.
pub async fn run_blocking<T, F>(task: F) -> Result<T, MatchError>
where
    F: FnOnce() -> Result<T, MatchError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| MatchError::internal(format!("Engine task failed: {}", e)))?
}
