//! Database models for stored matches.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::{StoreError, StoreErrorKind, schema};
use crate::games::tictactoe::{Board, Mark, Match, MatchId, MatchStatus};

/// Match row as stored in the `matches` table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::matches)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MatchRow {
    id: String,
    status: String,
    turn: String,
    board: String,
    version: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl MatchRow {
    /// Parses the stored columns back into a [`Match`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] of kind [`StoreErrorKind::Get`] if any column
    /// holds a value the domain types reject.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn into_match(self) -> Result<Match, StoreError> {
        let id = self.id.parse::<MatchId>().map_err(|e| {
            StoreError::new(StoreErrorKind::Get, format!("Invalid stored id '{}': {}", self.id, e))
        })?;
        let status = self.status.parse::<MatchStatus>().map_err(|_| {
            StoreError::new(StoreErrorKind::Get, format!("Invalid stored status '{}'", self.status))
        })?;
        let turn = self.turn.parse::<Mark>().map_err(|_| {
            StoreError::new(StoreErrorKind::Get, format!("Invalid stored turn '{}'", self.turn))
        })?;
        let board: Board = serde_json::from_str(&self.board)?;

        Ok(Match::new(id, board, turn, status, self.version))
    }
}

/// Insertable match row for creating new matches.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::matches)]
pub struct NewMatchRow {
    id: String,
    status: String,
    turn: String,
    board: String,
    version: i32,
}

impl NewMatchRow {
    /// Encodes a [`Match`] for insertion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the board cannot be encoded.
    #[instrument(skip(record), fields(match_id = %record.id()))]
    pub fn from_match(record: &Match) -> Result<Self, StoreError> {
        let board = serde_json::to_string(record.board()).map_err(|e| {
            StoreError::new(StoreErrorKind::Save, format!("Error encoding board: {}", e))
        })?;
        Ok(Self::new(
            record.id().to_string(),
            record.status().to_string(),
            record.turn().to_string(),
            board,
            *record.version(),
        ))
    }
}
