//! Match records.

use super::{Board, BoardError, Cell, Mark, MatchStatus};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;
use uuid::Uuid;

/// Opaque match identifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct MatchId(Uuid);

impl MatchId {
    /// Generates a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for MatchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A tic-tac-toe match as stored.
///
/// `version` counts stored updates and is used by stores to reject writes
/// based on a stale read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    id: MatchId,
    board: Board,
    turn: Mark,
    status: MatchStatus,
    version: i32,
}

impl Match {
    /// Starts a match on an empty standard board.
    #[instrument]
    pub fn start(first_turn: Mark) -> Self {
        Self::new(
            MatchId::random(),
            Board::standard(),
            first_turn,
            MatchStatus::Playing,
            0,
        )
    }

    /// Places `mark` and hands the turn to the opponent.
    pub(crate) fn place(&mut self, row: usize, col: usize, mark: Mark) -> Result<(), BoardError> {
        self.board.set(row, col, Cell::Occupied(mark))?;
        self.turn = mark.opponent();
        Ok(())
    }

    pub(crate) fn set_status(&mut self, status: MatchStatus) {
        self.status = status;
    }

    /// Same record with the version advanced after a stored update.
    pub(crate) fn bumped(mut self) -> Self {
        self.version += 1;
        self
    }
}
