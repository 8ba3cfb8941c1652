//! First-class movement requests for tic-tac-toe.
//!
//! A movement carries what the caller submitted. The player mark stays raw
//! text and the coordinates may be missing: the engine decides whether the
//! request is legal, in a fixed order, so every rejection has one cause.

use super::MatchId;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// A resolved cell address. `row` and `col` may be negative or too large;
/// bounds are checked by the engine against the match's board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Coordinates {
    /// Row index, counted from the top.
    pub row: i64,
    /// Column index, counted from the left.
    pub col: i64,
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

/// A request to place a mark in a match.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Movement {
    /// Target match.
    pub match_id: MatchId,
    /// Mark submitted by the caller, not yet validated.
    pub player: String,
    /// Target cell, `None` when the caller did not supply both axes.
    pub position: Option<Coordinates>,
}

impl std::fmt::Display for Movement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(position) => write!(f, "{} -> {} in {}", self.player, position, self.match_id),
            None => write!(f, "{} -> (no square) in {}", self.player, self.match_id),
        }
    }
}
