//! Tic-tac-toe board, match records and rules.

mod action;
mod matches;
pub mod rules;
mod types;

pub use action::{Coordinates, Movement};
pub use matches::{Match, MatchId};
pub use types::{BOARD_SIZE, Board, BoardError, Cell, Mark, MatchStatus};
