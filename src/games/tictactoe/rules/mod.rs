//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`] of any side length. The engine calls
//! [`evaluate`] on the post-move board to decide the new match status.

mod draw;
mod win;

pub use draw::is_full;
pub use win::{has_winning_line, winning_mark};

use super::{Board, MatchStatus};
use tracing::instrument;

/// Computes the status implied by a board.
///
/// Any complete line (row, column, main diagonal, anti-diagonal) wins;
/// otherwise a full board is a draw; otherwise play continues.
#[instrument(skip(board), fields(size = board.size(), occupied = board.occupied()))]
pub fn evaluate(board: &Board) -> MatchStatus {
    if has_winning_line(board) {
        MatchStatus::Winner
    } else if is_full(board) {
        MatchStatus::Draw
    } else {
        MatchStatus::Playing
    }
}
