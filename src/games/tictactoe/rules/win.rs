//! Win detection logic for tic-tac-toe.

use super::super::{Board, Cell, Mark};
use tracing::instrument;

/// Returns the mark filling every cell of `line`, if there is one.
fn uniform(mut line: impl Iterator<Item = Cell>) -> Option<Mark> {
    let first = line.next()?;
    match first {
        Cell::Occupied(mark) if line.all(|cell| cell == first) => Some(mark),
        _ => None,
    }
}

/// Returns the mark owning a complete line, checking rows, then columns,
/// then the main diagonal, then the anti-diagonal.
#[instrument(skip(board), fields(size = board.size()))]
pub fn winning_mark(board: &Board) -> Option<Mark> {
    let size = board.size();
    (0..size)
        .find_map(|row| uniform(board.row(row)))
        .or_else(|| (0..size).find_map(|col| uniform(board.column(col))))
        .or_else(|| uniform(board.diagonal()))
        .or_else(|| uniform(board.anti_diagonal()))
}

/// Checks if any line is filled by a single mark.
#[instrument(skip(board))]
pub fn has_winning_line(board: &Board) -> bool {
    winning_mark(board).is_some()
}
