//! Core domain types for tic-tac-toe.

use derive_more::{Display, Error};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Side length of every board the engine creates.
pub const BOARD_SIZE: usize = 3;

/// Player mark.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
)]
pub enum Mark {
    /// Player X (goes first).
    X,
    /// Player O.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Cell holds a mark.
    Occupied(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

impl From<Option<Mark>> for Cell {
    fn from(mark: Option<Mark>) -> Self {
        mark.map_or(Cell::Empty, Cell::Occupied)
    }
}

/// Error raised when building or writing to a board.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Board error: {}", message)]
pub struct BoardError {
    /// What went wrong.
    pub message: String,
}

impl BoardError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Square tic-tac-toe board of side `size`.
///
/// Cells are stored row-major. On the wire and in the database the board is a
/// list of rows where each cell is `null`, `"X"` or `"O"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<Option<Mark>>>", try_from = "Vec<Vec<Option<Mark>>>")]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board with the given side length.
    #[instrument]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Creates an empty board of the standard size.
    pub fn standard() -> Self {
        Self::new(BOARD_SIZE)
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Gets the cell at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.size && col < self.size {
            self.cells.get(row * self.size + col).copied()
        } else {
            None
        }
    }

    /// Writes a cell.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] if `(row, col)` lies outside the board.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), BoardError> {
        if row >= self.size || col >= self.size {
            return Err(BoardError::new(format!(
                "Cell [{}, {}] is outside a {}x{} board",
                row, col, self.size, self.size
            )));
        }
        self.cells[row * self.size + col] = cell;
        Ok(())
    }

    /// Checks if the cell at `(row, col)` is on the board and empty.
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(Cell::Empty))
    }

    /// Iterates over the cells of one row.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .chunks(self.size.max(1))
            .nth(row)
            .into_iter()
            .flatten()
            .copied()
    }

    /// Iterates over the cells of one column.
    pub fn column(&self, col: usize) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size).filter_map(move |row| self.get(row, col))
    }

    /// Iterates over the main diagonal, top-left to bottom-right.
    pub fn diagonal(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size).filter_map(move |i| self.get(i, i))
    }

    /// Iterates over the anti-diagonal, top-right to bottom-left.
    pub fn anti_diagonal(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size).filter_map(move |i| self.get(i, self.size - 1 - i))
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Returns the board as a list of rows.
    pub fn rows(&self) -> Vec<Vec<Option<Mark>>> {
        (0..self.size)
            .map(|r| self.row(r).map(Cell::mark).collect())
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<Board> for Vec<Vec<Option<Mark>>> {
    fn from(board: Board) -> Self {
        board.rows()
    }
}

impl TryFrom<Vec<Vec<Option<Mark>>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<Option<Mark>>>) -> Result<Self, Self::Error> {
        let size = rows.len();
        if size == 0 {
            return Err(BoardError::new("Board must have at least one row"));
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(BoardError::new(format!(
                "Board must be square: row {} has {} cells, expected {}",
                index,
                row.len(),
                size
            )));
        }

        let cells = rows.into_iter().flatten().map(Cell::from).collect();
        Ok(Self { size, cells })
    }
}

/// Lifecycle status of a match.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// Moves are still accepted.
    Playing,
    /// The last move completed a line.
    Winner,
    /// The board filled up without a line.
    Draw,
}

impl MatchStatus {
    /// True once no further moves are accepted.
    pub fn is_terminal(self) -> bool {
        !matches!(self, MatchStatus::Playing)
    }
}
