//! Engine error taxonomy.

use derive_more::{Display, Error};

use crate::db::{StoreError, StoreErrorKind};
use crate::games::tictactoe::{BoardError, Coordinates, Mark, MatchId};

/// What kind of rule or infrastructure failure rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchErrorKind {
    /// Mark outside the two-mark set.
    InvalidPlayer,
    /// Coordinates missing or malformed.
    InvalidPosition,
    /// Move submitted after the match ended.
    MatchAlreadyEnded,
    /// Mark does not match the current turn.
    NotYourTurn,
    /// Coordinates outside the board.
    PositionOutOfBounds,
    /// Target cell is occupied.
    PositionNotAvailable,
    /// Unknown match id.
    MatchNotFound,
    /// Failure raised by the match store.
    Store(StoreErrorKind),
    /// Anything else.
    Internal,
}

/// How callers should treat an error, independent of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The request was wrong and will keep failing as is.
    Client,
    /// The addressed match does not exist.
    NotFound,
    /// The match changed underneath the request.
    Conflict,
    /// The service failed.
    Server,
}

impl MatchErrorKind {
    /// Classifies this kind. Transports map classes to their own status codes.
    pub fn class(self) -> ErrorClass {
        match self {
            Self::InvalidPlayer
            | Self::InvalidPosition
            | Self::MatchAlreadyEnded
            | Self::NotYourTurn
            | Self::PositionOutOfBounds
            | Self::PositionNotAvailable
            | Self::Store(StoreErrorKind::Save)
            | Self::Store(StoreErrorKind::Get)
            | Self::Store(StoreErrorKind::Update) => ErrorClass::Client,
            Self::MatchNotFound | Self::Store(StoreErrorKind::MatchNotFound) => {
                ErrorClass::NotFound
            }
            Self::Store(StoreErrorKind::Conflict) => ErrorClass::Conflict,
            Self::Store(StoreErrorKind::Config)
            | Self::Store(StoreErrorKind::Connection)
            | Self::Internal => ErrorClass::Server,
        }
    }
}

/// Error returned by every engine operation. The message is meant to be
/// shown to the caller as is.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{}", message)]
pub struct MatchError {
    kind: MatchErrorKind,
    message: String,
}

impl MatchError {
    /// Creates an error of the given kind.
    pub fn new(kind: MatchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The error kind.
    pub fn kind(&self) -> MatchErrorKind {
        self.kind
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Shorthand for `self.kind().class()`.
    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    pub(crate) fn invalid_player() -> Self {
        let marks = [Mark::X, Mark::O].map(|m| m.to_string()).join(", ");
        Self::new(
            MatchErrorKind::InvalidPlayer,
            format!("Player is not valid, must be one of: {}", marks),
        )
    }

    pub(crate) fn invalid_position() -> Self {
        Self::new(
            MatchErrorKind::InvalidPosition,
            "Square is not valid, must provide x and y",
        )
    }

    pub(crate) fn already_ended(id: &MatchId) -> Self {
        Self::new(
            MatchErrorKind::MatchAlreadyEnded,
            format!("Match {} has already ended", id),
        )
    }

    pub(crate) fn not_your_turn(mark: Mark) -> Self {
        Self::new(
            MatchErrorKind::NotYourTurn,
            format!("Player {}, it's not your turn", mark),
        )
    }

    pub(crate) fn out_of_bounds(position: Coordinates) -> Self {
        Self::new(
            MatchErrorKind::PositionOutOfBounds,
            format!("Square {} is out of the board", position),
        )
    }

    pub(crate) fn not_available(position: Coordinates) -> Self {
        Self::new(
            MatchErrorKind::PositionNotAvailable,
            format!("Square {} is not available", position),
        )
    }

    /// Error for an unknown match id. Takes any displayable id so transports
    /// can report ids that failed to parse.
    pub fn match_not_found(id: impl std::fmt::Display) -> Self {
        Self::new(
            MatchErrorKind::MatchNotFound,
            format!("Match {} not found", id),
        )
    }

    /// Error for failures outside the match rules.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(MatchErrorKind::Internal, message)
    }
}

impl From<StoreError> for MatchError {
    fn from(err: StoreError) -> Self {
        Self::new(MatchErrorKind::Store(err.kind), err.message)
    }
}

impl From<BoardError> for MatchError {
    fn from(err: BoardError) -> Self {
        Self::internal(format!("Board rejected a validated move: {}", err.message))
    }
}
