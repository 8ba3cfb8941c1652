//! Strictly Matches library - tic-tac-toe match service
//!
//! Matches are created, played and queried through a [`MatchEngine`] that
//! enforces the rules over a pluggable [`MatchStore`].
//!
//! # Architecture
//!
//! - **Games**: board, marks and win/draw rules
//! - **Engine**: move validation, status evaluation and logging
//! - **Store**: in-memory or SQLite (Diesel) persistence
//! - **Transports**: HTTP (axum) and MCP stdio (rmcp)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use strictly_matches::{Coordinates, InMemoryMatchStore, MatchEngine, Movement};
//!
//! # fn example() -> Result<(), strictly_matches::MatchError> {
//! let engine = MatchEngine::with_tracing(Arc::new(InMemoryMatchStore::new()));
//! let created = engine.create()?;
//!
//! let movement = Movement::new(*created.id(), "X".to_string(), Some(Coordinates::new(1, 1)));
//! let message = engine.make_move(&movement)?;
//! assert_eq!(message, "Movement performed. Next turn: O");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod dto;
mod engine;
mod games;

// Public transports
pub mod http;
pub mod mcp;

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    BOARD_SIZE, Board, BoardError, Cell, Coordinates, Mark, Match, MatchId, MatchStatus, Movement,
    rules,
};

// Crate-level exports - Engine
pub use engine::{
    ErrorClass, FIRST_TURN, MatchEngine, MatchError, MatchErrorKind, MatchLogger, TracingLogger,
    run_blocking,
};

// Crate-level exports - Persistence
pub use db::{
    InMemoryMatchStore, MIGRATIONS, MatchRow, MatchStore, NewMatchRow, SqliteMatchRepository,
    StoreError, StoreErrorKind,
};

// Crate-level exports - Transport bodies
pub use dto::{
    CreateMatchResponse, ErrorResponse, MatchView, MoveResponse, MovementRequest, SquareRequest,
    StatusRequest, StatusResponse,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - MCP server
pub use mcp::MatchServer;
