//! Persistence layer for matches.

mod error;
mod memory;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only
mod store;

pub use error::{StoreError, StoreErrorKind};
pub use memory::InMemoryMatchStore;
pub use models::{MatchRow, NewMatchRow};
pub use repository::{MIGRATIONS, SqliteMatchRepository};
pub use store::MatchStore;
