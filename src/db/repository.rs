//! SQLite match repository.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, error, info, instrument, warn};

use crate::db::{MatchRow, MatchStore, NewMatchRow, StoreError, StoreErrorKind, schema};
use crate::games::tictactoe::{Match, MatchId};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Match store persisted in a SQLite database.
///
/// A connection is opened per call, so `":memory:"` would give every call a
/// fresh empty database. Use a file path.
#[derive(Debug, Clone)]
pub struct SqliteMatchRepository {
    db_path: String,
}

impl SqliteMatchRepository {
    /// Creates a repository for the database at the given path without
    /// touching the schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, StoreError> {
        if db_path.trim().is_empty() {
            return Err(StoreError::new(
                StoreErrorKind::Config,
                "Database path is not set",
            ));
        }
        info!(path = %db_path, "Creating SqliteMatchRepository");
        Ok(Self { db_path })
    }

    /// Creates a repository and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, StoreError> {
        let repository = Self::new(db_path)?;
        repository.run_migrations()?;
        Ok(repository)
    }

    /// Applies any migrations not yet recorded in the database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] of kind [`StoreErrorKind::Config`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            error!(error = %e, "Migrations failed");
            StoreError::new(StoreErrorKind::Config, format!("Migrations failed: {}", e))
        })?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::new(
                StoreErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })
    }
}

impl MatchStore for SqliteMatchRepository {
    #[instrument(skip(self), fields(match_id = %id))]
    fn get(&self, id: &MatchId) -> Result<Option<Match>, StoreError> {
        debug!("Loading match");
        let mut conn = self.connection()?;

        let row = schema::matches::table
            .find(id.to_string())
            .select(MatchRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| {
                StoreError::new(StoreErrorKind::Get, format!("Error getting match: {}", e))
            })?;

        match row {
            Some(row) => {
                debug!(version = row.version(), "Match found");
                row.into_match().map(Some)
            }
            None => {
                debug!("Match not found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, record), fields(match_id = %record.id()))]
    fn create(&self, record: Match) -> Result<Match, StoreError> {
        debug!("Saving match");
        let mut conn = self.connection()?;

        let row = diesel::insert_into(schema::matches::table)
            .values(&NewMatchRow::from_match(&record)?)
            .returning(MatchRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| {
                StoreError::new(StoreErrorKind::Save, format!("Error saving match: {}", e))
            })?;

        info!(match_id = %row.id(), "Match saved");
        row.into_match()
    }

    #[instrument(skip(self, record), fields(match_id = %record.id(), version = record.version()))]
    fn update(&self, record: Match) -> Result<Match, StoreError> {
        debug!("Updating match");
        let mut conn = self.connection()?;
        let encoded = NewMatchRow::from_match(&record)?;
        let update_error = |e: diesel::result::Error| {
            StoreError::new(StoreErrorKind::Update, format!("Error updating match: {}", e))
        };

        let affected = diesel::update(
            schema::matches::table
                .filter(schema::matches::id.eq(encoded.id().as_str()))
                .filter(schema::matches::version.eq(*encoded.version())),
        )
        .set((
            schema::matches::status.eq(encoded.status().as_str()),
            schema::matches::turn.eq(encoded.turn().as_str()),
            schema::matches::board.eq(encoded.board().as_str()),
            schema::matches::version.eq(encoded.version() + 1),
            schema::matches::updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(&mut conn)
        .map_err(update_error)?;

        if affected == 0 {
            let exists = schema::matches::table
                .find(encoded.id().as_str())
                .select(schema::matches::id)
                .first::<String>(&mut conn)
                .optional()
                .map_err(update_error)?
                .is_some();

            return Err(if exists {
                warn!("Stale match update rejected");
                StoreError::new(
                    StoreErrorKind::Conflict,
                    format!(
                        "Match {} was modified concurrently, reload and retry",
                        record.id()
                    ),
                )
            } else {
                warn!("Update for unknown match");
                StoreError::new(
                    StoreErrorKind::MatchNotFound,
                    format!("Match {} not found", record.id()),
                )
            });
        }

        let updated = record.bumped();
        info!(version = updated.version(), "Match updated");
        Ok(updated)
    }
}
