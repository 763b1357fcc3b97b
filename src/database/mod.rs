// ABOUTME: SQLite connection pool, embedded migrations and per-table managers
// ABOUTME: Handles schema setup for coaches, coaching requests and weekly aggregates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

/// Coach profile storage
pub mod coaches;
/// Coaching request primary records
pub mod coaching_requests;
/// Database error types
pub mod errors;
/// Repository traits and implementations
pub mod repositories;
/// Weekly coaching-request aggregate storage
pub mod weekly_requests;

pub use coaches::{CoachSort, CoachesManager, ListCoachesFilter};
pub use coaching_requests::{CoachingRequestsManager, ListCoachingRequestsFilter};
pub use errors::{DatabaseError, DatabaseResult};
pub use weekly_requests::WeeklyRequestsManager;

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use coachhub_core::errors::{AppError, AppResult};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::{debug, info};

/// Pool size for file-backed databases
const MAX_FILE_CONNECTIONS: u32 = 8;

/// Shared handle to the SQLite database
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database at `database_url` and run migrations
    ///
    /// In-memory URLs get a single long-lived connection so every query sees the
    /// same database.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL cannot be parsed
    /// - The parent directory of the database file cannot be created
    /// - The connection or any migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let in_memory = is_in_memory(database_url);

        if let Some(parent) = database_file(database_url).and_then(|p| p.parent().map(PathBuf::from)) {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(&parent).await.map_err(|e| {
                    AppError::config(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let mut options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid DATABASE_URL '{database_url}': {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_FILE_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {database_url}: {e}")))?;

        debug!(in_memory, "SQLite pool opened");
        let database = Self { pool };
        database.migrate().await?;
        Ok(database)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run all embedded migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails
    pub async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Round-trip a trivial query
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Manager for the coaches table
    #[must_use]
    pub fn coaches(&self) -> CoachesManager {
        CoachesManager::new(self.pool.clone())
    }

    /// Manager for the coaching requests table
    #[must_use]
    pub fn coaching_requests(&self) -> CoachingRequestsManager {
        CoachingRequestsManager::new(self.pool.clone())
    }

    /// Manager for the weekly aggregate table
    #[must_use]
    pub fn weekly_requests(&self) -> WeeklyRequestsManager {
        WeeklyRequestsManager::new(self.pool.clone())
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn database_file(database_url: &str) -> Option<PathBuf> {
    if is_in_memory(database_url) {
        return None;
    }
    let rest = database_url.strip_prefix("sqlite:")?.trim_start_matches("//");
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Current time truncated to the precision stored in the database
#[must_use]
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 text; sorts lexically in time order
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp column
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339
pub fn parse_timestamp(value: &str, column: &str) -> DatabaseResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::QueryError {
            context: format!("Invalid datetime in {column}: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_file_from_url() {
        assert_eq!(
            database_file("sqlite:./data/coachhub.db"),
            Some(PathBuf::from("./data/coachhub.db"))
        );
        assert_eq!(
            database_file("sqlite:///tmp/x.db?mode=rwc"),
            Some(PathBuf::from("/tmp/x.db"))
        );
        assert_eq!(database_file("sqlite::memory:"), None);
        assert_eq!(database_file("postgres://localhost/db"), None);
    }
}
