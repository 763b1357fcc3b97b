// ABOUTME: Storage-layer error type shared by managers and repository implementations
// ABOUTME: Converts into AppError at the service boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use coachhub_core::errors::AppError;
use thiserror::Error;

/// Errors raised by the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A query failed or returned unusable data
    #[error("Database query failed: {context}")]
    QueryError {
        /// What was being attempted
        context: String,
    },

    /// A row referenced by id does not exist
    #[error("{entity_type} not found: {entity_id}")]
    NotFound {
        /// Kind of record
        entity_type: &'static str,
        /// Identifier that was looked up
        entity_id: String,
    },

    /// A unique constraint rejected the write
    #[error("{entity_type} {context} already exists")]
    AlreadyExists {
        /// Kind of record
        entity_type: &'static str,
        /// Which key collided, e.g. `with email a@b.c`
        context: String,
    },

    /// Stored JSON could not be encoded or decoded
    #[error("Serialization failed: {context}")]
    SerializationError {
        /// What was being encoded or decoded
        context: String,
    },

    /// Could not open or migrate the database
    #[error("Database connection failed: {context}")]
    ConnectionError {
        /// Failure detail
        context: String,
    },
}

/// Result alias for storage operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

impl From<sqlx::Error> for DatabaseError {
    fn from(e: sqlx::Error) -> Self {
        Self::QueryError {
            context: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError {
            context: e.to_string(),
        }
    }
}

impl From<AppError> for DatabaseError {
    fn from(e: AppError) -> Self {
        Self::QueryError {
            context: e.to_string(),
        }
    }
}

impl From<DatabaseError> for AppError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound {
                entity_type,
                entity_id,
            } => Self::not_found(format!("{entity_type} {entity_id}")),
            DatabaseError::AlreadyExists {
                entity_type,
                context,
            } => Self::already_exists(format!("{entity_type} {context}")),
            DatabaseError::ConnectionError { .. } => Self::config(e.to_string()),
            DatabaseError::QueryError { .. } | DatabaseError::SerializationError { .. } => {
                Self::database(e.to_string())
            }
        }
    }
}
