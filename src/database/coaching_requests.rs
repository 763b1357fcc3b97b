// ABOUTME: Database operations for coaching request primary records
// ABOUTME: Create, lookup, filtered listing, overwrite and delete of coaching_requests rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use chrono::{DateTime, SubsecRound, Utc};
use coachhub_core::errors::{AppError, AppResult};
use coachhub_core::models::{CoachingRequest, CreateCoachingRequest};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, timestamp_now};

/// Filter for listing coaching requests
#[derive(Debug, Clone)]
pub struct ListCoachingRequestsFilter {
    /// Only requests addressed to this coach
    pub coach_id: Option<String>,
    /// Page size
    pub limit: u32,
    /// Rows to skip
    pub offset: u32,
}

/// Coaching requests database operations
#[derive(Clone)]
pub struct CoachingRequestsManager {
    pool: SqlitePool,
}

impl CoachingRequestsManager {
    /// Create a new coaching requests manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new coaching request created now
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the coach does not exist, or a database error
    pub async fn create(&self, request: &CreateCoachingRequest) -> AppResult<CoachingRequest> {
        self.create_at(request, timestamp_now()).await
    }

    /// Persist a new coaching request with an explicit creation time
    ///
    /// Used when importing historical data; the creation time decides the
    /// weekly bucket.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the coach does not exist, or a database error
    pub async fn create_at(
        &self,
        request: &CreateCoachingRequest,
        created_at: DateTime<Utc>,
    ) -> AppResult<CoachingRequest> {
        let created_at = created_at.trunc_subsecs(6);
        let record = CoachingRequest {
            id: Uuid::new_v4().to_string(),
            coach_id: request.coach_id.clone(),
            from_email: request.from_email.clone(),
            message: request.message.clone(),
            reply: None,
            reply_at: None,
            created_at,
            updated_at: created_at,
        };

        sqlx::query(
            r"
            INSERT INTO coaching_requests (
                id, coach_id, from_email, message, reply, reply_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, NULL, NULL, $5, $5)
            ",
        )
        .bind(&record.id)
        .bind(&record.coach_id)
        .bind(&record.from_email)
        .bind(&record.message)
        .bind(format_timestamp(&created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::not_found(format!("Coach {}", record.coach_id))
            }
            other => AppError::database(format!("Failed to create coaching request: {other}")),
        })?;

        Ok(record)
    }

    /// Get a coaching request by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, request_id: &str) -> AppResult<Option<CoachingRequest>> {
        let row = sqlx::query(
            r"
            SELECT id, coach_id, from_email, message, reply, reply_at, created_at, updated_at
            FROM coaching_requests
            WHERE id = $1
            ",
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get coaching request: {e}")))?;

        row.map(|r| row_to_coaching_request(&r)).transpose()
    }

    /// List coaching requests, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, filter: &ListCoachingRequestsFilter) -> AppResult<Vec<CoachingRequest>> {
        let rows = sqlx::query(
            r"
            SELECT id, coach_id, from_email, message, reply, reply_at, created_at, updated_at
            FROM coaching_requests
            WHERE ($1 IS NULL OR coach_id = $1)
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(filter.coach_id.as_deref())
        .bind(i64::from(filter.limit))
        .bind(i64::from(filter.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list coaching requests: {e}")))?;

        rows.iter().map(row_to_coaching_request).collect()
    }

    /// Overwrite the mutable columns of an existing record
    ///
    /// `id` and `created_at` are never changed. Returns false when no row matched.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the new coach does not exist, or a database error
    pub async fn update(&self, request: &CoachingRequest) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE coaching_requests
            SET coach_id = $1, from_email = $2, message = $3, reply = $4, reply_at = $5,
                updated_at = $6
            WHERE id = $7
            ",
        )
        .bind(&request.coach_id)
        .bind(&request.from_email)
        .bind(&request.message)
        .bind(request.reply.as_deref())
        .bind(request.reply_at.as_ref().map(format_timestamp))
        .bind(format_timestamp(&request.updated_at))
        .bind(&request.id)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::not_found(format!("Coach {}", request.coach_id))
            }
            other => AppError::database(format!("Failed to update coaching request: {other}")),
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a coaching request, returning the row as it was before deletion
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, request_id: &str) -> AppResult<Option<CoachingRequest>> {
        let row = sqlx::query(
            r"
            DELETE FROM coaching_requests
            WHERE id = $1
            RETURNING id, coach_id, from_email, message, reply, reply_at, created_at, updated_at
            ",
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete coaching request: {e}")))?;

        row.map(|r| row_to_coaching_request(&r)).transpose()
    }
}

fn row_to_coaching_request(row: &SqliteRow) -> AppResult<CoachingRequest> {
    let reply_at_str: Option<String> = row.get("reply_at");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    Ok(CoachingRequest {
        id: row.get("id"),
        coach_id: row.get("coach_id"),
        from_email: row.get("from_email"),
        message: row.get("message"),
        reply: row.get("reply"),
        reply_at: reply_at_str
            .map(|s| parse_timestamp(&s, "reply_at"))
            .transpose()?,
        created_at: parse_timestamp(&created_at_str, "created_at")?,
        updated_at: parse_timestamp(&updated_at_str, "updated_at")?,
    })
}
