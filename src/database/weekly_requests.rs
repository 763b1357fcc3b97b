// ABOUTME: Database operations for weekly coaching-request aggregates
// ABOUTME: Atomic append-with-upsert plus version-checked replacement of the snapshot array
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use coachhub_core::errors::{AppError, AppResult};
use coachhub_core::models::{CoachingRequestSnapshot, WeeklyCoachingRequest};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, timestamp_now};

/// Weekly aggregate database operations
///
/// The `requests` column holds the snapshot array as JSON. Appends go through a
/// single upsert statement so concurrent first inserts for the same bucket
/// converge on one row. Every other change replaces the whole array and is
/// guarded by the row's `version`.
#[derive(Clone)]
pub struct WeeklyRequestsManager {
    pool: SqlitePool,
}

impl WeeklyRequestsManager {
    /// Create a new weekly aggregate manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append `snapshot` to the bucket, creating the bucket if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded or the write fails
    pub async fn push_snapshot(
        &self,
        coach_id: &str,
        year_week: &str,
        snapshot: &CoachingRequestSnapshot,
    ) -> AppResult<()> {
        let snapshot_json = serde_json::to_string(snapshot)?;
        let now = format_timestamp(&timestamp_now());

        sqlx::query(
            r"
            INSERT INTO weekly_coaching_requests (
                id, coach_id, year_week, requests, version, created_at, updated_at
            ) VALUES ($1, $2, $3, json_array(json($4)), 1, $5, $5)
            ON CONFLICT(coach_id, year_week) DO UPDATE SET
                requests = json_insert(weekly_coaching_requests.requests, '$[#]', json($4)),
                version = weekly_coaching_requests.version + 1,
                updated_at = excluded.updated_at
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(coach_id)
        .bind(year_week)
        .bind(&snapshot_json)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to append weekly request: {e}")))?;

        Ok(())
    }

    /// Get the bucket for a coach and week
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn find_by_coach_and_year_week(
        &self,
        coach_id: &str,
        year_week: &str,
    ) -> AppResult<Option<WeeklyCoachingRequest>> {
        let row = sqlx::query(
            r"
            SELECT id, coach_id, year_week, requests, version, created_at, updated_at
            FROM weekly_coaching_requests
            WHERE coach_id = $1 AND year_week = $2
            ",
        )
        .bind(coach_id)
        .bind(year_week)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get weekly requests: {e}")))?;

        row.map(|r| row_to_weekly_request(&r)).transpose()
    }

    /// Get a bucket by its own ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: &str) -> AppResult<Option<WeeklyCoachingRequest>> {
        let row = sqlx::query(
            r"
            SELECT id, coach_id, year_week, requests, version, created_at, updated_at
            FROM weekly_coaching_requests
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get weekly requests: {e}")))?;

        row.map(|r| row_to_weekly_request(&r)).transpose()
    }

    /// Replace the snapshot array if the bucket is still at `expected_version`
    ///
    /// Returns the stored bucket on success and `None` when another writer got
    /// there first (or the bucket is gone).
    ///
    /// # Errors
    ///
    /// Returns an error if the array cannot be encoded or the write fails
    pub async fn replace_requests(
        &self,
        id: &str,
        expected_version: i64,
        requests: &[CoachingRequestSnapshot],
    ) -> AppResult<Option<WeeklyCoachingRequest>> {
        let requests_json = serde_json::to_string(requests)?;

        let row = sqlx::query(
            r"
            UPDATE weekly_coaching_requests
            SET requests = $1, version = version + 1, updated_at = $2
            WHERE id = $3 AND version = $4
            RETURNING id, coach_id, year_week, requests, version, created_at, updated_at
            ",
        )
        .bind(&requests_json)
        .bind(format_timestamp(&timestamp_now()))
        .bind(id)
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to replace weekly requests: {e}")))?;

        row.map(|r| row_to_weekly_request(&r)).transpose()
    }
}

fn row_to_weekly_request(row: &SqliteRow) -> AppResult<WeeklyCoachingRequest> {
    let requests_json: String = row.get("requests");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    let requests: Vec<CoachingRequestSnapshot> = serde_json::from_str(&requests_json)
        .map_err(|e| AppError::internal(format!("Invalid JSON in weekly requests: {e}")))?;

    Ok(WeeklyCoachingRequest {
        id: row.get("id"),
        coach_id: row.get("coach_id"),
        year_week: row.get("year_week"),
        requests,
        version: row.get("version"),
        created_at: parse_timestamp(&created_at_str, "created_at")?,
        updated_at: parse_timestamp(&updated_at_str, "updated_at")?,
    })
}
