// ABOUTME: Database operations for coach profiles
// ABOUTME: Registration with unique email enforcement, updates, removal and filtered listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use coachhub_core::errors::{AppError, AppResult};
use coachhub_core::models::{Coach, CoachRole, CreateCoachRequest, PatchCoachRequest};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, timestamp_now, DatabaseError};
use crate::constants::defaults::DEFAULT_IMAGE_URL;

const COACH_COLUMNS: &str = "id, email, first_name, last_name, description, expertise, \
     roles, hourly_rate, image_url, created_at, updated_at";

/// Sort key accepted by the coach listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoachSort {
    /// Newest registrations first
    #[default]
    Newest,
    /// Oldest registrations first
    Oldest,
    /// Cheapest first
    RateAsc,
    /// Most expensive first
    RateDesc,
    /// By given name, A to Z
    FirstName,
    /// By given name, Z to A
    FirstNameDesc,
    /// By family name, A to Z
    LastName,
    /// By family name, Z to A
    LastNameDesc,
    /// By email, A to Z
    Email,
    /// By email, Z to A
    EmailDesc,
}

impl CoachSort {
    const fn order_clause(self) -> &'static str {
        match self {
            Self::Newest => "created_at DESC, id",
            Self::Oldest => "created_at ASC, id",
            Self::RateAsc => "hourly_rate ASC, id",
            Self::RateDesc => "hourly_rate DESC, id",
            Self::FirstName => "first_name ASC, id",
            Self::FirstNameDesc => "first_name DESC, id",
            Self::LastName => "last_name ASC, id",
            Self::LastNameDesc => "last_name DESC, id",
            Self::Email => "email ASC",
            Self::EmailDesc => "email DESC",
        }
    }
}

impl FromStr for CoachSort {
    type Err = AppError;

    /// Parse `field` or `-field` (descending)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sort = match s.trim() {
            "-created_at" => Self::Newest,
            "created_at" => Self::Oldest,
            "hourly_rate" => Self::RateAsc,
            "-hourly_rate" => Self::RateDesc,
            "first_name" => Self::FirstName,
            "-first_name" => Self::FirstNameDesc,
            "last_name" => Self::LastName,
            "-last_name" => Self::LastNameDesc,
            "email" => Self::Email,
            "-email" => Self::EmailDesc,
            other => {
                return Err(AppError::invalid_input(format!(
                    "unsupported sort '{other}', expected one of created_at, hourly_rate, \
                     first_name, last_name, email with optional '-' prefix"
                )))
            }
        };
        Ok(sort)
    }
}

/// Filter for listing coaches
#[derive(Debug, Clone, Default)]
pub struct ListCoachesFilter {
    /// Exact email match
    pub email: Option<String>,
    /// Exact given name match
    pub first_name: Option<String>,
    /// Exact family name match
    pub last_name: Option<String>,
    /// Coaches listing this expertise
    pub expertise: Option<String>,
    /// Inclusive lower bound on the hourly rate
    pub min_hourly_rate: Option<u32>,
    /// Inclusive upper bound on the hourly rate
    pub max_hourly_rate: Option<u32>,
    /// Result ordering
    pub sort: CoachSort,
    /// Page size
    pub limit: u32,
    /// Rows to skip
    pub offset: u32,
}

/// Coaches database operations
#[derive(Clone)]
pub struct CoachesManager {
    pool: SqlitePool,
}

impl CoachesManager {
    /// Create a new coaches manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a coach. Input is expected to be validated already.
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the email is taken, or a database error
    pub async fn create(&self, request: &CreateCoachRequest) -> AppResult<Coach> {
        let now = timestamp_now();
        let roles = request
            .roles
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| vec![CoachRole::User]);
        let coach = Coach {
            id: Uuid::new_v4().to_string(),
            email: request.email.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            description: request.description.clone(),
            expertise: request.expertise.clone(),
            roles,
            hourly_rate: request.hourly_rate,
            image_url: request
                .image_url
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_owned()),
            created_at: now,
            updated_at: now,
        };

        let expertise_json = serde_json::to_string(&coach.expertise)?;
        let roles_json = roles_to_json(&coach.roles)?;

        sqlx::query(
            r"
            INSERT INTO coaches (
                id, email, first_name, last_name, description, expertise,
                roles, hourly_rate, image_url, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            ",
        )
        .bind(&coach.id)
        .bind(&coach.email)
        .bind(&coach.first_name)
        .bind(&coach.last_name)
        .bind(&coach.description)
        .bind(&expertise_json)
        .bind(&roles_json)
        .bind(i64::from(coach.hourly_rate))
        .bind(&coach.image_url)
        .bind(format_timestamp(&now))
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &coach.email, "create"))?;

        Ok(coach)
    }

    /// Get a coach by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, coach_id: &str) -> AppResult<Option<Coach>> {
        let query = format!("SELECT {COACH_COLUMNS} FROM coaches WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(coach_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get coach: {e}")))?;

        row.map(|r| row_to_coach(&r)).transpose()
    }

    /// Check whether a coach with this ID exists
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn exists(&self, coach_id: &str) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM coaches WHERE id = $1")
            .bind(coach_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check coach: {e}")))?;
        Ok(found.is_some())
    }

    /// Look up the coach registered under an email
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn email_exists(&self, email: &str) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT id FROM coaches WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check coach email: {e}")))
    }

    /// List coaches matching every present filter field
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, filter: &ListCoachesFilter) -> AppResult<Vec<Coach>> {
        let query = format!(
            r"
            SELECT {COACH_COLUMNS}
            FROM coaches
            WHERE ($1 IS NULL OR email = $1)
              AND ($2 IS NULL OR first_name = $2)
              AND ($3 IS NULL OR last_name = $3)
              AND ($4 IS NULL OR EXISTS (
                    SELECT 1 FROM json_each(coaches.expertise) WHERE json_each.value = $4
                  ))
              AND ($5 IS NULL OR hourly_rate >= $5)
              AND ($6 IS NULL OR hourly_rate <= $6)
            ORDER BY {}
            LIMIT $7 OFFSET $8
            ",
            filter.sort.order_clause()
        );

        let rows = sqlx::query(&query)
            .bind(filter.email.as_deref())
            .bind(filter.first_name.as_deref())
            .bind(filter.last_name.as_deref())
            .bind(filter.expertise.as_deref())
            .bind(filter.min_hourly_rate.map(i64::from))
            .bind(filter.max_hourly_rate.map(i64::from))
            .bind(i64::from(filter.limit))
            .bind(i64::from(filter.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list coaches: {e}")))?;

        rows.iter().map(row_to_coach).collect()
    }

    /// Overwrite the mutable columns of an existing coach
    ///
    /// `id` and `created_at` are never changed. Returns false when no row matched.
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the email belongs to another coach, or a database error
    pub async fn update(&self, coach: &Coach) -> AppResult<bool> {
        let expertise_json = serde_json::to_string(&coach.expertise)?;
        let roles_json = roles_to_json(&coach.roles)?;

        let result = sqlx::query(
            r"
            UPDATE coaches
            SET email = $2, first_name = $3, last_name = $4, description = $5,
                expertise = $6, roles = $7, hourly_rate = $8, image_url = $9,
                updated_at = $10
            WHERE id = $1
            ",
        )
        .bind(&coach.id)
        .bind(&coach.email)
        .bind(&coach.first_name)
        .bind(&coach.last_name)
        .bind(&coach.description)
        .bind(&expertise_json)
        .bind(&roles_json)
        .bind(i64::from(coach.hourly_rate))
        .bind(&coach.image_url)
        .bind(format_timestamp(&coach.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &coach.email, "update"))?;

        Ok(result.rows_affected() > 0)
    }

    /// Apply the present fields of a patch and return the stored coach
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the new email belongs to another coach, or a database error
    pub async fn patch(
        &self,
        coach_id: &str,
        patch: &PatchCoachRequest,
    ) -> AppResult<Option<Coach>> {
        let expertise_json = patch
            .expertise
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let query = format!(
            r"
            UPDATE coaches
            SET email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                description = COALESCE($5, description),
                expertise = COALESCE($6, expertise),
                hourly_rate = COALESCE($7, hourly_rate),
                image_url = COALESCE($8, image_url),
                updated_at = $9
            WHERE id = $1
            RETURNING {COACH_COLUMNS}
            "
        );

        let row = sqlx::query(&query)
            .bind(coach_id)
            .bind(patch.email.as_deref())
            .bind(patch.first_name.as_deref())
            .bind(patch.last_name.as_deref())
            .bind(patch.description.as_deref())
            .bind(expertise_json)
            .bind(patch.hourly_rate.map(i64::from))
            .bind(patch.image_url.as_deref())
            .bind(format_timestamp(&timestamp_now()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, patch.email.as_deref().unwrap_or_default(), "patch"))?;

        row.map(|r| row_to_coach(&r)).transpose()
    }

    /// Remove a coach together with everything addressed to them
    ///
    /// Coaching requests go through the foreign-key cascade; the weekly buckets
    /// carry no foreign key and are deleted in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, coach_id: &str) -> AppResult<Option<Coach>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let buckets = sqlx::query("DELETE FROM weekly_coaching_requests WHERE coach_id = $1")
            .bind(coach_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete weekly buckets: {e}")))?;

        let query = format!("DELETE FROM coaches WHERE id = $1 RETURNING {COACH_COLUMNS}");
        let row = sqlx::query(&query)
            .bind(coach_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete coach: {e}")))?;

        let Some(row) = row else {
            // Dropping the transaction rolls back the bucket delete
            return Ok(None);
        };
        let coach = row_to_coach(&row)?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit coach deletion: {e}")))?;

        debug!(
            coach_id = %coach.id,
            buckets_removed = buckets.rows_affected(),
            "coach deleted"
        );
        Ok(Some(coach))
    }
}

fn roles_to_json(roles: &[CoachRole]) -> AppResult<String> {
    Ok(serde_json::to_string(
        &roles.iter().map(CoachRole::as_str).collect::<Vec<_>>(),
    )?)
}

fn map_write_error(error: sqlx::Error, email: &str, action: &str) -> AppError {
    match error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::from(DatabaseError::AlreadyExists {
                entity_type: "Coach",
                context: format!("with email {email}"),
            })
        }
        other => AppError::database(format!("Failed to {action} coach: {other}")),
    }
}

fn row_to_coach(row: &SqliteRow) -> AppResult<Coach> {
    let expertise_json: String = row.get("expertise");
    let roles_json: String = row.get("roles");
    let hourly_rate: i64 = row.get("hourly_rate");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    let expertise: Vec<String> = serde_json::from_str(&expertise_json)
        .map_err(|e| AppError::internal(format!("Invalid JSON in coach expertise: {e}")))?;
    let roles: Vec<String> = serde_json::from_str(&roles_json)
        .map_err(|e| AppError::internal(format!("Invalid JSON in coach roles: {e}")))?;

    Ok(Coach {
        id: row.get("id"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        description: row.get("description"),
        expertise,
        roles: roles.iter().map(|r| CoachRole::parse(r)).collect(),
        hourly_rate: u32::try_from(hourly_rate)
            .map_err(|e| AppError::internal(format!("Invalid hourly rate: {e}")))?,
        image_url: row.get("image_url"),
        created_at: parse_timestamp(&created_at_str, "created_at")?,
        updated_at: parse_timestamp(&updated_at_str, "updated_at")?,
    })
}
