// ABOUTME: Repository trait definitions for database abstraction
// ABOUTME: The aggregation engine depends on these traits rather than on SQLite directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use async_trait::async_trait;
use coachhub_core::models::{CoachingRequestSnapshot, WeeklyCoachingRequest};

use crate::database::DatabaseError;

/// Weekly aggregate repository implementation
pub mod weekly_requests_repository;

pub use weekly_requests_repository::WeeklyRequestRepositoryImpl;

/// Storage operations for weekly coaching-request aggregates
#[async_trait]
pub trait WeeklyRequestRepository: Send + Sync {
    /// Append a snapshot to the `(coach_id, year_week)` bucket, creating it if absent.
    /// Must be atomic: concurrent appends to a missing bucket produce one bucket
    /// holding every snapshot.
    async fn push_snapshot(
        &self,
        coach_id: &str,
        year_week: &str,
        snapshot: &CoachingRequestSnapshot,
    ) -> Result<(), DatabaseError>;

    /// Fetch the bucket for a coach and week
    async fn find_by_coach_and_year_week(
        &self,
        coach_id: &str,
        year_week: &str,
    ) -> Result<Option<WeeklyCoachingRequest>, DatabaseError>;

    /// Fetch a bucket by its ID
    async fn get_by_id(&self, id: &str) -> Result<Option<WeeklyCoachingRequest>, DatabaseError>;

    /// Replace the snapshot array when the stored version equals `expected_version`.
    /// `Ok(None)` means the version moved on and the caller should re-read.
    async fn replace_requests(
        &self,
        id: &str,
        expected_version: i64,
        requests: &[CoachingRequestSnapshot],
    ) -> Result<Option<WeeklyCoachingRequest>, DatabaseError>;
}
