// ABOUTME: SQLite implementation of the weekly aggregate repository
// ABOUTME: Delegates to WeeklyRequestsManager and maps failures to DatabaseError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use super::WeeklyRequestRepository;
use crate::database::{Database, DatabaseError, WeeklyRequestsManager};
use async_trait::async_trait;
use coachhub_core::models::{CoachingRequestSnapshot, WeeklyCoachingRequest};

/// SQLite implementation of `WeeklyRequestRepository`
pub struct WeeklyRequestRepositoryImpl {
    db: Database,
}

impl WeeklyRequestRepositoryImpl {
    /// Create a new `WeeklyRequestRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    fn get_manager(&self) -> WeeklyRequestsManager {
        self.db.weekly_requests()
    }
}

#[async_trait]
impl WeeklyRequestRepository for WeeklyRequestRepositoryImpl {
    async fn push_snapshot(
        &self,
        coach_id: &str,
        year_week: &str,
        snapshot: &CoachingRequestSnapshot,
    ) -> Result<(), DatabaseError> {
        self.get_manager()
            .push_snapshot(coach_id, year_week, snapshot)
            .await
            .map_err(|e| DatabaseError::QueryError {
                context: e.to_string(),
            })
    }

    async fn find_by_coach_and_year_week(
        &self,
        coach_id: &str,
        year_week: &str,
    ) -> Result<Option<WeeklyCoachingRequest>, DatabaseError> {
        self.get_manager()
            .find_by_coach_and_year_week(coach_id, year_week)
            .await
            .map_err(|e| DatabaseError::QueryError {
                context: e.to_string(),
            })
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<WeeklyCoachingRequest>, DatabaseError> {
        self.get_manager()
            .get(id)
            .await
            .map_err(|e| DatabaseError::QueryError {
                context: e.to_string(),
            })
    }

    async fn replace_requests(
        &self,
        id: &str,
        expected_version: i64,
        requests: &[CoachingRequestSnapshot],
    ) -> Result<Option<WeeklyCoachingRequest>, DatabaseError> {
        self.get_manager()
            .replace_requests(id, expected_version, requests)
            .await
            .map_err(|e| DatabaseError::QueryError {
                context: e.to_string(),
            })
    }
}
