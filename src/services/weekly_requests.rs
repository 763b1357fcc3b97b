// ABOUTME: Read side of the weekly coaching-request aggregates
// ABOUTME: Resolves the requested week and paginates the embedded snapshot list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use std::sync::Arc;

use chrono::Utc;
use coachhub_core::errors::{AppError, AppResult};
use coachhub_core::models::WeeklyCoachingRequest;
use coachhub_core::week::{WeekKey, WeekStart};

use crate::constants::defaults::DEFAULT_PAGE_LIMIT;
use crate::database::repositories::WeeklyRequestRepository;
use crate::services::CoachesService;

/// Which bucket and which slice of it to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyRequestsFilter {
    /// Week to read; the current week when absent
    pub year_week: Option<WeekKey>,
    /// Maximum snapshots returned
    pub limit: u32,
    /// Snapshots skipped from the start of the bucket
    pub skip: u32,
}

impl Default for WeeklyRequestsFilter {
    fn default() -> Self {
        Self {
            year_week: None,
            limit: DEFAULT_PAGE_LIMIT,
            skip: 0,
        }
    }
}

/// Queries over weekly aggregates
#[derive(Clone)]
pub struct WeeklyRequestsService {
    store: Arc<dyn WeeklyRequestRepository>,
    coaches: CoachesService,
    week_start: WeekStart,
}

impl WeeklyRequestsService {
    /// Create the service
    #[must_use]
    pub fn new(
        store: Arc<dyn WeeklyRequestRepository>,
        coaches: CoachesService,
        week_start: WeekStart,
    ) -> Self {
        Self {
            store,
            coaches,
            week_start,
        }
    }

    /// Key of the week containing the current instant
    #[must_use]
    pub fn current_week(&self) -> WeekKey {
        WeekKey::of(&Utc::now(), self.week_start)
    }

    /// A coach's bucket for one week, with its snapshots paginated
    ///
    /// Returns `None` when the coach received no request that week.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown coach, or a database error
    pub async fn get_weekly_requests_for_coach(
        &self,
        coach_id: &str,
        filter: WeeklyRequestsFilter,
    ) -> AppResult<Option<WeeklyCoachingRequest>> {
        self.coaches.ensure_exists(coach_id).await?;
        let year_week = filter
            .year_week
            .unwrap_or_else(|| self.current_week())
            .to_string();

        let aggregate = self
            .store
            .find_by_coach_and_year_week(coach_id, &year_week)
            .await
            .map_err(AppError::from)?;

        Ok(aggregate.map(|a| a.paginate(filter.skip as usize, filter.limit as usize)))
    }

    /// A bucket by its ID
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when no bucket has this ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<WeeklyCoachingRequest> {
        self.store
            .get_by_id(id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found(format!("Weekly coaching requests {id}")))
    }
}
