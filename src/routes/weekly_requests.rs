// ABOUTME: Route handlers for weekly coaching-request aggregates
// ABOUTME: Per-coach week lookup with snapshot pagination, and lookup by aggregate id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

//! Weekly requests routes
//!
//! `GET /weeklyRequests/coaches/:coach_id` returns the coach's bucket for the
//! week given by `year_week` (or `year` plus `week`), defaulting to the current
//! week. `limit` and `page` slice the bucket's snapshot list. A coach with no
//! requests that week gets 204.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use coachhub_core::errors::{AppError, AppResult};
use coachhub_core::models::{CoachingRequestSnapshot, WeeklyCoachingRequest};
use coachhub_core::week::WeekKey;
use serde::{Deserialize, Serialize};

use super::resolve_page;
use crate::resources::ServerResources;
use crate::services::WeeklyRequestsFilter;

/// Query parameters for a coach's weekly requests
#[derive(Debug, Default, Deserialize)]
pub struct WeeklyRequestsQuery {
    /// `"<year>-<week>"`
    pub year_week: Option<String>,
    /// Year, used together with `week`
    pub year: Option<i32>,
    /// Week number, used together with `year`
    pub week: Option<u32>,
    /// Snapshots per page
    pub limit: Option<u32>,
    /// 1-based page number
    pub page: Option<u32>,
}

impl WeeklyRequestsQuery {
    fn week_key(&self) -> AppResult<Option<WeekKey>> {
        if let Some(raw) = &self.year_week {
            return raw
                .parse::<WeekKey>()
                .map(Some)
                .map_err(|e| AppError::invalid_input(e.to_string()));
        }
        match (self.year, self.week) {
            (Some(year), Some(week)) => WeekKey::new(year, week)
                .map(Some)
                .map_err(|e| AppError::invalid_input(e.to_string())),
            (None, None) => Ok(None),
            _ => Err(AppError::invalid_input(
                "year and week must be given together",
            )),
        }
    }
}

/// Weekly aggregate as returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct WeeklyRequestsResponse {
    /// Aggregate identifier
    pub id: String,
    /// Coach owning the bucket
    pub coach_id: String,
    /// Bucket key
    pub year_week: String,
    /// Snapshots on this page
    pub requests: Vec<CoachingRequestSnapshot>,
    /// When the bucket was created
    pub created_at: DateTime<Utc>,
    /// Last write to the bucket
    pub updated_at: DateTime<Utc>,
}

impl From<WeeklyCoachingRequest> for WeeklyRequestsResponse {
    fn from(aggregate: WeeklyCoachingRequest) -> Self {
        Self {
            id: aggregate.id,
            coach_id: aggregate.coach_id,
            year_week: aggregate.year_week,
            requests: aggregate.requests,
            created_at: aggregate.created_at,
            updated_at: aggregate.updated_at,
        }
    }
}

/// Weekly requests routes
pub struct WeeklyRequestsRoutes;

impl WeeklyRequestsRoutes {
    /// Create all weekly requests routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/weeklyRequests/coaches/:coach_id",
                get(Self::handle_get_for_coach),
            )
            .route("/weeklyRequests/:id", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle GET /weeklyRequests/coaches/:coach_id
    async fn handle_get_for_coach(
        State(resources): State<Arc<ServerResources>>,
        Path(coach_id): Path<String>,
        Query(query): Query<WeeklyRequestsQuery>,
    ) -> Result<Response, AppError> {
        let (page, limit) = resolve_page(query.page, query.limit)?;
        let filter = WeeklyRequestsFilter {
            year_week: query.week_key()?,
            limit,
            skip: (page - 1).saturating_mul(limit),
        };

        let found = resources
            .weekly_requests
            .get_weekly_requests_for_coach(&coach_id, filter)
            .await?;

        Ok(match found {
            Some(aggregate) => (
                StatusCode::OK,
                Json(WeeklyRequestsResponse::from(aggregate)),
            )
                .into_response(),
            None => StatusCode::NO_CONTENT.into_response(),
        })
    }

    /// Handle GET /weeklyRequests/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let aggregate = resources.weekly_requests.get_by_id(&id).await?;
        Ok((StatusCode::OK, Json(WeeklyRequestsResponse::from(aggregate))).into_response())
    }
}
