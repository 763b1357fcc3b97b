// ABOUTME: Route handlers for the coach registry REST API
// ABOUTME: Register, list, fetch, update and delete coaches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use coachhub_core::errors::AppError;
use coachhub_core::models::{CreateCoachRequest, PatchCoachRequest};
use serde::Deserialize;

use super::resolve_page;
use crate::database::{CoachSort, ListCoachesFilter};
use crate::resources::ServerResources;

/// Query parameters for GET /coaches
#[derive(Debug, Deserialize)]
pub struct ListCoachesQuery {
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
    /// `field` or `-field`
    pub sort: Option<String>,
    /// Page size
    pub limit: Option<u32>,
    /// 1-based page number
    pub page: Option<u32>,
}

impl ListCoachesQuery {
    fn into_filter(self) -> Result<ListCoachesFilter, AppError> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Ok(ListCoachesFilter {
            email: non_blank(self.email),
            first_name: non_blank(self.first_name),
            last_name: non_blank(self.last_name),
            expertise: non_blank(self.expertise),
            min_hourly_rate: self.min_hourly_rate,
            max_hourly_rate: self.max_hourly_rate,
            sort: non_blank(self.sort)
                .map(|s| s.parse::<CoachSort>())
                .transpose()?
                .unwrap_or_default(),
            ..ListCoachesFilter::default()
        })
    }
}

/// Coach routes
pub struct CoachesRoutes;

impl CoachesRoutes {
    /// Create all coach routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/coaches", get(Self::handle_list).post(Self::handle_create))
            .route(
                "/coaches/:id",
                get(Self::handle_get)
                    .put(Self::handle_put)
                    .patch(Self::handle_patch)
                    .delete(Self::handle_delete),
            )
            .route("/coaches/email/:email", get(Self::handle_email_exists))
            .with_state(resources)
    }

    /// Handle POST /coaches
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateCoachRequest>,
    ) -> Result<Response, AppError> {
        let coach = resources.coaches.register(body).await?;
        Ok((StatusCode::CREATED, Json(coach)).into_response())
    }

    /// Handle GET /coaches
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListCoachesQuery>,
    ) -> Result<Response, AppError> {
        let (page, limit) = resolve_page(query.page, query.limit)?;
        let filter = query.into_filter()?;
        let coaches = resources.coaches.list(filter, page, limit).await?;
        Ok((StatusCode::OK, Json(coaches)).into_response())
    }

    /// Handle GET /coaches/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let coach = resources.coaches.get(&id).await?;
        Ok((StatusCode::OK, Json(coach)).into_response())
    }

    /// Handle PUT /coaches/:id
    async fn handle_put(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(body): Json<CreateCoachRequest>,
    ) -> Result<Response, AppError> {
        let coach = resources.coaches.replace(&id, body).await?;
        Ok((StatusCode::OK, Json(coach)).into_response())
    }

    /// Handle PATCH /coaches/:id
    async fn handle_patch(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(body): Json<PatchCoachRequest>,
    ) -> Result<Response, AppError> {
        let coach = resources.coaches.patch(&id, body).await?;
        Ok((StatusCode::OK, Json(coach)).into_response())
    }

    /// Handle DELETE /coaches/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let coach = resources.coaches.delete(&id).await?;
        Ok((StatusCode::OK, Json(coach)).into_response())
    }

    /// Handle GET /coaches/email/:email
    async fn handle_email_exists(
        State(resources): State<Arc<ServerResources>>,
        Path(email): Path<String>,
    ) -> Result<Response, AppError> {
        let exists = resources.coaches.email_exists(&email).await?;
        Ok((StatusCode::OK, Json(exists)).into_response())
    }
}
