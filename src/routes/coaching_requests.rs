// ABOUTME: Route handlers for the coaching request REST API
// ABOUTME: Create, list, fetch, patch, overwrite and delete coaching requests
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
use coachhub_core::models::{CreateCoachingRequest, PatchCoachingRequest, PutCoachingRequest};
use serde::Deserialize;

use super::resolve_page;
use crate::resources::ServerResources;

/// Query parameters for GET /requests
#[derive(Debug, Deserialize)]
pub struct ListCoachingRequestsQuery {
    /// Only requests addressed to this coach
    pub coach_id: Option<String>,
    /// Page size
    pub limit: Option<u32>,
    /// 1-based page number
    pub page: Option<u32>,
}

/// Coaching request routes
pub struct CoachingRequestsRoutes;

impl CoachingRequestsRoutes {
    /// Create all coaching request routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/requests", get(Self::handle_list).post(Self::handle_create))
            .route(
                "/requests/:id",
                get(Self::handle_get)
                    .patch(Self::handle_patch)
                    .put(Self::handle_put)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle POST /requests
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateCoachingRequest>,
    ) -> Result<Response, AppError> {
        let created = resources.coaching_requests.create(body).await?;
        Ok((StatusCode::CREATED, Json(created)).into_response())
    }

    /// Handle GET /requests
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListCoachingRequestsQuery>,
    ) -> Result<Response, AppError> {
        let (page, limit) = resolve_page(query.page, query.limit)?;
        let coach_id = query.coach_id.filter(|c| !c.trim().is_empty());
        let requests = resources
            .coaching_requests
            .list(coach_id, page, limit)
            .await?;
        Ok((StatusCode::OK, Json(requests)).into_response())
    }

    /// Handle GET /requests/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let request = resources.coaching_requests.get(&id).await?;
        Ok((StatusCode::OK, Json(request)).into_response())
    }

    /// Handle PATCH /requests/:id
    async fn handle_patch(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(body): Json<PatchCoachingRequest>,
    ) -> Result<Response, AppError> {
        let updated = resources.coaching_requests.patch(&id, body).await?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    /// Handle PUT /requests/:id
    async fn handle_put(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(body): Json<PutCoachingRequest>,
    ) -> Result<Response, AppError> {
        let updated = resources.coaching_requests.put(&id, body).await?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    /// Handle DELETE /requests/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let deleted = resources.coaching_requests.delete(&id).await?;
        Ok((StatusCode::OK, Json(deleted)).into_response())
    }
}
