// ABOUTME: Liveness endpoint with a database round-trip check
// ABOUTME: Reports 200 when healthy and 503 when the database is unreachable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::resources::ServerResources;

/// Overall or per-component status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Operating normally
    Healthy,
    /// Not able to serve requests
    Unhealthy,
}

/// One checked dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Status description
    pub message: String,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    /// Crate version
    pub version: String,
    /// Individual component checks
    pub checks: Vec<ComponentHealth>,
    /// RFC 3339 response time
    pub timestamp: String,
}

/// Health routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle GET /health
    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let started = Instant::now();
        let database = match resources.database.ping().await {
            Ok(()) => ComponentHealth {
                name: "database".to_owned(),
                status: HealthStatus::Healthy,
                message: "reachable".to_owned(),
                duration_ms: elapsed_ms(started),
            },
            Err(e) => {
                error!(error = %e, "health check database ping failed");
                ComponentHealth {
                    name: "database".to_owned(),
                    status: HealthStatus::Unhealthy,
                    message: e.to_string(),
                    duration_ms: elapsed_ms(started),
                }
            }
        };

        let status = database.status;
        let body = HealthResponse {
            status,
            service: env!("CARGO_PKG_NAME").to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            checks: vec![database],
            timestamp: Utc::now().to_rfc3339(),
        };
        let code = match status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        };
        (code, Json(body)).into_response()
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
