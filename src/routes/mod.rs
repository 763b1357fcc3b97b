// ABOUTME: HTTP route modules and the top-level router
// ABOUTME: Merges every route group and applies tracing, request-id and CORS layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

/// Coach registry routes
pub mod coaches;
/// Coaching request routes
pub mod coaching_requests;
/// Liveness route
pub mod health;
/// Weekly aggregate routes
pub mod weekly_requests;

pub use coaches::CoachesRoutes;
pub use coaching_requests::CoachingRequestsRoutes;
pub use health::HealthRoutes;
pub use weekly_requests::WeeklyRequestsRoutes;

use std::sync::Arc;

use axum::Router;
use coachhub_core::errors::{AppError, AppResult};
use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::constants::defaults::{DEFAULT_PAGE, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::resources::ServerResources;

/// Apply defaults and bounds to paging parameters, returning `(page, limit)`
///
/// # Errors
///
/// Returns an invalid input error if `limit` is outside 1..=1000 or `page` is 0
pub fn resolve_page(page: Option<u32>, limit: Option<u32>) -> AppResult<(u32, u32)> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(AppError::invalid_input(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}"
        )));
    }
    let page = page.unwrap_or(DEFAULT_PAGE);
    if page == 0 {
        return Err(AppError::invalid_input("page must be at least 1"));
    }
    Ok((page, limit))
}

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let cors = cors_layer(&resources.cors_allowed_origins);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(CoachesRoutes::routes(Arc::clone(&resources)))
        .merge(CoachingRequestsRoutes::routes(Arc::clone(&resources)))
        .merge(WeeklyRequestsRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| warn!(%origin, error = %e, "ignoring invalid CORS origin"))
                .ok()
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_page_defaults_and_bounds() {
        assert_eq!(resolve_page(None, None).ok(), Some((1, 100)));
        assert_eq!(resolve_page(Some(3), Some(10)).ok(), Some((3, 10)));
        assert!(resolve_page(Some(0), None).is_err());
        assert!(resolve_page(None, Some(0)).is_err());
        assert!(resolve_page(None, Some(1001)).is_err());
        assert_eq!(resolve_page(None, Some(1000)).ok(), Some((1, 1000)));
    }
}
