// ABOUTME: Dependency container shared by every route handler
// ABOUTME: Wires the database, aggregation engine and services together once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use std::sync::Arc;

use crate::aggregation::{AggregationConfig, AggregationEngine};
use crate::config::ServerConfig;
use crate::database::repositories::{WeeklyRequestRepository, WeeklyRequestRepositoryImpl};
use crate::database::Database;
use crate::services::{CoachesService, CoachingRequestsService, WeeklyRequestsService};

/// Everything a request handler needs
#[derive(Clone)]
pub struct ServerResources {
    /// Database handle, used directly for health checks
    pub database: Database,
    /// Coach registry
    pub coaches: CoachesService,
    /// Coaching request lifecycle
    pub coaching_requests: CoachingRequestsService,
    /// Weekly aggregate queries
    pub weekly_requests: WeeklyRequestsService,
    /// Allowed CORS origins; empty means any
    pub cors_allowed_origins: Vec<String>,
}

impl ServerResources {
    /// Build the service graph from configuration
    #[must_use]
    pub fn new(database: Database, config: &ServerConfig) -> Self {
        let mut resources = Self::with_aggregation(database, config.aggregation_config());
        resources
            .cors_allowed_origins
            .clone_from(&config.cors_allowed_origins);
        resources
    }

    /// Build the service graph with explicit aggregation settings
    #[must_use]
    pub fn with_aggregation(database: Database, aggregation: AggregationConfig) -> Self {
        let store: Arc<dyn WeeklyRequestRepository> =
            Arc::new(WeeklyRequestRepositoryImpl::new(database.clone()));
        let engine = AggregationEngine::new(Arc::clone(&store), aggregation);

        let coaches = CoachesService::new(database.coaches());
        let coaching_requests =
            CoachingRequestsService::new(database.coaching_requests(), coaches.clone(), engine);
        let weekly_requests =
            WeeklyRequestsService::new(store, coaches.clone(), aggregation.week_start);

        Self {
            database,
            coaches,
            coaching_requests,
            weekly_requests,
            cors_allowed_origins: Vec::new(),
        }
    }
}
