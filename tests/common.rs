// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, resource graph, coach and coaching request helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `coachhub`

use std::env;
use std::sync::{Arc, Once};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use coachhub::aggregation::{AggregationConfig, AggregationEngine};
use coachhub::database::repositories::{WeeklyRequestRepository, WeeklyRequestRepositoryImpl};
use coachhub::database::Database;
use coachhub::resources::ServerResources;
use coachhub_core::models::{Coach, CoachingRequest, CreateCoachRequest, CreateCoachingRequest};
use coachhub_core::week::WeekStart;
use tempfile::TempDir;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests; set `TEST_LOG=DEBUG` for more
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh migrated in-memory database
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:").await.unwrap()
}

/// Fresh migrated file database with a real connection pool, for concurrency tests.
/// Keep the `TempDir` alive for the duration of the test.
pub async fn create_file_database() -> (Database, TempDir) {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.path().join("coachhub.db").display());
    let database = Database::new(&url).await.unwrap();
    (database, dir)
}

/// Aggregation settings used by tests: Sunday weeks and a generous retry budget
pub fn test_aggregation_config() -> AggregationConfig {
    AggregationConfig {
        week_start: WeekStart::Sunday,
        timeout: Duration::from_secs(5),
        max_retries: 50,
    }
}

/// Engine over the SQLite weekly aggregate repository
pub fn create_engine(database: &Database) -> AggregationEngine {
    let store: Arc<dyn WeeklyRequestRepository> =
        Arc::new(WeeklyRequestRepositoryImpl::new(database.clone()));
    AggregationEngine::new(store, test_aggregation_config())
}

/// Full service graph over a fresh in-memory database
pub async fn create_test_resources() -> Arc<ServerResources> {
    let database = create_test_database().await;
    Arc::new(ServerResources::with_aggregation(
        database,
        test_aggregation_config(),
    ))
}

/// Valid coach registration payload
pub fn coach_registration(email: &str) -> CreateCoachRequest {
    CreateCoachRequest {
        email: email.to_owned(),
        first_name: "Serena".to_owned(),
        last_name: "Coach".to_owned(),
        description: "Tennis and conditioning".to_owned(),
        expertise: vec!["Tennis".to_owned(), "conditioning".to_owned()],
        hourly_rate: 80,
        image_url: None,
        roles: None,
    }
}

/// Register a coach through the service layer
pub async fn create_test_coach(resources: &ServerResources, email: &str) -> Coach {
    resources
        .coaches
        .register(coach_registration(email))
        .await
        .unwrap()
}

/// Valid coaching request payload
pub fn coaching_request_payload(coach_id: &str, message: &str) -> CreateCoachingRequest {
    CreateCoachingRequest {
        coach_id: coach_id.to_owned(),
        from_email: "student@example.com".to_owned(),
        message: message.to_owned(),
    }
}

/// UTC timestamp at the top of an hour
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

/// Coaching request record built in memory, for exercising the engine directly
pub fn coaching_request(coach_id: &str, created_at: DateTime<Utc>) -> CoachingRequest {
    let id = Uuid::new_v4().to_string();
    CoachingRequest {
        message: format!("request {id}"),
        id,
        coach_id: coach_id.to_owned(),
        from_email: "student@example.com".to_owned(),
        reply: None,
        reply_at: None,
        created_at,
        updated_at: created_at,
    }
}
