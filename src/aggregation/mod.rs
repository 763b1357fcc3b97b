// ABOUTME: Keeps weekly coaching-request aggregates in step with primary coaching requests
// ABOUTME: Atomic append on insert, version-checked patch and removal on update and delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

//! Weekly aggregate maintenance.
//!
//! A weekly aggregate holds snapshots of every coaching request a coach received in
//! one calendar week. The bucket is derived from the request's `created_at`, which
//! never changes, so an update always lands in the bucket the insert created.
//!
//! Appends use the store's atomic upsert. Updates and deletes read the bucket,
//! change the snapshot array and write it back only if the bucket's `version` is
//! unchanged, re-reading on conflict up to `max_retries` times. Every store call is
//! bounded by `timeout`.

/// Aggregation error types
pub mod error;

pub use error::{AggregationError, AggregationResult};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use coachhub_core::models::{CoachingRequest, WeeklyCoachingRequest};
use coachhub_core::week::{WeekKey, WeekStart};
use tracing::{debug, instrument, warn};

use crate::constants::defaults;
use crate::database::repositories::WeeklyRequestRepository;
use crate::database::DatabaseError;

/// Engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationConfig {
    /// First day of the week used to derive bucket keys
    pub week_start: WeekStart,
    /// Upper bound on one store call
    pub timeout: Duration,
    /// Optimistic write attempts for update and delete
    pub max_retries: u32,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Sunday,
            timeout: Duration::from_millis(defaults::AGGREGATION_TIMEOUT_MS),
            max_retries: defaults::AGGREGATION_MAX_RETRIES,
        }
    }
}

/// What a delete found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The snapshot was removed
    Removed,
    /// No bucket exists for the request's week
    BucketMissing,
    /// The bucket exists but held no matching snapshot
    SnapshotMissing,
}

/// Maintains weekly aggregates. Holds no mutable state; clone freely.
#[derive(Clone)]
pub struct AggregationEngine {
    store: Arc<dyn WeeklyRequestRepository>,
    config: AggregationConfig,
}

impl AggregationEngine {
    /// Create an engine over `store`
    #[must_use]
    pub fn new(store: Arc<dyn WeeklyRequestRepository>, config: AggregationConfig) -> Self {
        Self { store, config }
    }

    /// Engine settings
    #[must_use]
    pub const fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Bucket key for a creation timestamp
    #[must_use]
    pub fn year_week(&self, created_at: &DateTime<Utc>) -> String {
        WeekKey::of(created_at, self.config.week_start).to_string()
    }

    /// Append a snapshot of a newly created request to its weekly bucket
    ///
    /// # Errors
    ///
    /// Returns `Validation` for missing ids and `Storage` if the write fails or times out
    #[instrument(skip_all, fields(request_id = %request.id, coach_id = %request.coach_id))]
    pub async fn insert(&self, request: &CoachingRequest) -> AggregationResult<()> {
        validate_ids(&request.id, &request.coach_id)?;
        let year_week = self.year_week(&request.created_at);
        let snapshot = request.snapshot();

        self.bounded(
            "push_snapshot",
            self.store
                .push_snapshot(&request.coach_id, &year_week, &snapshot),
        )
        .await?;

        debug!(%year_week, "snapshot appended to weekly aggregate");
        Ok(())
    }

    /// Copy the mutable fields of `request` onto its snapshot
    ///
    /// Only `reply`, `reply_at`, `message` and `from_email` are written; the
    /// other snapshots in the bucket are left as stored.
    ///
    /// # Errors
    ///
    /// - `Validation` for missing ids
    /// - `AggregateNotFound` / `SnapshotNotFound` when the aggregate disagrees with
    ///   the primary store
    /// - `Storage` on store failure, timeout, or when every attempt hit a conflict
    #[instrument(skip_all, fields(request_id = %request.id, coach_id = %request.coach_id))]
    pub async fn update(&self, request: &CoachingRequest) -> AggregationResult<WeeklyCoachingRequest> {
        validate_ids(&request.id, &request.coach_id)?;
        let year_week = self.year_week(&request.created_at);

        for attempt in 1..=self.config.max_retries {
            let mut aggregate = self
                .load(&request.coach_id, &year_week)
                .await?
                .ok_or_else(|| AggregationError::AggregateNotFound {
                    coach_id: request.coach_id.clone(),
                    year_week: year_week.clone(),
                })?;

            let Some(snapshot) = aggregate.requests.iter_mut().find(|s| s.id == request.id) else {
                return Err(AggregationError::SnapshotNotFound {
                    request_id: request.id.clone(),
                    year_week,
                });
            };
            snapshot.apply_mutable_fields(request);

            if let Some(stored) = self
                .bounded(
                    "replace_requests",
                    self.store
                        .replace_requests(&aggregate.id, aggregate.version, &aggregate.requests),
                )
                .await?
            {
                debug!(%year_week, version = stored.version, "weekly aggregate snapshot updated");
                return Ok(stored);
            }

            debug!(%year_week, attempt, "weekly aggregate version conflict on update");
        }

        Err(self.conflicts_exhausted("update", &year_week))
    }

    /// Remove a deleted request's snapshot from its bucket
    ///
    /// Pass the values the request had before it was deleted. A missing bucket or
    /// snapshot is not an error. Buckets are kept even when they become empty.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for missing ids and `Storage` on store failure, timeout,
    /// or when every attempt hit a conflict
    #[instrument(skip(self, created_at))]
    pub async fn delete(
        &self,
        request_id: &str,
        coach_id: &str,
        created_at: DateTime<Utc>,
    ) -> AggregationResult<DeleteOutcome> {
        validate_ids(request_id, coach_id)?;
        let year_week = self.year_week(&created_at);

        for attempt in 1..=self.config.max_retries {
            let Some(mut aggregate) = self.load(coach_id, &year_week).await? else {
                debug!(%year_week, "no weekly aggregate to remove snapshot from");
                return Ok(DeleteOutcome::BucketMissing);
            };

            if aggregate.position_of(request_id).is_none() {
                debug!(%year_week, "snapshot already absent from weekly aggregate");
                return Ok(DeleteOutcome::SnapshotMissing);
            }
            aggregate.requests.retain(|s| s.id != request_id);

            if self
                .bounded(
                    "replace_requests",
                    self.store
                        .replace_requests(&aggregate.id, aggregate.version, &aggregate.requests),
                )
                .await?
                .is_some()
            {
                debug!(%year_week, remaining = aggregate.requests.len(), "snapshot removed from weekly aggregate");
                return Ok(DeleteOutcome::Removed);
            }

            debug!(%year_week, attempt, "weekly aggregate version conflict on delete");
        }

        Err(self.conflicts_exhausted("delete", &year_week))
    }

    /// Follow a coach reassignment: drop the snapshot from the previous coach's
    /// bucket and append the current state to the new coach's bucket
    ///
    /// When the coach did not change this is an ordinary [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error
    #[instrument(skip_all, fields(request_id = %current.id, from = %previous.coach_id, to = %current.coach_id))]
    pub async fn reassign(
        &self,
        previous: &CoachingRequest,
        current: &CoachingRequest,
    ) -> AggregationResult<()> {
        if previous.coach_id == current.coach_id {
            return self.update(current).await.map(|_| ());
        }

        let outcome = self
            .delete(&previous.id, &previous.coach_id, previous.created_at)
            .await?;
        if outcome != DeleteOutcome::Removed {
            warn!(?outcome, "previous coach's weekly aggregate did not hold the snapshot");
        }
        self.insert(current).await
    }

    async fn load(
        &self,
        coach_id: &str,
        year_week: &str,
    ) -> AggregationResult<Option<WeeklyCoachingRequest>> {
        self.bounded(
            "find_by_coach_and_year_week",
            self.store.find_by_coach_and_year_week(coach_id, year_week),
        )
        .await
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> AggregationResult<T>
    where
        F: Future<Output = Result<T, DatabaseError>> + Send,
    {
        match tokio::time::timeout(self.config.timeout, call).await {
            Ok(result) => result.map_err(AggregationError::from),
            Err(_) => Err(AggregationError::Storage {
                context: format!(
                    "{operation} timed out after {}ms",
                    self.config.timeout.as_millis()
                ),
            }),
        }
    }

    fn conflicts_exhausted(&self, operation: &str, year_week: &str) -> AggregationError {
        warn!(%year_week, attempts = self.config.max_retries, "weekly aggregate {operation} gave up after repeated version conflicts");
        AggregationError::Storage {
            context: format!(
                "{operation} of weekly aggregate {year_week} hit {} consecutive version conflicts",
                self.config.max_retries
            ),
        }
    }
}

fn validate_ids(request_id: &str, coach_id: &str) -> AggregationResult<()> {
    if request_id.trim().is_empty() {
        return Err(AggregationError::Validation("request id is empty".to_owned()));
    }
    if coach_id.trim().is_empty() {
        return Err(AggregationError::Validation("coach id is empty".to_owned()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use coachhub_core::models::CoachingRequestSnapshot;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// In-process store with injectable conflicts and latency
    #[derive(Default)]
    struct MemoryStore {
        buckets: Mutex<HashMap<(String, String), WeeklyCoachingRequest>>,
        forced_conflicts: AtomicU32,
        replace_calls: AtomicU32,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl WeeklyRequestRepository for MemoryStore {
        async fn push_snapshot(
            &self,
            coach_id: &str,
            year_week: &str,
            snapshot: &CoachingRequestSnapshot,
        ) -> Result<(), DatabaseError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let mut buckets = self.buckets.lock().unwrap();
            let bucket = buckets
                .entry((coach_id.to_owned(), year_week.to_owned()))
                .or_insert_with(|| WeeklyCoachingRequest {
                    id: format!("{coach_id}:{year_week}"),
                    coach_id: coach_id.to_owned(),
                    year_week: year_week.to_owned(),
                    requests: Vec::new(),
                    version: 0,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                });
            bucket.requests.push(snapshot.clone());
            bucket.version += 1;
            Ok(())
        }

        async fn find_by_coach_and_year_week(
            &self,
            coach_id: &str,
            year_week: &str,
        ) -> Result<Option<WeeklyCoachingRequest>, DatabaseError> {
            let buckets = self.buckets.lock().unwrap();
            Ok(buckets
                .get(&(coach_id.to_owned(), year_week.to_owned()))
                .cloned())
        }

        async fn get_by_id(&self, id: &str) -> Result<Option<WeeklyCoachingRequest>, DatabaseError> {
            let buckets = self.buckets.lock().unwrap();
            Ok(buckets.values().find(|b| b.id == id).cloned())
        }

        async fn replace_requests(
            &self,
            id: &str,
            expected_version: i64,
            requests: &[CoachingRequestSnapshot],
        ) -> Result<Option<WeeklyCoachingRequest>, DatabaseError> {
            self.replace_calls.fetch_add(1, Ordering::SeqCst);
            if self
                .forced_conflicts
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Ok(None);
            }
            let mut buckets = self.buckets.lock().unwrap();
            let Some(bucket) = buckets.values_mut().find(|b| b.id == id) else {
                return Ok(None);
            };
            if bucket.version != expected_version {
                return Ok(None);
            }
            bucket.requests = requests.to_vec();
            bucket.version += 1;
            Ok(Some(bucket.clone()))
        }
    }

    fn request(id: &str, day: u32) -> CoachingRequest {
        let created = Utc.with_ymd_and_hms(2020, 3, day, 12, 0, 0).unwrap();
        CoachingRequest {
            id: id.to_owned(),
            coach_id: "coach-1".to_owned(),
            from_email: "student@example.com".to_owned(),
            message: format!("message {id}"),
            reply: None,
            reply_at: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn engine(store: Arc<MemoryStore>, max_retries: u32) -> AggregationEngine {
        AggregationEngine::new(
            store,
            AggregationConfig {
                max_retries,
                timeout: Duration::from_millis(200),
                ..AggregationConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_update_retries_after_conflict() {
        let store = Arc::new(MemoryStore::default());
        let engine = engine(Arc::clone(&store), 3);
        let mut req = request("a", 2);
        engine.insert(&req).await.unwrap();

        store.forced_conflicts.store(2, Ordering::SeqCst);
        req.reply = Some("see you Tuesday".to_owned());
        let stored = engine.update(&req).await.unwrap();

        assert_eq!(store.replace_calls.load(Ordering::SeqCst), 3);
        assert_eq!(stored.requests[0].reply.as_deref(), Some("see you Tuesday"));
    }

    #[tokio::test]
    async fn test_update_gives_up_after_retry_budget() {
        let store = Arc::new(MemoryStore::default());
        let engine = engine(Arc::clone(&store), 3);
        let req = request("a", 2);
        engine.insert(&req).await.unwrap();

        store.forced_conflicts.store(u32::MAX, Ordering::SeqCst);
        let err = engine.update(&req).await.unwrap_err();

        assert!(matches!(err, AggregationError::Storage { .. }));
        assert!(err.is_retryable());
        assert_eq!(store.replace_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_delete_gives_up_after_retry_budget() {
        let store = Arc::new(MemoryStore::default());
        let engine = engine(Arc::clone(&store), 2);
        let req = request("a", 2);
        engine.insert(&req).await.unwrap();

        store.forced_conflicts.store(u32::MAX, Ordering::SeqCst);
        let err = engine.delete(&req.id, &req.coach_id, req.created_at).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_update_reports_missing_bucket_and_snapshot() {
        let store = Arc::new(MemoryStore::default());
        let engine = engine(store, 3);

        let err = engine.update(&request("a", 2)).await.unwrap_err();
        assert!(matches!(err, AggregationError::AggregateNotFound { .. }));
        assert!(err.is_inconsistency());

        engine.insert(&request("a", 2)).await.unwrap();
        let err = engine.update(&request("b", 3)).await.unwrap_err();
        assert!(matches!(err, AggregationError::SnapshotNotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_an_error() {
        let store = Arc::new(MemoryStore::default());
        let engine = engine(store, 3);
        let req = request("a", 2);

        let outcome = engine.delete(&req.id, &req.coach_id, req.created_at).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::BucketMissing);

        engine.insert(&req).await.unwrap();
        let outcome = engine.delete("other", &req.coach_id, req.created_at).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::SnapshotMissing);
    }

    #[tokio::test]
    async fn test_empty_ids_rejected() {
        let store = Arc::new(MemoryStore::default());
        let engine = engine(Arc::clone(&store), 3);
        let mut req = request("a", 2);
        req.coach_id = String::new();

        let err = engine.insert(&req).await.unwrap_err();
        assert!(matches!(err, AggregationError::Validation(_)));
        assert!(store.buckets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        let store = Arc::new(MemoryStore {
            delay: Some(Duration::from_secs(2)),
            ..MemoryStore::default()
        });
        let engine = AggregationEngine::new(
            store,
            AggregationConfig {
                timeout: Duration::from_millis(20),
                ..AggregationConfig::default()
            },
        );

        let err = engine.insert(&request("a", 2)).await.unwrap_err();
        assert!(matches!(err, AggregationError::Storage { .. }));
    }
}
