// ABOUTME: Coaching request lifecycle: primary-record mutations followed by aggregate sync
// ABOUTME: Aggregate failures are logged as inconsistencies and never fail the caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use chrono::{DateTime, Utc};
use coachhub_core::errors::{AppError, AppResult};
use coachhub_core::models::{
    CoachingRequest, CreateCoachingRequest, PagedData, PatchCoachingRequest, PutCoachingRequest,
};
use tracing::{error, info, warn};

use crate::aggregation::{AggregationEngine, AggregationError, DeleteOutcome};
use crate::database::{timestamp_now, CoachingRequestsManager, ListCoachingRequestsFilter};
use crate::services::CoachesService;
use crate::validation::{
    validate_create_coaching_request, validate_patch_coaching_request,
    validate_put_coaching_request,
};

/// Orchestrates coaching request writes and keeps weekly aggregates in step
///
/// The primary record is written first. The aggregate is synchronized only after
/// that write succeeds, and its outcome never changes what the caller sees.
#[derive(Clone)]
pub struct CoachingRequestsService {
    requests: CoachingRequestsManager,
    coaches: CoachesService,
    engine: AggregationEngine,
}

impl CoachingRequestsService {
    /// Create the service
    #[must_use]
    pub const fn new(
        requests: CoachingRequestsManager,
        coaches: CoachesService,
        engine: AggregationEngine,
    ) -> Self {
        Self {
            requests,
            coaches,
            engine,
        }
    }

    /// Submit a coaching request now
    ///
    /// # Errors
    ///
    /// Returns a validation error, `ResourceNotFound` for an unknown coach, or a
    /// database error
    pub async fn create(&self, payload: CreateCoachingRequest) -> AppResult<CoachingRequest> {
        self.create_at(payload, timestamp_now()).await
    }

    /// Submit a coaching request with an explicit creation time
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create)
    pub async fn create_at(
        &self,
        payload: CreateCoachingRequest,
        created_at: DateTime<Utc>,
    ) -> AppResult<CoachingRequest> {
        validate_create_coaching_request(&payload)?;
        self.coaches.ensure_exists(&payload.coach_id).await?;

        let saved = self.requests.create_at(&payload, created_at).await?;
        info!(request_id = %saved.id, coach_id = %saved.coach_id, "coaching request created");

        if let Err(e) = self.engine.insert(&saved).await {
            self.report_divergence("insert", &saved, &e);
        }
        Ok(saved)
    }

    /// Get a coaching request that must exist
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when no request has this ID
    pub async fn get(&self, request_id: &str) -> AppResult<CoachingRequest> {
        self.requests
            .get(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Coaching request {request_id}")))
    }

    /// One page of coaching requests, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        coach_id: Option<String>,
        page: u32,
        limit: u32,
    ) -> AppResult<PagedData<CoachingRequest>> {
        let filter = ListCoachingRequestsFilter {
            coach_id,
            limit,
            offset: page.saturating_sub(1).saturating_mul(limit),
        };
        let requests = self.requests.list(&filter).await?;
        Ok(PagedData::new(page, limit, requests))
    }

    /// Change some of `from_email`, `message` and `reply`
    ///
    /// Writing a reply stamps `reply_at` with the current time.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `ResourceNotFound`, or a database error
    pub async fn patch(
        &self,
        request_id: &str,
        patch: PatchCoachingRequest,
    ) -> AppResult<CoachingRequest> {
        validate_patch_coaching_request(&patch)?;
        let existing = self.get(request_id).await?;

        let now = timestamp_now();
        let mut updated = existing;
        if let Some(from_email) = patch.from_email {
            updated.from_email = from_email;
        }
        if let Some(message) = patch.message {
            updated.message = message;
        }
        if let Some(reply) = patch.reply {
            updated.reply = Some(reply);
            updated.reply_at = Some(now);
        }
        updated.updated_at = now;

        self.save(&updated).await?;

        if let Err(e) = self.engine.update(&updated).await {
            self.report_divergence("update", &updated, &e);
        }
        Ok(updated)
    }

    /// Overwrite a coaching request, possibly moving it to another coach
    ///
    /// An omitted `reply` keeps the stored one.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `ResourceNotFound` for an unknown request or
    /// coach, or a database error
    pub async fn put(&self, request_id: &str, put: PutCoachingRequest) -> AppResult<CoachingRequest> {
        validate_put_coaching_request(&put)?;
        let existing = self.get(request_id).await?;
        if put.coach_id != existing.coach_id {
            self.coaches.ensure_exists(&put.coach_id).await?;
        }

        let now = timestamp_now();
        let (reply, reply_at) = match put.reply {
            Some(reply) => (Some(reply), Some(now)),
            None => (existing.reply.clone(), existing.reply_at),
        };
        let updated = CoachingRequest {
            id: existing.id.clone(),
            coach_id: put.coach_id,
            from_email: put.from_email,
            message: put.message,
            reply,
            reply_at,
            created_at: existing.created_at,
            updated_at: now,
        };

        self.save(&updated).await?;

        if updated.coach_id == existing.coach_id {
            if let Err(e) = self.engine.update(&updated).await {
                self.report_divergence("update", &updated, &e);
            }
        } else {
            info!(
                request_id = %updated.id,
                from = %existing.coach_id,
                to = %updated.coach_id,
                "coaching request reassigned"
            );
            if let Err(e) = self.engine.reassign(&existing, &updated).await {
                self.report_divergence("reassign", &updated, &e);
            }
        }
        Ok(updated)
    }

    /// Delete a coaching request and return it as it was
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or a database error
    pub async fn delete(&self, request_id: &str) -> AppResult<CoachingRequest> {
        let deleted = self
            .requests
            .delete(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Coaching request {request_id}")))?;
        info!(request_id = %deleted.id, coach_id = %deleted.coach_id, "coaching request deleted");

        match self
            .engine
            .delete(&deleted.id, &deleted.coach_id, deleted.created_at)
            .await
        {
            Ok(DeleteOutcome::Removed) => {}
            Ok(outcome) => warn!(
                request_id = %deleted.id,
                coach_id = %deleted.coach_id,
                year_week = %self.engine.year_week(&deleted.created_at),
                ?outcome,
                "deleted coaching request had no weekly aggregate snapshot"
            ),
            Err(e) => self.report_divergence("delete", &deleted, &e),
        }
        Ok(deleted)
    }

    async fn save(&self, request: &CoachingRequest) -> AppResult<()> {
        if self.requests.update(request).await? {
            Ok(())
        } else {
            Err(AppError::not_found(format!("Coaching request {}", request.id)))
        }
    }

    fn report_divergence(&self, operation: &'static str, request: &CoachingRequest, err: &AggregationError) {
        error!(
            operation,
            request_id = %request.id,
            coach_id = %request.coach_id,
            year_week = %self.engine.year_week(&request.created_at),
            retryable = err.is_retryable(),
            error = %err,
            "weekly aggregate out of sync with coaching request"
        );
    }
}
