// ABOUTME: Coach registry service
// ABOUTME: Validates registrations and profile edits, fronts the coaches table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use coachhub_core::errors::{AppError, AppResult};
use coachhub_core::models::{Coach, CreateCoachRequest, PagedData, PatchCoachRequest};
use tracing::info;

use crate::constants::defaults::DEFAULT_IMAGE_URL;
use crate::database::{timestamp_now, CoachesManager, ListCoachesFilter};
use crate::validation::{normalize_coach_patch, normalize_coach_registration};

/// Coach registration and lookup
#[derive(Clone)]
pub struct CoachesService {
    coaches: CoachesManager,
}

impl CoachesService {
    /// Create the service
    #[must_use]
    pub const fn new(coaches: CoachesManager) -> Self {
        Self { coaches }
    }

    /// Register a coach
    ///
    /// # Errors
    ///
    /// Returns a validation error, `ResourceAlreadyExists` for a taken email, or a
    /// database error
    pub async fn register(&self, mut request: CreateCoachRequest) -> AppResult<Coach> {
        normalize_coach_registration(&mut request)?;
        let coach = self.coaches.create(&request).await?;
        info!(coach_id = %coach.id, "coach registered");
        Ok(coach)
    }

    /// Get a coach that must exist
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when no coach has this ID
    pub async fn get(&self, coach_id: &str) -> AppResult<Coach> {
        self.coaches
            .get(coach_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Coach {coach_id}")))
    }

    /// Fail with `ResourceNotFound` unless the coach exists
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or a database error
    pub async fn ensure_exists(&self, coach_id: &str) -> AppResult<()> {
        if self.coaches.exists(coach_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(format!("Coach {coach_id}")))
        }
    }

    /// One page of coaches matching the filter
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        mut filter: ListCoachesFilter,
        page: u32,
        limit: u32,
    ) -> AppResult<PagedData<Coach>> {
        filter.expertise = filter.expertise.map(|e| e.trim().to_lowercase());
        filter.limit = limit;
        filter.offset = page.saturating_sub(1).saturating_mul(limit);
        let coaches = self.coaches.list(&filter).await?;
        Ok(PagedData::new(page, limit, coaches))
    }

    /// Whether any coach is registered under this email
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        Ok(self.coaches.email_exists(email.trim()).await?.is_some())
    }

    /// Replace a coach profile
    ///
    /// Roles are kept unless the payload names some; a missing avatar resets to
    /// the stock one.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `ResourceNotFound`, `ResourceAlreadyExists` for an
    /// email held by another coach, or a database error
    pub async fn replace(
        &self,
        coach_id: &str,
        mut request: CreateCoachRequest,
    ) -> AppResult<Coach> {
        normalize_coach_registration(&mut request)?;
        let existing = self.get(coach_id).await?;

        let coach = Coach {
            id: existing.id,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            description: request.description,
            expertise: request.expertise,
            roles: request
                .roles
                .filter(|r| !r.is_empty())
                .unwrap_or(existing.roles),
            hourly_rate: request.hourly_rate,
            image_url: request
                .image_url
                .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_owned()),
            created_at: existing.created_at,
            updated_at: timestamp_now(),
        };

        if !self.coaches.update(&coach).await? {
            return Err(AppError::not_found(format!("Coach {coach_id}")));
        }
        info!(coach_id = %coach.id, "coach replaced");
        Ok(coach)
    }

    /// Apply a partial update to a coach profile
    ///
    /// # Errors
    ///
    /// Returns a validation error, `ResourceNotFound`, `ResourceAlreadyExists` for an
    /// email held by another coach, or a database error
    pub async fn patch(&self, coach_id: &str, mut patch: PatchCoachRequest) -> AppResult<Coach> {
        normalize_coach_patch(&mut patch)?;
        let coach = self
            .coaches
            .patch(coach_id, &patch)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Coach {coach_id}")))?;
        info!(coach_id = %coach.id, "coach patched");
        Ok(coach)
    }

    /// Delete a coach, their coaching requests and their weekly buckets
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or a database error
    pub async fn delete(&self, coach_id: &str) -> AppResult<Coach> {
        let coach = self
            .coaches
            .delete(coach_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Coach {coach_id}")))?;
        info!(coach_id = %coach.id, "coach deleted");
        Ok(coach)
    }
}
