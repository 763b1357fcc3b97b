// ABOUTME: Error taxonomy for weekly aggregate maintenance
// ABOUTME: Distinguishes bad input, storage failures and cross-store inconsistencies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use thiserror::Error;

use crate::database::DatabaseError;

/// Failure of an aggregation engine operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// The coaching request lacks an identifier the engine needs
    #[error("invalid coaching request for aggregation: {0}")]
    Validation(String),

    /// The store failed, timed out or kept rejecting optimistic writes
    #[error("weekly aggregate storage failure: {context}")]
    Storage {
        /// Failure detail
        context: String,
    },

    /// No bucket exists where the request's snapshot should live
    #[error("no weekly aggregate for coach {coach_id} in week {year_week}")]
    AggregateNotFound {
        /// Coach of the missing bucket
        coach_id: String,
        /// Week of the missing bucket
        year_week: String,
    },

    /// The bucket exists but holds no snapshot for the request
    #[error("coaching request {request_id} is missing from weekly aggregate {year_week}")]
    SnapshotNotFound {
        /// Request that was looked for
        request_id: String,
        /// Bucket that was searched
        year_week: String,
    },
}

/// Result alias for aggregation operations
pub type AggregationResult<T> = Result<T, AggregationError>;

impl AggregationError {
    /// Storage failures may succeed if the caller tries again later
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// The aggregate disagrees with the primary store
    #[must_use]
    pub const fn is_inconsistency(&self) -> bool {
        matches!(
            self,
            Self::AggregateNotFound { .. } | Self::SnapshotNotFound { .. }
        )
    }
}

impl From<DatabaseError> for AggregationError {
    fn from(e: DatabaseError) -> Self {
        Self::Storage {
            context: e.to_string(),
        }
    }
}
