// ABOUTME: Weekly coaching-request aggregate, one document per coach and week
// ABOUTME: Holds ordered snapshots of the coaching requests created in that week
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coaching_request::CoachingRequestSnapshot;

/// Materialized view of a coach's coaching requests for one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCoachingRequest {
    /// Primary identifier
    pub id: String,
    /// Coach owning the bucket
    pub coach_id: String,
    /// Bucket key, `"<year>-<week>"`
    pub year_week: String,
    /// Snapshots in insertion order
    pub requests: Vec<CoachingRequestSnapshot>,
    /// Write counter for optimistic concurrency
    pub version: i64,
    /// When the bucket was first created
    pub created_at: DateTime<Utc>,
    /// Last write to the bucket
    pub updated_at: DateTime<Utc>,
}

impl WeeklyCoachingRequest {
    /// Index of the snapshot for `request_id`
    #[must_use]
    pub fn position_of(&self, request_id: &str) -> Option<usize> {
        self.requests.iter().position(|r| r.id == request_id)
    }

    /// Snapshot for `request_id`
    #[must_use]
    pub fn snapshot(&self, request_id: &str) -> Option<&CoachingRequestSnapshot> {
        self.requests.iter().find(|r| r.id == request_id)
    }

    /// Keep only the `limit` snapshots following the first `skip`
    #[must_use]
    pub fn paginate(mut self, skip: usize, limit: usize) -> Self {
        self.requests = self.requests.into_iter().skip(skip).take(limit).collect();
        self
    }
}
