// ABOUTME: Coaching request primary record, its embedded snapshot, and mutation payloads
// ABOUTME: Snapshots are the copies held inside weekly aggregates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::week::{WeekKey, WeekStart};

/// A coaching request submitted by a student to a coach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachingRequest {
    /// Unique identifier
    pub id: String,
    /// Coach the request is addressed to
    pub coach_id: String,
    /// Student contact email
    pub from_email: String,
    /// Request body
    pub message: String,
    /// Coach reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// When the reply was written; set exactly when `reply` is non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_at: Option<DateTime<Utc>>,
    /// Creation timestamp, immutable; determines the weekly bucket
    pub created_at: DateTime<Utc>,
    /// Last write to the primary record
    pub updated_at: DateTime<Utc>,
}

impl CoachingRequest {
    /// Weekly bucket this request belongs to
    #[must_use]
    pub fn week_key(&self, start: WeekStart) -> WeekKey {
        WeekKey::of(&self.created_at, start)
    }

    /// Copy of this request for embedding in a weekly aggregate
    #[must_use]
    pub fn snapshot(&self) -> CoachingRequestSnapshot {
        CoachingRequestSnapshot::from(self)
    }
}

/// Embedded copy of a [`CoachingRequest`] stored inside a weekly aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachingRequestSnapshot {
    /// Identifier of the source coaching request
    pub id: String,
    /// Coach the request is addressed to
    pub coach_id: String,
    /// Student contact email
    pub from_email: String,
    /// Request body
    pub message: String,
    /// Coach reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// When the reply was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_at: Option<DateTime<Utc>>,
    /// Creation timestamp of the source request
    pub created_at: DateTime<Utc>,
}

impl From<&CoachingRequest> for CoachingRequestSnapshot {
    fn from(request: &CoachingRequest) -> Self {
        Self {
            id: request.id.clone(),
            coach_id: request.coach_id.clone(),
            from_email: request.from_email.clone(),
            message: request.message.clone(),
            reply: request.reply.clone(),
            reply_at: request.reply_at,
            created_at: request.created_at,
        }
    }
}

impl CoachingRequestSnapshot {
    /// Overwrite the fields that may change after creation, leaving identity and
    /// creation time untouched
    pub fn apply_mutable_fields(&mut self, source: &CoachingRequest) {
        self.reply.clone_from(&source.reply);
        self.reply_at = source.reply_at;
        self.message.clone_from(&source.message);
        self.from_email.clone_from(&source.from_email);
    }
}

/// Payload for creating a coaching request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCoachingRequest {
    /// Coach the request is addressed to
    pub coach_id: String,
    /// Student contact email
    pub from_email: String,
    /// Request body
    pub message: String,
}

/// Partial update of a coaching request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchCoachingRequest {
    /// New contact email
    #[serde(default)]
    pub from_email: Option<String>,
    /// New request body
    #[serde(default)]
    pub message: Option<String>,
    /// Coach reply
    #[serde(default)]
    pub reply: Option<String>,
}

impl PatchCoachingRequest {
    /// True when no field would change
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.from_email.is_none() && self.message.is_none() && self.reply.is_none()
    }
}

/// Full overwrite of a coaching request, optionally reassigning its coach
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutCoachingRequest {
    /// Coach the request is addressed to
    pub coach_id: String,
    /// Student contact email
    pub from_email: String,
    /// Request body
    pub message: String,
    /// Coach reply
    #[serde(default)]
    pub reply: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> CoachingRequest {
        let created = Utc.with_ymd_and_hms(2020, 3, 2, 10, 0, 0).unwrap();
        CoachingRequest {
            id: "req-1".to_owned(),
            coach_id: "coach-1".to_owned(),
            from_email: "student@example.com".to_owned(),
            message: "Can you help with my serve?".to_owned(),
            reply: None,
            reply_at: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_apply_mutable_fields_keeps_identity() {
        let original = request();
        let mut snapshot = original.snapshot();

        let mut changed = original.clone();
        changed.reply = Some("Sure, Tuesday works".to_owned());
        changed.reply_at = Some(Utc.with_ymd_and_hms(2020, 3, 3, 9, 0, 0).unwrap());
        changed.message = "Can you help with my backhand?".to_owned();
        changed.id = "other".to_owned();
        changed.created_at = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();

        snapshot.apply_mutable_fields(&changed);

        assert_eq!(snapshot.id, "req-1");
        assert_eq!(snapshot.created_at, original.created_at);
        assert_eq!(snapshot.reply.as_deref(), Some("Sure, Tuesday works"));
        assert_eq!(snapshot.reply_at, changed.reply_at);
        assert_eq!(snapshot.message, "Can you help with my backhand?");
    }

    #[test]
    fn test_snapshot_omits_empty_reply() {
        let json = serde_json::to_value(request().snapshot()).unwrap();
        assert!(json.get("reply").is_none());
        assert!(json.get("reply_at").is_none());
        assert_eq!(json["coach_id"], "coach-1");
    }
}
