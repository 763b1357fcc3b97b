// ABOUTME: Coach profile model with registration and partial-update payloads
// ABOUTME: Coaches receive coaching requests and own weekly request buckets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role granted to a coach account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoachRole {
    /// Regular coach
    #[default]
    User,
    /// Marketplace administrator
    Admin,
}

impl CoachRole {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

/// A registered coach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coach {
    /// Unique identifier
    pub id: String,
    /// Contact email, unique across coaches
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Profile description
    pub description: String,
    /// Areas of expertise, lowercased
    pub expertise: Vec<String>,
    /// Account roles
    pub roles: Vec<CoachRole>,
    /// Hourly rate in whole currency units
    pub hourly_rate: u32,
    /// Avatar location
    pub image_url: String,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Coach {
    /// Display name
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for registering a coach
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCoachRequest {
    /// Contact email
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Profile description
    pub description: String,
    /// Areas of expertise
    pub expertise: Vec<String>,
    /// Hourly rate
    pub hourly_rate: u32,
    /// Avatar location, defaults to the stock avatar
    #[serde(default)]
    pub image_url: Option<String>,
    /// Roles, defaults to `user`
    #[serde(default)]
    pub roles: Option<Vec<CoachRole>>,
}

/// Partial update of a coach profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchCoachRequest {
    /// New contact email, must stay unique
    #[serde(default)]
    pub email: Option<String>,
    /// New given name
    #[serde(default)]
    pub first_name: Option<String>,
    /// New family name
    #[serde(default)]
    pub last_name: Option<String>,
    /// New profile description
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement expertise list
    #[serde(default)]
    pub expertise: Option<Vec<String>>,
    /// New hourly rate
    #[serde(default)]
    pub hourly_rate: Option<u32>,
    /// New avatar location
    #[serde(default)]
    pub image_url: Option<String>,
}

impl PatchCoachRequest {
    /// True when no field would change
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.description.is_none()
            && self.expertise.is_none()
            && self.hourly_rate.is_none()
            && self.image_url.is_none()
    }
}
