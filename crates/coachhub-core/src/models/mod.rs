// ABOUTME: Domain model module organization for Coachhub
// ABOUTME: Coaches, coaching requests, weekly aggregates and paging envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

/// Coach profiles
pub mod coach;
/// Coaching requests submitted by students and their embedded snapshots
pub mod coaching_request;
/// Weekly coaching-request aggregates
pub mod weekly_request;

pub use coach::{Coach, CoachRole, CreateCoachRequest, PatchCoachRequest};
pub use coaching_request::{
    CoachingRequest, CoachingRequestSnapshot, CreateCoachingRequest, PatchCoachingRequest,
    PutCoachingRequest,
};
pub use weekly_request::WeeklyCoachingRequest;

use serde::{Deserialize, Serialize};

/// One page of a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedData<T> {
    /// 1-based page number
    pub page: u32,
    /// Maximum number of items per page
    pub limit: u32,
    /// Number of items in `data`
    pub length: usize,
    /// Items on this page
    pub data: Vec<T>,
}

impl<T> PagedData<T> {
    /// Wrap a page of items
    #[must_use]
    pub fn new(page: u32, limit: u32, data: Vec<T>) -> Self {
        Self {
            page,
            limit,
            length: data.len(),
            data,
        }
    }

    /// Convert every item on the page
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedData<U> {
        PagedData::new(self.page, self.limit, self.data.into_iter().map(f).collect())
    }
}
