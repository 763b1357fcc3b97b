// ABOUTME: Service layer between HTTP routes and storage
// ABOUTME: Coach registry, coaching request lifecycle and weekly aggregate queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

/// Coach registration and lookup
pub mod coaches;
/// Coaching request lifecycle orchestration
pub mod coaching_requests;
/// Weekly aggregate queries
pub mod weekly_requests;

pub use coaches::CoachesService;
pub use coaching_requests::CoachingRequestsService;
pub use weekly_requests::{WeeklyRequestsFilter, WeeklyRequestsService};
