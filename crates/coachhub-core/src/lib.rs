// ABOUTME: Core crate for Coachhub shared by the server, services and binaries
// ABOUTME: Re-exports domain models, week key derivation and the unified error system
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

#![deny(unsafe_code)]

//! # Coachhub Core
//!
//! Types shared by every layer of the Coachhub server:
//!
//! - **Models**: coaches, coaching requests, their embedded snapshots and the
//!   weekly coaching-request aggregate
//! - **Week keys**: the `"<year>-<week>"` bucket identity derived from a timestamp
//! - **Errors**: `AppError` with standard error codes and optional HTTP rendering

/// Unified error handling with standard error codes
pub mod errors;

/// Domain models
pub mod models;

/// Calendar week derivation for weekly aggregate buckets
pub mod week;

pub use errors::{AppError, AppResult, ErrorCode};
pub use week::{week_key, WeekKey, WeekStart};
