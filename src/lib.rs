// ABOUTME: Main library entry point for the Coachhub API server
// ABOUTME: Coach marketplace with weekly coaching-request aggregation over SQLite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

#![deny(unsafe_code)]

//! # Coachhub
//!
//! A coach marketplace API. Coaches register, students submit coaching requests,
//! coaches reply, and every request is also kept in a per-coach, per-week
//! aggregate so a coach's week can be read in one lookup.
//!
//! ## Architecture
//!
//! - **Database**: SQLite pool, embedded migrations and one manager per table
//! - **Aggregation**: keeps weekly aggregates consistent with coaching requests
//! - **Services**: request lifecycle orchestration and read-side queries
//! - **Routes**: axum HTTP API
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use coachhub::config::ServerConfig;
//! use coachhub_core::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Coachhub configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Weekly aggregate maintenance
pub mod aggregation;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// SQLite storage
pub mod database;

/// Tracing subscriber setup
pub mod logging;

/// Shared handler dependencies
pub mod resources;

/// HTTP routes
pub mod routes;

/// Business services
pub mod services;

/// Input validation
pub mod validation;

pub use coachhub_core::errors::{AppError, AppResult, ErrorCode};
