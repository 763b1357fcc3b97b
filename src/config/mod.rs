// ABOUTME: Configuration module organization
// ABOUTME: Server settings are loaded from environment variables only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

/// Environment-driven server configuration
pub mod environment;

pub use environment::{LogFormat, ServerConfig};
