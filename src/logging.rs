// ABOUTME: Tracing subscriber setup for the server and tooling binaries
// ABOUTME: EnvFilter from RUST_LOG or LOG_LEVEL with compact or JSON output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use coachhub_core::errors::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, ServerConfig};

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured `LOG_LEVEL`.
///
/// # Errors
///
/// Returns a config error if the filter is invalid or a subscriber is already set
pub fn init_logging(config: &ServerConfig) -> AppResult<()> {
    let filter = build_filter(&config.log_level)?;

    let result = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .with_target(true)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init(),
    };

    result.map_err(|e| AppError::config(format!("Failed to initialize logging: {e}")))
}

fn build_filter(log_level: &str) -> AppResult<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(log_level)
            .map_err(|e| AppError::config(format!("Invalid LOG_LEVEL '{log_level}': {e}")))
    })
}
