// ABOUTME: Environment-based server configuration with typed parsing and defaults
// ABOUTME: Covers HTTP, database, logging, week numbering and aggregation settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use coachhub_core::errors::{AppError, AppResult};
use coachhub_core::week::WeekStart;
use serde::{Deserialize, Serialize};

use crate::aggregation::AggregationConfig;
use crate::constants::{defaults, env_config};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "compact" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}', expected pretty or json")),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// SQLite connection URL
    pub database_url: String,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// First day of the week for weekly buckets
    pub week_start: WeekStart,
    /// Upper bound on one aggregate storage call
    pub aggregation_timeout: Duration,
    /// Optimistic write attempts per aggregate update or delete
    pub aggregation_max_retries: u32,
    /// Allowed CORS origins; empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            database_url: defaults::DATABASE_URL.to_owned(),
            log_level: defaults::LOG_LEVEL.to_owned(),
            log_format: LogFormat::Pretty,
            week_start: WeekStart::Sunday,
            aggregation_timeout: Duration::from_millis(defaults::AGGREGATION_TIMEOUT_MS),
            aggregation_max_retries: defaults::AGGREGATION_MAX_RETRIES,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error if any variable is set to an unparseable value
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns a config error if any value is unparseable or out of range
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fallback = Self::default();

        let timeout_ms: u64 = parse_var(
            &lookup,
            env_config::AGGREGATION_TIMEOUT_MS,
            defaults::AGGREGATION_TIMEOUT_MS,
        )?;
        if timeout_ms == 0 {
            return Err(AppError::config(format!(
                "{} must be greater than zero",
                env_config::AGGREGATION_TIMEOUT_MS
            )));
        }

        let max_retries: u32 = parse_var(
            &lookup,
            env_config::AGGREGATION_MAX_RETRIES,
            defaults::AGGREGATION_MAX_RETRIES,
        )?;
        if max_retries == 0 {
            return Err(AppError::config(format!(
                "{} must be at least 1",
                env_config::AGGREGATION_MAX_RETRIES
            )));
        }

        Ok(Self {
            http_port: parse_var(&lookup, env_config::HTTP_PORT, fallback.http_port)?,
            database_url: non_empty(&lookup, env_config::DATABASE_URL)
                .unwrap_or(fallback.database_url),
            log_level: non_empty(&lookup, env_config::LOG_LEVEL).unwrap_or(fallback.log_level),
            log_format: parse_var(&lookup, env_config::LOG_FORMAT, fallback.log_format)?,
            week_start: parse_var(&lookup, env_config::WEEK_START, fallback.week_start)?,
            aggregation_timeout: Duration::from_millis(timeout_ms),
            aggregation_max_retries: max_retries,
            cors_allowed_origins: non_empty(&lookup, env_config::CORS_ALLOWED_ORIGINS)
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        })
    }

    /// Settings handed to the aggregation engine
    #[must_use]
    pub const fn aggregation_config(&self) -> AggregationConfig {
        AggregationConfig {
            week_start: self.week_start,
            timeout: self.aggregation_timeout,
            max_retries: self.aggregation_max_retries,
        }
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    non_empty(lookup, key).map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}")))
    })
}

/// `*` anywhere in the list means any origin
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_owned)
        .collect();
    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppResult<ServerConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.http_port, 8081);
        assert_eq!(config.database_url, "sqlite:./data/coachhub.db");
        assert_eq!(config.week_start, WeekStart::Sunday);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.aggregation_timeout, Duration::from_millis(5000));
        assert_eq!(config.aggregation_max_retries, 5);
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_values_are_parsed() {
        let config = config_from(&[
            ("HTTP_PORT", "9000"),
            ("WEEK_START", "monday"),
            ("LOG_FORMAT", "json"),
            ("AGGREGATION_TIMEOUT_MS", "250"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test"),
        ])
        .unwrap();
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.aggregation_timeout, Duration::from_millis(250));
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://a.test".to_owned(), "http://b.test".to_owned()]
        );
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = config_from(&[("HTTP_PORT", "eighty")]).unwrap_err();
        assert_eq!(err.code, coachhub_core::ErrorCode::ConfigError);
        assert!(config_from(&[("WEEK_START", "friday")]).is_err());
        assert!(config_from(&[("AGGREGATION_MAX_RETRIES", "0")]).is_err());
        assert!(config_from(&[("AGGREGATION_TIMEOUT_MS", "0")]).is_err());
    }

    #[test]
    fn test_wildcard_origin_means_any() {
        let config = config_from(&[("CORS_ALLOWED_ORIGINS", "http://a.test,*")]).unwrap();
        assert!(config.cors_allowed_origins.is_empty());
    }
}
