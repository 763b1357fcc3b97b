// ABOUTME: Application constants: field limits, pagination defaults and environment keys
// ABOUTME: Shared by validation, routes, configuration and the seeding binary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

/// Field length and value limits enforced on input
pub mod limits {
    /// Maximum length of a student contact email
    pub const MAX_FROM_EMAIL_LENGTH: usize = 40;
    /// Maximum length of a coaching request message or reply
    pub const MAX_MESSAGE_LENGTH: usize = 256;
    /// Maximum length of a coach description
    pub const MAX_DESCRIPTION_LENGTH: usize = 512;
    /// Maximum length of a coach's first or last name
    pub const MAX_NAME_LENGTH: usize = 64;
    /// Lowest accepted hourly rate
    pub const MIN_HOURLY_RATE: u32 = 1;
    /// Highest accepted hourly rate
    pub const MAX_HOURLY_RATE: u32 = 1_000_000;
    /// Emails shorter than this are rejected outright
    pub const MIN_EMAIL_LENGTH: usize = 6;
}

/// Defaults applied when input or configuration omits a value
pub mod defaults {
    /// Avatar used when a coach registers without one
    pub const DEFAULT_IMAGE_URL: &str = "/avatars/avatar.png";
    /// Page size for listings
    pub const DEFAULT_PAGE_LIMIT: u32 = 100;
    /// Largest accepted page size
    pub const MAX_PAGE_LIMIT: u32 = 1000;
    /// First page number
    pub const DEFAULT_PAGE: u32 = 1;
    /// HTTP port
    pub const HTTP_PORT: u16 = 8081;
    /// SQLite location
    pub const DATABASE_URL: &str = "sqlite:./data/coachhub.db";
    /// Log filter when neither `RUST_LOG` nor `LOG_LEVEL` is set
    pub const LOG_LEVEL: &str = "info";
    /// Upper bound on a single aggregate storage call
    pub const AGGREGATION_TIMEOUT_MS: u64 = 5_000;
    /// Optimistic write attempts before giving up
    pub const AGGREGATION_MAX_RETRIES: u32 = 5;
}

/// Environment variable names read by `ServerConfig`
pub mod env_config {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// SQLite connection URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Fallback log filter
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// `pretty` or `json`
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// `sunday` or `monday`
    pub const WEEK_START: &str = "WEEK_START";
    /// Milliseconds
    pub const AGGREGATION_TIMEOUT_MS: &str = "AGGREGATION_TIMEOUT_MS";
    /// Attempts
    pub const AGGREGATION_MAX_RETRIES: &str = "AGGREGATION_MAX_RETRIES";
    /// Comma separated origins, `*` for any
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
}
