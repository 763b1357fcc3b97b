// ABOUTME: Week-of-year derivation producing the persisted "<year>-<week>" bucket key
// ABOUTME: Pure and deterministic; the numbering rule is part of the stored schema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

//! Week keys identify weekly coaching-request buckets.
//!
//! A week belongs to the year that holds at least four of its days. When January 1st
//! falls late in a week, the first days of January belong to the final week of the
//! previous year; when December 31st falls early in a week, the last days of
//! December belong to week 1 of the following year.
//!
//! Changing anything in this module changes persisted `year_week` values and requires
//! a data migration.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First day of a week. All keys in one deployment must share the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// Weeks run Sunday to Saturday (day-of-week offset 0)
    #[default]
    Sunday,
    /// Weeks run Monday to Sunday (day-of-week offset 1)
    Monday,
}

impl WeekStart {
    /// Day-of-week offset subtracted from Sunday-based weekday indices
    #[must_use]
    pub const fn offset(self) -> u32 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
        }
    }

    /// Convert a Sunday-based weekday index (0..=6) into this week start's index
    const fn shift(self, sunday_index: u32) -> u32 {
        (sunday_index + 7 - self.offset()) % 7
    }

    /// Name used in configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
        }
    }
}

impl FromStr for WeekStart {
    type Err = WeekKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" | "0" => Ok(Self::Sunday),
            "monday" | "mon" | "1" => Ok(Self::Monday),
            other => Err(WeekKeyError::InvalidWeekStart(other.to_owned())),
        }
    }
}

/// Errors raised while parsing week keys or week starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeekKeyError {
    /// The key is not of the form `<year>-<week>`
    #[error("invalid year_week '{0}', expected <year>-<week>")]
    InvalidFormat(String),
    /// The week number is outside 1..=53
    #[error("week number {0} is out of range")]
    WeekOutOfRange(u32),
    /// Unknown week start name
    #[error("invalid week start '{0}', expected sunday or monday")]
    InvalidWeekStart(String),
}

/// Identity of a weekly bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekKey {
    /// Year the week is counted in
    pub year: i32,
    /// Week number within `year`, 1..=53
    pub week: u32,
}

impl WeekKey {
    /// Build a key from explicit parts
    ///
    /// # Errors
    ///
    /// Returns an error if `week` is outside 1..=53
    pub const fn new(year: i32, week: u32) -> Result<Self, WeekKeyError> {
        if week == 0 || week > 53 {
            return Err(WeekKeyError::WeekOutOfRange(week));
        }
        Ok(Self { year, week })
    }

    /// Key of the week containing `timestamp`, evaluated in UTC
    #[must_use]
    pub fn of(timestamp: &DateTime<Utc>, start: WeekStart) -> Self {
        week_key(timestamp.date_naive(), start)
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = WeekKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WeekKeyError::InvalidFormat(s.to_owned());
        let (year, week) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let week = week.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, week)
    }
}

const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

const fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Compute the week key of `date`
#[must_use]
pub fn week_key(date: NaiveDate, start: WeekStart) -> WeekKey {
    let day_num = date.ordinal();
    let weekday = date.weekday().num_days_from_sunday();
    // ordinal - 1 is at most 365, so adding 7 * 53 keeps the subtraction non-negative
    let jan1 = (weekday + 7 * 53 - (day_num - 1)) % 7;
    key_for_day(date.year(), day_num, jan1, start)
}

/// `jan1` is the Sunday-based weekday index of January 1st of `year`
fn key_for_day(year: i32, day_num: u32, jan1: u32, start: WeekStart) -> WeekKey {
    let day = start.shift(jan1);

    // a year starting before the middle of a week counts that week as week 1
    let week = if day < 4 {
        (day_num + day - 1) / 7 + 1
    } else {
        (day_num + day - 1) / 7
    };

    if week == 0 {
        // fewer than 4 days of this week fall in the new year
        let prev_year = year - 1;
        let prev_len = days_in_year(prev_year);
        let prev_jan1 = (jan1 + 7 - prev_len % 7) % 7;
        return key_for_day(prev_year, prev_len, prev_jan1, start);
    }

    if week <= 52 {
        return WeekKey { year, week };
    }

    let next_jan1 = (jan1 + days_in_year(year)) % 7;
    if start.shift(next_jan1) < 4 {
        WeekKey {
            year: year + 1,
            week: 1,
        }
    } else {
        WeekKey { year, week: 53 }
    }
}
