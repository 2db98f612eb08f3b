//! Rate limit details attached to rate limit failures.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};

/// Quota snapshot reported by the GitHub `rate_limit` endpoint.
///
/// # Example
///
/// ```
/// use lunaria_action::github::rate_limit::RateLimitInfo;
///
/// let info = RateLimitInfo::from_epoch(5000, 0, 1_700_000_000).expect("valid epoch");
/// assert!(info.is_exhausted());
/// assert_eq!(info.to_string(), "0/5000 requests left, resets at 2023-11-14T22:13:20+00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    limit: u32,
    remaining: u32,
    reset_at: DateTime<Utc>,
}

impl RateLimitInfo {
    /// Builds the snapshot from the raw values GitHub returns, where the reset
    /// time is a Unix timestamp in seconds.
    ///
    /// Returns `None` when a value does not fit the expected range.
    #[must_use]
    pub fn from_epoch(limit: u64, remaining: u64, reset_epoch: u64) -> Option<Self> {
        let reset_seconds = i64::try_from(reset_epoch).ok()?;
        Some(Self {
            limit: u32::try_from(limit).ok()?,
            remaining: u32::try_from(remaining).ok()?,
            reset_at: Utc.timestamp_opt(reset_seconds, 0).single()?,
        })
    }

    /// Maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Requests left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// When the window resets.
    #[must_use]
    pub const fn reset_at(&self) -> DateTime<Utc> {
        self.reset_at
    }

    /// Returns true once no requests are left.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

impl fmt::Display for RateLimitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} requests left, resets at {}",
            self.remaining,
            self.limit,
            self.reset_at.to_rfc3339()
        )
    }
}
