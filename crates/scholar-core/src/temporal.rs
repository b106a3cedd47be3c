//! # Temporal Types
//!
//! Two notions of time flow through Scholar Trust:
//!
//! - [`BlockHeight`]: the chain-position marker recorded on pools
//!   (`created_at`) and verifications (`verified_at`). It is supplied by the
//!   surrounding execution environment and only ever moves forward.
//! - [`Timestamp`]: UTC wall-clock time with seconds precision, attached to
//!   audit events.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

// ─── BlockHeight ─────────────────────────────────────────────────────

/// A block height: the position in the ledger at which a call executed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockHeight(u64);

impl BlockHeight {
    /// The height before any block has been produced.
    pub const GENESIS: BlockHeight = BlockHeight(0);

    /// Wrap a raw height.
    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    /// The raw height.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Advance by `blocks`, saturating at `u64::MAX`.
    pub fn advance(self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }
}

impl std::fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ─── Timestamp ───────────────────────────────────────────────────────

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO 8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_height_advances() {
        let h = BlockHeight::GENESIS.advance(3);
        assert_eq!(h.get(), 3);
        assert!(h > BlockHeight::GENESIS);
    }

    #[test]
    fn block_height_saturates() {
        assert_eq!(BlockHeight::new(u64::MAX).advance(1).get(), u64::MAX);
    }

    #[test]
    fn block_height_display() {
        assert_eq!(BlockHeight::new(42).to_string(), "#42");
    }

    #[test]
    fn now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }
}
