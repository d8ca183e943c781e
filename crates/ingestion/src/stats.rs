//! Summary statistics over a timestamp-sorted feed.

use chrono::Duration;
use surveillance_core::TimestampMs;

/// Statistics about a sorted feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedStats {
    /// Number of records.
    pub records: usize,
    /// Records sharing their timestamp with the previous record.
    pub duplicate_timestamps: usize,
    /// Earliest timestamp, if any records.
    pub first_ts_ms: Option<TimestampMs>,
    /// Latest timestamp, if any records.
    pub last_ts_ms: Option<TimestampMs>,
}

impl FeedStats {
    /// Compute statistics from timestamps in ascending order.
    pub fn from_sorted<I>(timestamps: I) -> Self
    where
        I: IntoIterator<Item = TimestampMs>,
    {
        let mut stats = FeedStats::default();
        let mut prev: Option<TimestampMs> = None;

        for ts in timestamps {
            stats.records += 1;
            if prev == Some(ts) {
                stats.duplicate_timestamps += 1;
            }
            if stats.first_ts_ms.is_none() {
                stats.first_ts_ms = Some(ts);
            }
            stats.last_ts_ms = Some(ts);
            prev = Some(ts);
        }

        stats
    }

    /// Time covered by the feed.
    pub fn span(&self) -> Duration {
        match (self.first_ts_ms, self.last_ts_ms) {
            (Some(first), Some(last)) => {
                Duration::try_milliseconds(last.saturating_sub(first)).unwrap_or(Duration::MAX)
            }
            _ => Duration::zero(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}
