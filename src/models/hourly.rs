// Hourly roll-up of raw snapshots

use chrono::{DateTime, Utc};

/// One row per local calendar hour present in the raw sequence.
/// Member counts are rounded means; `messages_per_hour` is the sum for the hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub total_members: u64,
    pub online_members: u64,
    pub messages_per_hour: u64,
    /// Timestamp of the first snapshot (in input order) that fell in this hour.
    pub timestamp: DateTime<Utc>,
    /// Number of raw snapshots folded into this record.
    pub samples: usize,
}
