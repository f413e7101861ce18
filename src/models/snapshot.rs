// Raw feed snapshot and the feed document it arrives in

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw observation from the feed. Field names match the feed's wire format.
///
/// `messages_per_hour` is the message count for the sampling interval that ended at
/// `timestamp` (the producer samples every few minutes), not an hourly rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub total_members: u64,
    pub online_members: u64,
    pub messages_per_hour: u64,
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    /// True when the feed reports more members online than in the server.
    pub fn online_exceeds_total(&self) -> bool {
        self.online_members > self.total_members
    }
}

/// One `stats` entry as written by the producer, before timestamp parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    pub total_members: u64,
    pub online_members: u64,
    pub messages_per_hour: u64,
    pub timestamp: String,
}

/// Top-level feed document. `stats` missing or null means no data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedDocument {
    #[serde(default)]
    pub stats: Option<Vec<serde_json::Value>>,
}
