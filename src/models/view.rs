// Finished dashboard view handed to the presentation layer (HTTP + WS)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ActivityLevel, ChangeResult, Trend};

/// Where the snapshots behind a view came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DataSource {
    Live,
    /// The feed could not be read; built-in sample data was used instead.
    Fallback { reason: String },
}

impl DataSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, DataSource::Fallback { .. })
    }
}

/// A current value with its change against the previous observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub value: f64,
    /// Formatted value (thousands separators, or a percent for ratios).
    pub display: String,
    pub change: ChangeResult,
    /// e.g. "↑ +3 (+1.4%)".
    pub change_text: String,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStats {
    pub total_members: StatCard,
    pub online_members: StatCard,
    pub messages_per_hour: StatCard,
    pub online_ratio: StatCard,
    pub activity_level: ActivityLevel,
}

/// Parallel chart series, one point per hourly record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySeries {
    /// Local "HH:MM" of each record's timestamp.
    pub labels: Vec<String>,
    pub total_members: Vec<u64>,
    pub online_members: Vec<u64>,
    pub messages_per_hour: Vec<u64>,
    /// Online share in percent, one decimal place.
    pub online_ratio: Vec<f64>,
}

/// One row of the recent-history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub timestamp: DateTime<Utc>,
    pub display_time: String,
    pub total_members: String,
    pub online_members: String,
    pub messages_per_hour: String,
    /// e.g. "16.3%".
    pub online_ratio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub data_source: DataSource,
    pub generated_at: DateTime<Utc>,
    pub last_updated: Option<String>,
    pub current: Option<CurrentStats>,
    pub hourly: HourlySeries,
    /// Newest first.
    pub recent: Vec<TableRow>,
    pub snapshot_count: usize,
    pub hour_count: usize,
}
