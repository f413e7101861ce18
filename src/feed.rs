// Feed client: fetch the stats JSON, parse it permissively, fall back to sample data on failure.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use tracing::{debug, info, instrument, warn};

use crate::config::FeedConfig;
use crate::models::{DataSource, FeedDocument, FeedEntry, Snapshot};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("feed returned HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed feed document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Snapshots from one fetch and where they came from.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub snapshots: Vec<Snapshot>,
    pub source: DataSource,
}

/// Anything the dashboard can pull a fresh snapshot history from.
pub trait SnapshotSource {
    /// Never fails: sources recover locally and report how in `FetchOutcome::source`.
    fn fetch(&self) -> impl Future<Output = FetchOutcome> + Send;
}

pub struct FeedClient {
    client: reqwest::Client,
    url: String,
}

impl FeedClient {
    pub fn new(config: &FeedConfig) -> anyhow::Result<Self> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.request_timeout_secs));
        if let Some(ref ua) = config.user_agent {
            builder = builder.user_agent(ua.as_str());
        }
        Ok(Self {
            client: builder.build()?,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET `<url>?t=<unix-ms>`; the timestamp defeats intermediary caches.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn try_fetch(&self) -> Result<Vec<Snapshot>, FeedError> {
        let cache_buster = Utc::now().timestamp_millis();
        let response = self
            .client
            .get(&self.url)
            .query(&[("t", cache_buster)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }
        let body = response.text().await?;
        let snapshots = parse_feed(&body, &Local)?;
        debug!(
            operation = "fetch_feed",
            snapshots_count = snapshots.len(),
            "feed fetched"
        );
        Ok(snapshots)
    }

    /// Fetches the feed; on any failure logs it and returns the built-in sample data.
    pub async fn fetch_or_fallback(&self) -> FetchOutcome {
        match self.try_fetch().await {
            Ok(snapshots) => {
                info!(snapshots_count = snapshots.len(), "loaded feed data points");
                FetchOutcome {
                    snapshots,
                    source: DataSource::Live,
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    operation = "fetch_feed",
                    url = %self.url,
                    "feed unavailable; using sample data"
                );
                FetchOutcome {
                    snapshots: sample_snapshots(Utc::now()),
                    source: DataSource::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }
}

impl SnapshotSource for FeedClient {
    fn fetch(&self) -> impl Future<Output = FetchOutcome> + Send {
        self.fetch_or_fallback()
    }
}

/// Parses a feed body. A body that is not a JSON object is an error; a missing or null
/// `stats` field is an empty history; individually malformed entries are skipped.
pub fn parse_feed<Tz: TimeZone>(body: &str, tz: &Tz) -> Result<Vec<Snapshot>, FeedError> {
    let doc: FeedDocument = serde_json::from_str(body)?;
    let Some(entries) = doc.stats else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(entries.len());
    for (index, value) in entries.into_iter().enumerate() {
        let entry: FeedEntry = match serde_json::from_value(value) {
            Ok(e) => e,
            Err(e) => {
                warn!(index, error = %e, operation = "parse_feed", "skipping malformed feed entry");
                continue;
            }
        };
        let Some(timestamp) = parse_timestamp(&entry.timestamp, tz) else {
            warn!(
                index,
                timestamp = %entry.timestamp,
                operation = "parse_feed",
                "skipping feed entry with invalid timestamp"
            );
            continue;
        };
        let snapshot = Snapshot {
            total_members: entry.total_members,
            online_members: entry.online_members,
            messages_per_hour: entry.messages_per_hour,
            timestamp,
        };
        if snapshot.online_exceeds_total() {
            warn!(
                index,
                online_members = snapshot.online_members,
                total_members = snapshot.total_members,
                "feed entry reports more members online than total; ratio will be clamped"
            );
        }
        out.push(snapshot);
    }
    Ok(out)
}

/// RFC 3339 with an offset, or a naive ISO-8601 timestamp read as local time in `tz`.
pub fn parse_timestamp<Tz: TimeZone>(s: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive: NaiveDateTime = s.parse().ok()?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Three sample points ending at `now`, five minutes apart.
pub fn sample_snapshots(now: DateTime<Utc>) -> Vec<Snapshot> {
    let point = |minutes_ago: i64, online: u64, messages: u64| Snapshot {
        total_members: 215,
        online_members: online,
        messages_per_hour: messages,
        timestamp: now - chrono::Duration::minutes(minutes_ago),
    };
    vec![point(10, 35, 12), point(5, 34, 8), point(0, 35, 15)]
}
