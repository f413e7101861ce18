// Shared test helpers
#![allow(dead_code)]

use std::future::Future;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use statboard::feed::{FetchOutcome, SnapshotSource};
use statboard::models::{DataSource, Snapshot};

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

pub fn snapshot(timestamp: DateTime<Utc>, total: u64, online: u64, messages: u64) -> Snapshot {
    Snapshot {
        total_members: total,
        online_members: online,
        messages_per_hour: messages,
        timestamp,
    }
}

/// Returns the same snapshots on every fetch and counts calls.
pub struct FixedSource {
    pub snapshots: Vec<Snapshot>,
    pub source: DataSource,
    pub calls: Arc<AtomicUsize>,
}

impl FixedSource {
    pub fn live(snapshots: Vec<Snapshot>) -> Self {
        Self {
            snapshots,
            source: DataSource::Live,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl SnapshotSource for FixedSource {
    fn fetch(&self) -> impl Future<Output = FetchOutcome> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = FetchOutcome {
            snapshots: self.snapshots.clone(),
            source: self.source.clone(),
        };
        async move { outcome }
    }
}

/// A fetch that never completes.
pub struct PendingSource;

impl SnapshotSource for PendingSource {
    fn fetch(&self) -> impl Future<Output = FetchOutcome> + Send {
        std::future::pending()
    }
}

/// First fetch takes `first_delay`, later ones return at once. Records when each
/// fetch started and the most fetches ever in flight together.
pub struct SlowFirstSource {
    pub first_delay: tokio::time::Duration,
    pub calls: Arc<AtomicUsize>,
    pub starts: Arc<Mutex<Vec<tokio::time::Instant>>>,
    pub in_flight: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
}

impl SlowFirstSource {
    pub fn new(first_delay: tokio::time::Duration) -> Self {
        Self {
            first_delay,
            calls: Arc::new(AtomicUsize::new(0)),
            starts: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl SnapshotSource for SlowFirstSource {
    fn fetch(&self) -> impl Future<Output = FetchOutcome> + Send {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = if call == 0 {
            self.first_delay
        } else {
            tokio::time::Duration::ZERO
        };
        let starts = self.starts.clone();
        let in_flight = self.in_flight.clone();
        let max_in_flight = self.max_in_flight.clone();
        async move {
            starts.lock().unwrap().push(tokio::time::Instant::now());
            let now_in_flight = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            FetchOutcome {
                snapshots: Vec::new(),
                source: DataSource::Live,
            }
        }
    }
}

/// Serves `router` on an ephemeral localhost port; returns its base URL.
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
