// Dashboard controller: one update cycle (fetch -> store -> hourly roll-up -> view -> publish)
// and the periodic refresh task that drives it until shutdown.

use chrono::{DateTime, Local, TimeZone, Utc};
use tokio::sync::{broadcast, oneshot, watch};
use tokio::time::{Duration, interval};
use tracing::{debug, info, instrument};

use crate::aggregation;
use crate::feed::SnapshotSource;
use crate::metrics;
use crate::models::{
    CurrentStats, DashboardView, DataSource, HourlyRecord, HourlySeries, Snapshot, StatCard,
    TableRow,
};
use crate::store::SnapshotStore;

const LABEL_FORMAT: &str = "%H:%M";
const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sending halves for the published view: `watch` holds the latest, `broadcast` pushes each one.
#[derive(Clone)]
pub struct ViewPublisher {
    pub latest_tx: watch::Sender<Option<DashboardView>>,
    pub updates_tx: broadcast::Sender<DashboardView>,
}

impl ViewPublisher {
    pub fn new(broadcast_capacity: usize) -> Self {
        let (latest_tx, _) = watch::channel(None);
        let (updates_tx, _) = broadcast::channel(broadcast_capacity);
        Self {
            latest_tx,
            updates_tx,
        }
    }

    pub fn subscribe_latest(&self) -> watch::Receiver<Option<DashboardView>> {
        self.latest_tx.subscribe()
    }

    fn publish(&self, view: &DashboardView) {
        self.latest_tx.send_replace(Some(view.clone()));
        if self.updates_tx.send(view.clone()).is_err() {
            debug!(
                operation = "broadcast_view",
                "No active WebSocket clients; broadcast channel has no receivers"
            );
        }
    }
}

/// Owns the snapshot history and the derived hourly records between cycles.
pub struct DashboardController<S> {
    source: S,
    store: SnapshotStore,
    hourly: Vec<HourlyRecord>,
    recent_window: usize,
    publisher: ViewPublisher,
}

impl<S: SnapshotSource> DashboardController<S> {
    pub fn new(source: S, recent_window: usize, publisher: ViewPublisher) -> Self {
        Self {
            source,
            store: SnapshotStore::new(),
            hourly: Vec::new(),
            recent_window,
            publisher,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn hourly(&self) -> &[HourlyRecord] {
        &self.hourly
    }

    /// Runs one full update cycle and publishes the resulting view.
    #[instrument(skip(self), fields(recent_window = self.recent_window))]
    pub async fn run_cycle(&mut self) -> DashboardView {
        let outcome = self.source.fetch().await;
        self.store.replace(outcome.snapshots);
        self.hourly = aggregation::aggregate(self.store.snapshots());

        let view = build_view(
            &self.store,
            &self.hourly,
            outcome.source,
            Utc::now(),
            self.recent_window,
            &Local,
        );
        self.publisher.publish(&view);
        info!(
            snapshots_count = view.snapshot_count,
            hour_count = view.hour_count,
            activity_level = view
                .current
                .as_ref()
                .map(|c| c.activity_level.as_str())
                .unwrap_or("n/a"),
            fallback = view.data_source.is_fallback(),
            "dashboard updated"
        );
        view
    }
}

/// Spawns the refresh task: one cycle immediately, then one every `refresh_interval`.
/// Cycles never overlap; ticks missed during a slow cycle are skipped. Shutdown also
/// cancels a cycle whose fetch is still in flight, so nothing is published after it.
pub fn spawn<S>(
    mut controller: DashboardController<S>,
    refresh_interval: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()>
where
    S: SnapshotSource + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut tick = interval(refresh_interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    tokio::select! {
                        _ = controller.run_cycle() => {}
                        _ = &mut shutdown_rx => {
                            debug!("Dashboard shutting down; in-flight cycle cancelled");
                            break;
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    debug!("Dashboard shutting down");
                    break;
                }
            }
        }
    })
}

/// Builds the view from the raw store and its hourly roll-up. Changes and the activity
/// level come from the two most recent raw snapshots, not from the hourly records.
pub fn build_view<Tz>(
    store: &SnapshotStore,
    hourly: &[HourlyRecord],
    data_source: DataSource,
    now: DateTime<Utc>,
    recent_window: usize,
    tz: &Tz,
) -> DashboardView
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let current = store
        .latest()
        .map(|latest| current_stats(latest, store.previous()));
    let last_updated = store
        .latest()
        .map(|s| format!("Last updated: {}", local_format(&s.timestamp, tz, DISPLAY_TIME_FORMAT)));

    let recent = store
        .recent_window(recent_window)
        .iter()
        .rev()
        .map(|s| table_row(s, tz))
        .collect();

    DashboardView {
        data_source,
        generated_at: now,
        last_updated,
        current,
        hourly: hourly_series(hourly, tz),
        recent,
        snapshot_count: store.len(),
        hour_count: hourly.len(),
    }
}

fn current_stats(latest: &Snapshot, previous: Option<&Snapshot>) -> CurrentStats {
    let count_card = |field: fn(&Snapshot) -> u64| {
        let value = field(latest);
        let change = metrics::change_of(value as f64, previous.map(|p| field(p) as f64));
        StatCard {
            value: value as f64,
            display: metrics::format_number(value),
            change,
            change_text: metrics::change_text(&change),
            trend: metrics::trend(change.delta),
        }
    };

    let ratio = metrics::ratio_percent(latest.online_members, latest.total_members);
    let previous_ratio = previous.map(|p| metrics::ratio_percent(p.online_members, p.total_members));
    let ratio_change = metrics::change_of(ratio, previous_ratio);

    CurrentStats {
        total_members: count_card(|s| s.total_members),
        online_members: count_card(|s| s.online_members),
        messages_per_hour: count_card(|s| s.messages_per_hour),
        online_ratio: StatCard {
            value: ratio,
            display: format!("{:.1}%", ratio),
            change: ratio_change,
            change_text: metrics::change_text(&ratio_change),
            trend: metrics::trend(ratio_change.delta),
        },
        activity_level: metrics::activity_level(
            latest.online_members,
            latest.total_members,
            latest.messages_per_hour,
        ),
    }
}

fn hourly_series<Tz>(hourly: &[HourlyRecord], tz: &Tz) -> HourlySeries
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    HourlySeries {
        labels: hourly
            .iter()
            .map(|r| local_format(&r.timestamp, tz, LABEL_FORMAT))
            .collect(),
        total_members: hourly.iter().map(|r| r.total_members).collect(),
        online_members: hourly.iter().map(|r| r.online_members).collect(),
        messages_per_hour: hourly.iter().map(|r| r.messages_per_hour).collect(),
        online_ratio: hourly
            .iter()
            .map(|r| metrics::ratio_percent(r.online_members, r.total_members))
            .collect(),
    }
}

fn table_row<Tz>(s: &Snapshot, tz: &Tz) -> TableRow
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    TableRow {
        timestamp: s.timestamp,
        display_time: local_format(&s.timestamp, tz, DISPLAY_TIME_FORMAT),
        total_members: metrics::format_number(s.total_members),
        online_members: metrics::format_number(s.online_members),
        messages_per_hour: metrics::format_number(s.messages_per_hour),
        online_ratio: format!(
            "{:.1}%",
            metrics::ratio_percent(s.online_members, s.total_members)
        ),
    }
}

fn local_format<Tz>(ts: &DateTime<Utc>, tz: &Tz, fmt: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format(fmt).to_string()
}
