// Domain models: feed snapshots, hourly roll-ups, derived metrics, dashboard view

mod hourly;
mod metrics;
mod snapshot;
mod view;

pub use hourly::HourlyRecord;
pub use metrics::{ActivityLevel, ChangeResult, Trend};
pub use snapshot::{FeedDocument, FeedEntry, Snapshot};
pub use view::{CurrentStats, DashboardView, DataSource, HourlySeries, StatCard, TableRow};
