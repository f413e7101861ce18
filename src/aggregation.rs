// Hourly roll-up: group raw snapshots by local calendar hour.
// Member counts are averaged (rounded half away from zero); message counts are summed.
//
// Each raw `messages_per_hour` value is treated as the count for its short sampling
// interval, so summing gives the hour's volume. If the producer ever switches to
// reporting a true hourly rate, this should average instead.

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Timelike, Utc};

use crate::models::{HourlyRecord, Snapshot};

/// Bucket key: local calendar date and hour.
type HourKey = (NaiveDate, u32);

/// Aggregates in the host's local time zone.
pub fn aggregate(snapshots: &[Snapshot]) -> Vec<HourlyRecord> {
    aggregate_in(snapshots, &Local)
}

/// Aggregates with hour boundaries taken in `tz`. Output is sorted ascending by
/// representative timestamp; ties keep group creation order.
pub fn aggregate_in<Tz: TimeZone>(snapshots: &[Snapshot], tz: &Tz) -> Vec<HourlyRecord> {
    if snapshots.is_empty() {
        return Vec::new();
    }

    let mut index_by_key: HashMap<HourKey, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Snapshot>> = Vec::new();
    for s in snapshots {
        let key = hour_key(&s.timestamp, tz);
        let idx = *index_by_key.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[idx].push(s);
    }

    let mut out: Vec<HourlyRecord> = groups.iter().map(|g| aggregate_one_hour(g)).collect();
    out.sort_by_key(|r| r.timestamp);
    out
}

fn hour_key<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> HourKey {
    let local = ts.with_timezone(tz).naive_local();
    (local.date(), local.hour())
}

fn aggregate_one_hour(refs: &[&Snapshot]) -> HourlyRecord {
    let first = refs[0];
    let total_members = mean_rounded(&refs.iter().map(|s| s.total_members).collect::<Vec<_>>());
    let online_members = mean_rounded(&refs.iter().map(|s| s.online_members).collect::<Vec<_>>());
    let messages_per_hour: u64 = refs.iter().map(|s| s.messages_per_hour).sum();

    HourlyRecord {
        total_members,
        online_members,
        messages_per_hour,
        timestamp: first.timestamp,
        samples: refs.len(),
    }
}

/// Arithmetic mean rounded half away from zero (34.5 -> 35).
fn mean_rounded(v: &[u64]) -> u64 {
    if v.is_empty() {
        return 0;
    }
    let sum: u128 = v.iter().map(|&x| x as u128).sum();
    (sum as f64 / v.len() as f64).round() as u64
}
