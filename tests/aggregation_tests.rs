// Hourly roll-up tests: grouping, means, sums, ordering, representative timestamps

mod common;

use chrono::{FixedOffset, Utc};
use common::{snapshot, utc};
use statboard::aggregation::aggregate_in;
use statboard::models::Snapshot;

#[test]
fn aggregate_empty_returns_empty() {
    let snapshots: Vec<Snapshot> = vec![];
    assert!(aggregate_in(&snapshots, &Utc).is_empty());
    assert!(statboard::aggregation::aggregate(&snapshots).is_empty());
}

#[test]
fn aggregate_same_hour_averages_members_and_sums_messages() {
    let snapshots = vec![
        snapshot(utc(2025, 6, 1, 12, 5), 215, 35, 12),
        snapshot(utc(2025, 6, 1, 12, 10), 215, 34, 8),
        snapshot(utc(2025, 6, 1, 12, 15), 215, 35, 15),
    ];
    let out = aggregate_in(&snapshots, &Utc);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].total_members, 215);
    assert_eq!(out[0].online_members, 35);
    assert_eq!(out[0].messages_per_hour, 35);
    assert_eq!(out[0].timestamp, utc(2025, 6, 1, 12, 5));
    assert_eq!(out[0].samples, 3);
}

#[test]
fn aggregate_single_snapshot() {
    let snapshots = vec![snapshot(utc(2025, 6, 1, 9, 30), 100, 10, 4)];
    let out = aggregate_in(&snapshots, &Utc);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].total_members, 100);
    assert_eq!(out[0].online_members, 10);
    assert_eq!(out[0].messages_per_hour, 4);
    assert_eq!(out[0].samples, 1);
}

#[test]
fn aggregate_rounds_half_away_from_zero() {
    let snapshots = vec![
        snapshot(utc(2025, 6, 1, 12, 0), 201, 34, 0),
        snapshot(utc(2025, 6, 1, 12, 30), 200, 35, 0),
    ];
    let out = aggregate_in(&snapshots, &Utc);
    assert_eq!(out[0].online_members, 35);
    assert_eq!(out[0].total_members, 201);
}

#[test]
fn aggregate_sorts_hours_for_unordered_input() {
    let snapshots = vec![
        snapshot(utc(2025, 6, 1, 14, 10), 100, 10, 1),
        snapshot(utc(2025, 6, 1, 12, 5), 100, 10, 2),
        snapshot(utc(2025, 6, 1, 13, 0), 100, 10, 3),
        snapshot(utc(2025, 6, 1, 12, 50), 100, 10, 4),
    ];
    let out = aggregate_in(&snapshots, &Utc);
    let stamps: Vec<_> = out.iter().map(|r| r.timestamp).collect();
    assert_eq!(
        stamps,
        vec![
            utc(2025, 6, 1, 12, 5),
            utc(2025, 6, 1, 13, 0),
            utc(2025, 6, 1, 14, 10)
        ]
    );
    assert_eq!(out[0].messages_per_hour, 6);
    assert_eq!(out[0].samples, 2);
}

#[test]
fn aggregate_representative_is_first_in_input_order() {
    let snapshots = vec![
        snapshot(utc(2025, 6, 1, 12, 40), 100, 10, 1),
        snapshot(utc(2025, 6, 1, 12, 10), 100, 10, 1),
    ];
    let out = aggregate_in(&snapshots, &Utc);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].timestamp, utc(2025, 6, 1, 12, 40));
}

#[test]
fn aggregate_separates_same_hour_on_different_days() {
    let snapshots = vec![
        snapshot(utc(2025, 6, 1, 12, 0), 100, 10, 1),
        snapshot(utc(2025, 6, 2, 12, 0), 100, 10, 1),
    ];
    assert_eq!(aggregate_in(&snapshots, &Utc).len(), 2);
}

#[test]
fn aggregate_buckets_by_hour_in_given_time_zone() {
    let snapshots = vec![
        snapshot(utc(2025, 6, 1, 11, 50), 100, 10, 1),
        snapshot(utc(2025, 6, 1, 12, 10), 100, 10, 1),
    ];
    let plus_one = FixedOffset::east_opt(3600).unwrap();
    assert_eq!(aggregate_in(&snapshots, &plus_one).len(), 2);

    // 12:20 and 12:40 local: one hour
    let plus_half_hour = FixedOffset::east_opt(1800).unwrap();
    assert_eq!(aggregate_in(&snapshots, &plus_half_hour).len(), 1);
}

#[test]
fn aggregate_conserves_message_total_and_sorts() {
    let mut snapshots = Vec::new();
    for i in 0..200u32 {
        // scrambled minutes over ~two days
        let minute_of_run = (i * 37) % (48 * 60);
        let ts = utc(2025, 6, 1, 0, 0) + chrono::Duration::minutes(minute_of_run as i64);
        snapshots.push(snapshot(ts, 500, (i % 50) as u64, (i % 13) as u64));
    }
    let raw_total: u64 = snapshots.iter().map(|s| s.messages_per_hour).sum();

    let out = aggregate_in(&snapshots, &Utc);
    let hourly_total: u64 = out.iter().map(|r| r.messages_per_hour).sum();
    assert_eq!(hourly_total, raw_total);
    assert!(out.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(out.iter().map(|r| r.samples).sum::<usize>(), 200);
}

#[test]
fn aggregate_tolerates_online_above_total() {
    let snapshots = vec![snapshot(utc(2025, 6, 1, 12, 0), 10, 50, 1)];
    let out = aggregate_in(&snapshots, &Utc);
    assert_eq!(out[0].online_members, 50);
    assert_eq!(out[0].total_members, 10);
}
