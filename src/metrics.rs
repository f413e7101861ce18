// Pure metric functions: change between two observations, online ratio,
// activity score/level, and the display formatting the dashboard shows.

use crate::models::{ActivityLevel, ChangeResult, Trend};

/// Message count at which the message component of the activity score saturates.
pub const MESSAGE_SATURATION: f64 = 20.0;
pub const ONLINE_WEIGHT: f64 = 0.7;
pub const MESSAGE_WEIGHT: f64 = 0.3;
pub const HIGH_THRESHOLD: f64 = 50.0;
pub const MEDIUM_THRESHOLD: f64 = 25.0;

/// `current - previous` and the percent change. Absent or zero `previous` yields `(0, 0)`.
pub fn change_of(current: f64, previous: Option<f64>) -> ChangeResult {
    let Some(previous) = previous else {
        return ChangeResult::default();
    };
    if previous == 0.0 {
        return ChangeResult::default();
    }
    let delta = current - previous;
    ChangeResult {
        delta,
        percentage: round1(delta / previous * 100.0),
    }
}

/// Online share in [0, 1]. Zero members gives 0; more online than total is clamped to 1.
pub fn online_ratio(online: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (online as f64 / total as f64).min(1.0)
}

/// Online share in percent, one decimal place.
pub fn ratio_percent(online: u64, total: u64) -> f64 {
    round1(online_ratio(online, total) * 100.0)
}

/// Weighted 0-100 score: 70% online share, 30% message volume (saturating at 20 messages).
/// With zero members the online share is 0; `activity_level` ignores the score in that case.
pub fn activity_score(online: u64, total: u64, messages_per_hour: u64) -> f64 {
    let ratio = online_ratio(online, total);
    let message_score = (messages_per_hour as f64 / MESSAGE_SATURATION).min(1.0);
    (ratio * ONLINE_WEIGHT + message_score * MESSAGE_WEIGHT) * 100.0
}

/// Lower bounds are inclusive: 50.0 is High, 25.0 is Medium.
pub fn classify(score: f64) -> ActivityLevel {
    if score >= HIGH_THRESHOLD {
        ActivityLevel::High
    } else if score >= MEDIUM_THRESHOLD {
        ActivityLevel::Medium
    } else {
        ActivityLevel::Low
    }
}

/// A server with zero members is always Low, whatever the message volume.
pub fn activity_level(online: u64, total: u64, messages_per_hour: u64) -> ActivityLevel {
    if total == 0 {
        return ActivityLevel::Low;
    }
    classify(activity_score(online, total, messages_per_hour))
}

pub fn trend(delta: f64) -> Trend {
    if delta > 0.0 {
        Trend::Positive
    } else if delta < 0.0 {
        Trend::Negative
    } else {
        Trend::Neutral
    }
}

/// "↑ +3 (+1.4%)", "↓ -2 (-5.0%)", "→ 0 (0.0%)".
pub fn change_text(change: &ChangeResult) -> String {
    let (arrow, sign) = match trend(change.delta) {
        Trend::Positive => ('↑', "+"),
        Trend::Negative => ('↓', ""),
        Trend::Neutral => ('→', ""),
    };
    format!(
        "{arrow} {sign}{} ({sign}{:.1}%)",
        format_delta(change.delta),
        change.percentage
    )
}

/// Integer with thousands separators: 1234567 -> "1,234,567".
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_delta(delta: f64) -> String {
    if delta.fract() == 0.0 {
        let whole = delta.abs() as u64;
        let sign = if delta < 0.0 { "-" } else { "" };
        format!("{sign}{}", format_number(whole))
    } else {
        format!("{:.1}", delta)
    }
}

/// Rounds to one decimal place; never returns negative zero.
pub fn round1(x: f64) -> f64 {
    let r = (x * 10.0).round() / 10.0;
    if r == 0.0 { 0.0 } else { r }
}
