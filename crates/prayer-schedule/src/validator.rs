//! Live, read-only checks against the current instant.
//!
//! Callers poll these; nothing is cached across prayer-window boundaries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SchedulingConfig;
use crate::conflict::in_any_window;
use crate::model::{PrayerName, PrayerWindow};

/// Whether taking medication at `now` falls inside a buffered prayer window.
///
/// Always `false` when scheduling around prayers is disabled.
pub fn is_conflicting_now(
    windows: &[PrayerWindow],
    config: &SchedulingConfig,
    now: DateTime<Utc>,
) -> bool {
    config.enabled && in_any_window(now, windows, config.buffer())
}

/// The next prayer to start after a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingPrayer {
    pub name: PrayerName,
    pub starts_at: DateTime<Utc>,
    pub minutes_until: i64,
}

/// Snapshot of where `now` sits relative to the day's prayers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerStatus {
    /// The prayer whose unexpanded window contains `now`.
    pub current_prayer: Option<PrayerName>,
    pub next_prayer: Option<UpcomingPrayer>,
    pub is_prayer_time: bool,
    /// Same answer as [`is_conflicting_now`].
    pub avoid_medication: bool,
}

/// Describe the current and upcoming prayer for a dosing screen.
pub fn prayer_status(
    windows: &[PrayerWindow],
    config: &SchedulingConfig,
    now: DateTime<Utc>,
) -> PrayerStatus {
    let current_prayer = windows.iter().find(|w| w.contains(now)).map(|w| w.name());
    let next_prayer = windows
        .iter()
        .filter(|w| w.start() > now)
        .min_by_key(|w| w.start())
        .map(|w| UpcomingPrayer {
            name: w.name(),
            starts_at: w.start(),
            minutes_until: (w.start() - now).num_minutes(),
        });

    PrayerStatus {
        current_prayer,
        next_prayer,
        is_prayer_time: current_prayer.is_some(),
        avoid_medication: is_conflicting_now(windows, config, now),
    }
}
