//! Human-readable cultural notes derived from detected conflicts.
//!
//! Notes are advisory text for the review screen. They are computed from
//! the conflicts and the active [`SchedulingConfig`] and never feed back into
//! the numeric schedule.

use std::collections::BTreeSet;

use crate::config::SchedulingConfig;
use crate::model::{PrayerName, ScheduleOptimizationResult};

/// Build the cultural notes for an optimization result.
///
/// Ramadan anchoring notes come first (Suhoor before Iftar), followed by one
/// madhab disclosure per affected prayer, in daily prayer order.
pub fn annotate(result: &ScheduleOptimizationResult, config: &SchedulingConfig) -> Vec<String> {
    let touched: BTreeSet<PrayerName> = result.conflicts.iter().map(|c| c.prayer_name).collect();
    let mut notes = Vec::new();

    if config.ramadan_mode {
        if touched.contains(&PrayerName::Fajr) {
            notes.push(
                "Ramadan: consider anchoring doses to Suhoor, just before Fajr, \
                 instead of moving them around the prayer buffer."
                    .to_string(),
            );
        }
        if touched.contains(&PrayerName::Maghrib) {
            notes.push(
                "Ramadan: consider anchoring doses to Iftar, just after Maghrib, \
                 instead of moving them around the prayer buffer."
                    .to_string(),
            );
        }
    }

    for prayer in touched
        .iter()
        .copied()
        .filter(|p| config.madhab.affects(*p))
    {
        notes.push(format!(
            "{prayer} times follow the {} method; suggested times may differ \
             from apps using another method.",
            config.madhab
        ));
    }

    notes
}
