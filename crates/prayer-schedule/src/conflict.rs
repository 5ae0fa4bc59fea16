//! Detect doses that fall inside buffered prayer windows.
//!
//! A dose conflicts with a window when its time lies in
//! `[start - buffer, end + buffer]`, both bounds inclusive. Severity depends
//! on how far the dose is from the unexpanded window:
//!
//! | distance to window        | severity |
//! |---------------------------|----------|
//! | inside (`0`)              | High     |
//! | `0 < d <= buffer / 2`     | Medium   |
//! | `buffer / 2 < d <= buffer`| Low      |

use chrono::{DateTime, Duration, Utc};

use crate::config::SchedulingConfig;
use crate::model::{Conflict, DoseIntent, PrayerWindow, Severity};

/// Find every conflicting dose, in input order.
///
/// Doses without a conflict are omitted. Every returned conflict has
/// `suggested_alternative == None`; resolution is the optimizer's job.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use prayer_schedule::{detect_conflicts, DoseIntent, PrayerName, PrayerWindow, SchedulingConfig, Severity};
///
/// let at = |h, m| Utc.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap();
/// let fajr = PrayerWindow::new(PrayerName::Fajr, at(5, 45), at(6, 15)).unwrap();
/// let doses = [DoseIntent::new(0, at(6, 0)), DoseIntent::new(1, at(9, 0))];
///
/// let conflicts = detect_conflicts(&doses, &[fajr], &SchedulingConfig::default());
/// assert_eq!(conflicts.len(), 1);
/// assert_eq!(conflicts[0].severity, Severity::High);
/// ```
pub fn detect_conflicts(
    doses: &[DoseIntent],
    windows: &[PrayerWindow],
    config: &SchedulingConfig,
) -> Vec<Conflict> {
    doses
        .iter()
        .filter_map(|dose| detect_conflict(dose, windows, config))
        .collect()
}

/// Conflict for a single dose, if any.
pub fn detect_conflict(
    dose: &DoseIntent,
    windows: &[PrayerWindow],
    config: &SchedulingConfig,
) -> Option<Conflict> {
    let buffer = config.buffer();
    let window = attributed_window(dose.original_time, windows, buffer)?;

    Some(Conflict {
        ordinal: dose.ordinal,
        time: dose.original_time,
        prayer_name: window.name(),
        severity: classify(window.distance_to(dose.original_time), buffer),
        suggested_alternative: None,
    })
}

/// Whether `t` lies in any buffered window.
pub fn in_any_window(t: DateTime<Utc>, windows: &[PrayerWindow], buffer: Duration) -> bool {
    windows.iter().any(|w| w.contains_expanded(t, buffer))
}

/// Pick the window a time is attributed to when buffers overlap: the one
/// whose unexpanded midpoint is closest. Exact ties go to the earlier window
/// in the list.
pub(crate) fn attributed_window(
    t: DateTime<Utc>,
    windows: &[PrayerWindow],
    buffer: Duration,
) -> Option<&PrayerWindow> {
    windows
        .iter()
        .filter(|w| w.contains_expanded(t, buffer))
        .min_by_key(|w| (w.midpoint() - t).abs())
}

fn classify(distance: Duration, buffer: Duration) -> Severity {
    if distance.is_zero() {
        Severity::High
    } else {
        match distance.checked_mul(2) {
            Some(twice) if twice <= buffer => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrayerName;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap()
    }

    fn fajr() -> PrayerWindow {
        PrayerWindow::new(PrayerName::Fajr, at(5, 45), at(6, 15)).unwrap()
    }

    fn severity_at(h: u32, m: u32) -> Option<Severity> {
        detect_conflict(
            &DoseIntent::new(0, at(h, m)),
            &[fajr()],
            &SchedulingConfig::default(),
        )
        .map(|c| c.severity)
    }

    // ── severity bands ──────────────────────────────────────────────────

    #[test]
    fn test_inside_window_is_high() {
        assert_eq!(severity_at(6, 0), Some(Severity::High));
    }

    #[test]
    fn test_unexpanded_boundaries_are_high() {
        assert_eq!(severity_at(5, 45), Some(Severity::High));
        assert_eq!(severity_at(6, 15), Some(Severity::High));
    }

    #[test]
    fn test_inner_half_of_buffer_is_medium() {
        assert_eq!(severity_at(5, 44), Some(Severity::Medium));
        assert_eq!(severity_at(5, 30), Some(Severity::Medium));
        assert_eq!(severity_at(6, 30), Some(Severity::Medium));
    }

    #[test]
    fn test_outer_half_of_buffer_is_low() {
        assert_eq!(severity_at(5, 29), Some(Severity::Low));
        assert_eq!(severity_at(5, 20), Some(Severity::Low));
        assert_eq!(severity_at(5, 15), Some(Severity::Low));
        assert_eq!(severity_at(6, 45), Some(Severity::Low));
    }

    #[test]
    fn test_outside_buffer_is_not_a_conflict() {
        assert_eq!(severity_at(5, 14), None);
        assert_eq!(severity_at(6, 46), None);
    }

    #[test]
    fn test_zero_buffer_only_flags_inside() {
        let config = SchedulingConfig {
            buffer_minutes: 0,
            ..Default::default()
        };
        let inside = detect_conflict(&DoseIntent::new(0, at(5, 45)), &[fajr()], &config);
        assert_eq!(inside.map(|c| c.severity), Some(Severity::High));
        let outside = detect_conflict(&DoseIntent::new(0, at(5, 44)), &[fajr()], &config);
        assert!(outside.is_none());
    }

    // ── attribution ─────────────────────────────────────────────────────

    #[test]
    fn test_overlapping_buffers_attribute_to_nearest_midpoint() {
        let maghrib = PrayerWindow::new(PrayerName::Maghrib, at(19, 0), at(19, 20)).unwrap();
        let isha = PrayerWindow::new(PrayerName::Isha, at(19, 50), at(20, 30)).unwrap();
        let windows = [maghrib, isha];

        // 19:38 is in both buffers; Maghrib midpoint 19:10 (28m), Isha 20:10 (32m).
        let c = detect_conflict(
            &DoseIntent::new(0, at(19, 38)),
            &windows,
            &SchedulingConfig::default(),
        )
        .unwrap();
        assert_eq!(c.prayer_name, PrayerName::Maghrib);
        assert_eq!(c.severity, Severity::Low);

        // 19:45: Maghrib 35m, Isha 25m.
        let c = detect_conflict(
            &DoseIntent::new(0, at(19, 45)),
            &windows,
            &SchedulingConfig::default(),
        )
        .unwrap();
        assert_eq!(c.prayer_name, PrayerName::Isha);
        assert_eq!(c.severity, Severity::Medium);
    }

    #[test]
    fn test_midpoint_tie_goes_to_earlier_window() {
        let maghrib = PrayerWindow::new(PrayerName::Maghrib, at(19, 0), at(19, 20)).unwrap();
        let isha = PrayerWindow::new(PrayerName::Isha, at(19, 40), at(20, 0)).unwrap();
        // Midpoints 19:10 and 19:50, dose at 19:30.
        let c = detect_conflict(
            &DoseIntent::new(0, at(19, 30)),
            &[maghrib, isha],
            &SchedulingConfig::default(),
        )
        .unwrap();
        assert_eq!(c.prayer_name, PrayerName::Maghrib);
    }

    // ── detect_conflicts ────────────────────────────────────────────────

    #[test]
    fn test_detect_conflicts_preserves_order_and_omits_clear_doses() {
        let asr = PrayerWindow::new(PrayerName::Asr, at(16, 30), at(17, 0)).unwrap();
        let doses = [
            DoseIntent::new(0, at(6, 10)),
            DoseIntent::new(1, at(12, 0)),
            DoseIntent::new(2, at(16, 10)),
        ];
        let conflicts = detect_conflicts(&doses, &[fajr(), asr], &SchedulingConfig::default());
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].ordinal, 0);
        assert_eq!(conflicts[0].prayer_name, PrayerName::Fajr);
        assert_eq!(conflicts[1].ordinal, 2);
        assert_eq!(conflicts[1].prayer_name, PrayerName::Asr);
        assert_eq!(conflicts[1].severity, Severity::Low);
        assert!(conflicts.iter().all(|c| c.suggested_alternative.is_none()));
    }

    #[test]
    fn test_in_any_window() {
        let buffer = Duration::minutes(30);
        assert!(in_any_window(at(5, 15), &[fajr()], buffer));
        assert!(!in_any_window(at(5, 0), &[fajr()], buffer));
        assert!(!in_any_window(at(5, 0), &[], buffer));
    }
}
