//! Structural checks on dose lists and prayer windows.
//!
//! These run before any computation so that a malformed call fails loudly
//! with [`ScheduleError::InvalidInput`] and produces no partial result.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::model::{DoseIntent, PrayerWindow};

/// Number of windows a day's timetable must carry.
pub const WINDOWS_PER_DAY: usize = 5;

/// Calendar years accepted for doses and windows. Buffer and search
/// arithmetic near the ends of `DateTime`'s range would overflow.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9999;

/// Reject duplicate ordinals and dose lists that are not strictly increasing
/// in both ordinal and time.
pub fn validate_doses(doses: &[DoseIntent]) -> Result<()> {
    let mut seen = HashSet::with_capacity(doses.len());
    for dose in doses {
        check_instant(&format!("dose #{}", dose.ordinal), dose.original_time)?;
        if !seen.insert(dose.ordinal) {
            return Err(reject(format!("duplicate dose ordinal {}", dose.ordinal)));
        }
    }

    for pair in doses.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.ordinal <= prev.ordinal {
            return Err(reject(format!(
                "dose ordinals must increase: {} follows {}",
                next.ordinal, prev.ordinal
            )));
        }
        if next.original_time <= prev.original_time {
            return Err(reject(format!(
                "dose #{} at {} is not after dose #{} at {}",
                next.ordinal,
                next.original_time.to_rfc3339(),
                prev.ordinal,
                prev.original_time.to_rfc3339()
            )));
        }
    }
    Ok(())
}

/// Require exactly one window per prayer, ordered by start, with no overlap.
/// Windows that merely touch are accepted.
pub fn validate_windows(windows: &[PrayerWindow]) -> Result<()> {
    if windows.len() != WINDOWS_PER_DAY {
        return Err(reject(format!(
            "expected {WINDOWS_PER_DAY} prayer windows, got {}",
            windows.len()
        )));
    }

    let mut names = HashSet::with_capacity(WINDOWS_PER_DAY);
    for window in windows {
        check_instant(&format!("{} window start", window.name()), window.start())?;
        check_instant(&format!("{} window end", window.name()), window.end())?;
        if !names.insert(window.name()) {
            return Err(reject(format!("duplicate {} window", window.name())));
        }
    }

    for pair in windows.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.start() < prev.start() {
            return Err(reject(format!(
                "{} window starts before {}; windows must be ordered by start",
                next.name(),
                prev.name()
            )));
        }
        if next.start() < prev.end() {
            return Err(reject(format!(
                "{} and {} windows overlap",
                prev.name(),
                next.name()
            )));
        }
    }
    Ok(())
}

fn check_instant(what: &str, t: DateTime<Utc>) -> Result<()> {
    if SUPPORTED_YEARS.contains(&t.year()) {
        Ok(())
    } else {
        Err(reject(format!(
            "{what} is in year {}, outside the supported range {}..={}",
            t.year(),
            SUPPORTED_YEARS.start(),
            SUPPORTED_YEARS.end()
        )))
    }
}

fn reject(message: String) -> ScheduleError {
    debug!(%message, "rejecting schedule input");
    ScheduleError::InvalidInput(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrayerName;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap()
    }

    fn window(name: PrayerName, start: (u32, u32), end: (u32, u32)) -> PrayerWindow {
        PrayerWindow::new(name, at(start.0, start.1), at(end.0, end.1)).unwrap()
    }

    fn day() -> Vec<PrayerWindow> {
        vec![
            window(PrayerName::Fajr, (5, 45), (6, 15)),
            window(PrayerName::Dhuhr, (13, 10), (13, 40)),
            window(PrayerName::Asr, (16, 30), (17, 0)),
            window(PrayerName::Maghrib, (19, 20), (19, 45)),
            window(PrayerName::Isha, (20, 30), (21, 0)),
        ]
    }

    // ── validate_doses ──────────────────────────────────────────────────

    #[test]
    fn test_doses_empty_is_valid() {
        assert!(validate_doses(&[]).is_ok());
    }

    #[test]
    fn test_doses_increasing_is_valid() {
        let doses = [
            DoseIntent::new(0, at(8, 0)),
            DoseIntent::new(1, at(14, 0)),
            DoseIntent::new(2, at(22, 0)),
        ];
        assert!(validate_doses(&doses).is_ok());
    }

    #[test]
    fn test_doses_duplicate_ordinal() {
        let doses = [DoseIntent::new(0, at(8, 0)), DoseIntent::new(0, at(14, 0))];
        let err = validate_doses(&doses).unwrap_err();
        assert!(err.to_string().contains("duplicate dose ordinal 0"), "got: {err}");
    }

    #[test]
    fn test_doses_decreasing_ordinal() {
        let doses = [DoseIntent::new(2, at(8, 0)), DoseIntent::new(1, at(14, 0))];
        assert!(matches!(
            validate_doses(&doses),
            Err(ScheduleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_doses_time_not_increasing() {
        let same = [DoseIntent::new(0, at(8, 0)), DoseIntent::new(1, at(8, 0))];
        assert!(validate_doses(&same).is_err());

        let backwards = [DoseIntent::new(0, at(9, 0)), DoseIntent::new(1, at(8, 0))];
        assert!(validate_doses(&backwards).is_err());
    }

    #[test]
    fn test_doses_near_end_of_time_rejected() {
        let last = DateTime::<Utc>::MAX_UTC;
        let doses = [DoseIntent::new(0, last - chrono::Duration::minutes(1))];
        let err = validate_doses(&doses).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidInput(_)), "got: {err}");
        assert!(err.to_string().contains("dose #0"), "got: {err}");

        let first = [DoseIntent::new(0, DateTime::<Utc>::MIN_UTC)];
        assert!(validate_doses(&first).is_err());
    }

    // ── validate_windows ────────────────────────────────────────────────

    #[test]
    fn test_windows_full_day_is_valid() {
        assert!(validate_windows(&day()).is_ok());
    }

    #[test]
    fn test_windows_wrong_count() {
        let mut windows = day();
        windows.pop();
        let err = validate_windows(&windows).unwrap_err();
        assert!(err.to_string().contains("expected 5"), "got: {err}");
        assert!(validate_windows(&[]).is_err());
    }

    #[test]
    fn test_windows_duplicate_name() {
        let mut windows = day();
        windows[4] = window(PrayerName::Maghrib, (20, 30), (21, 0));
        let err = validate_windows(&windows).unwrap_err();
        assert!(err.to_string().contains("duplicate Maghrib"), "got: {err}");
    }

    #[test]
    fn test_windows_out_of_order() {
        let mut windows = day();
        windows.swap(1, 2);
        assert!(validate_windows(&windows).is_err());
    }

    #[test]
    fn test_windows_overlap() {
        let mut windows = day();
        windows[4] = window(PrayerName::Isha, (19, 40), (20, 10));
        let err = validate_windows(&windows).unwrap_err();
        assert!(err.to_string().contains("overlap"), "got: {err}");
    }

    #[test]
    fn test_windows_outside_supported_years() {
        let mut windows = day();
        let start = Utc.with_ymd_and_hms(10000, 1, 1, 20, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(10000, 1, 1, 21, 0, 0).unwrap();
        windows[4] = PrayerWindow::new(PrayerName::Isha, start, end).unwrap();
        let err = validate_windows(&windows).unwrap_err();
        assert!(err.to_string().contains("Isha window start"), "got: {err}");
    }

    #[test]
    fn test_windows_touching_is_valid() {
        let mut windows = day();
        windows[4] = window(PrayerName::Isha, (19, 45), (20, 15));
        assert!(validate_windows(&windows).is_ok());
    }
}
