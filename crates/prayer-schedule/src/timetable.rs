//! Prayer window providers.
//!
//! Prayer times are computed elsewhere (an astronomical service keyed by
//! date, location and madhab). [`PrayerWindowProvider`] is the seam the
//! optimizer's callers use to obtain a day's windows; [`FixedTimetable`]
//! serves a published local timetable such as a mosque's printed schedule.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::{Result, ScheduleError};
use crate::model::{PrayerName, PrayerWindow};

/// Default length of the worship window after each prayer time.
pub const DEFAULT_PRAYER_MINUTES: i64 = 20;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Source of the five prayer windows for a calendar date.
pub trait PrayerWindowProvider {
    fn prayer_windows(&self, date: NaiveDate) -> Result<Vec<PrayerWindow>>;
}

/// The same local prayer times every day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedTimetable {
    timezone: Tz,
    prayer_minutes: i64,
    times: [(PrayerName, NaiveTime); 5],
}

impl FixedTimetable {
    /// Build a timetable from five local `"HH:MM"` start times, given in
    /// daily prayer order (Fajr through Isha).
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidTimezone`] for an unknown IANA name,
    /// [`ScheduleError::InvalidTime`] for an unparseable time, times that
    /// leave less than one prayer length between them, or a window that runs
    /// past midnight, and [`ScheduleError::InvalidInput`] for a
    /// non-positive prayer length.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use prayer_schedule::{FixedTimetable, PrayerWindowProvider};
    ///
    /// let table = FixedTimetable::new(
    ///     "Asia/Kuala_Lumpur",
    ///     ["05:58", "13:15", "16:30", "19:22", "20:33"],
    ///     20,
    /// )
    /// .unwrap();
    /// let windows = table.prayer_windows(NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()).unwrap();
    /// assert_eq!(windows.len(), 5);
    /// // 05:58 in Kuala Lumpur (UTC+8) is 21:58 UTC the previous day.
    /// assert_eq!(windows[0].start().to_rfc3339(), "2026-03-15T21:58:00+00:00");
    /// ```
    pub fn new(timezone: &str, times: [&str; 5], prayer_minutes: i64) -> Result<Self> {
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|_| ScheduleError::InvalidTimezone(format!("'{timezone}'")))?;
        if prayer_minutes <= 0 {
            return Err(ScheduleError::InvalidInput(format!(
                "prayer length must be positive, got {prayer_minutes} minutes"
            )));
        }

        let mut parsed = [(PrayerName::Fajr, NaiveTime::MIN); 5];
        for (slot, (name, raw)) in parsed.iter_mut().zip(PrayerName::ALL.into_iter().zip(times)) {
            *slot = (name, parse_hhmm(raw)?);
        }
        // Compare as minutes since midnight; NaiveTime addition wraps.
        for &(name, time) in &parsed {
            if minute_of_day(time).saturating_add(prayer_minutes) > MINUTES_PER_DAY {
                return Err(ScheduleError::InvalidTime(format!(
                    "{name} at {} would run past midnight with a {prayer_minutes}-minute window",
                    time.format("%H:%M")
                )));
            }
        }
        for pair in parsed.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if minute_of_day(next.1) < minute_of_day(prev.1) + prayer_minutes {
                return Err(ScheduleError::InvalidTime(format!(
                    "{} at {} must start at least {prayer_minutes} minutes after {} at {}",
                    next.0,
                    next.1.format("%H:%M"),
                    prev.0,
                    prev.1.format("%H:%M")
                )));
            }
        }

        Ok(Self {
            timezone,
            prayer_minutes,
            times: parsed,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

impl PrayerWindowProvider for FixedTimetable {
    fn prayer_windows(&self, date: NaiveDate) -> Result<Vec<PrayerWindow>> {
        let length = Duration::minutes(self.prayer_minutes);
        self.times
            .iter()
            .map(|&(name, time)| {
                let start = local_to_utc(&self.timezone, date, time)?;
                PrayerWindow::new(name, start, start + length)
            })
            .collect()
    }
}

fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

fn parse_hhmm(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|e| ScheduleError::InvalidTime(format!("'{s}': {e}")))
}

/// Resolve a local wall-clock time, rejecting DST gaps and overlaps.
fn local_to_utc(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            ScheduleError::InvalidTime(format!(
                "{date} {} is ambiguous or nonexistent in {}",
                time.format("%H:%M"),
                tz.name()
            ))
        })
}
