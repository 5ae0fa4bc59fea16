//! Value types shared by every stage of the optimizer.
//!
//! Everything here is an immutable value: prayer windows come from an
//! external provider, dose intents from the medication feature, and the
//! result is produced fresh by [`crate::optimize_schedule`].

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, ScheduleError};

// ── PrayerName ──────────────────────────────────────────────────────────────

/// One of the five daily prayers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    /// All prayers in daily order.
    pub const ALL: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }
}

impl fmt::Display for PrayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PrayerWindow ────────────────────────────────────────────────────────────

/// A named daily interval during which dosing should be avoided.
///
/// `start < end` always holds; [`PrayerWindow::new`] and deserialization
/// both reject empty or inverted windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerWindow {
    name: PrayerName,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl PrayerWindow {
    /// Build a window, rejecting `start >= end`.
    pub fn new(name: PrayerName, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(ScheduleError::InvalidInput(format!(
                "{name} window must start before it ends ({} >= {})",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { name, start, end })
    }

    pub fn name(&self) -> PrayerName {
        self.name
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Midpoint of the unexpanded window.
    pub fn midpoint(&self) -> DateTime<Utc> {
        self.start + (self.end - self.start) / 2
    }

    /// The window widened by `buffer` on both sides, clamped to the
    /// representable range.
    pub fn expanded(&self, buffer: Duration) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.start.checked_sub_signed(buffer).unwrap_or(DateTime::<Utc>::MIN_UTC),
            self.end.checked_add_signed(buffer).unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    /// Whether `t` lies inside the unexpanded window (both bounds inclusive).
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }

    /// Whether `t` lies inside the buffered window (both bounds inclusive).
    pub fn contains_expanded(&self, t: DateTime<Utc>, buffer: Duration) -> bool {
        let (start, end) = self.expanded(buffer);
        start <= t && t <= end
    }

    /// Distance from `t` to the nearest edge of the unexpanded window;
    /// zero when `t` is inside it.
    pub fn distance_to(&self, t: DateTime<Utc>) -> Duration {
        if t < self.start {
            self.start - t
        } else if t > self.end {
            t - self.end
        } else {
            Duration::zero()
        }
    }
}

impl<'de> Deserialize<'de> for PrayerWindow {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct RawWindow {
            name: PrayerName,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        }

        let raw = RawWindow::deserialize(deserializer)?;
        PrayerWindow::new(raw.name, raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}

// ── Doses and conflicts ─────────────────────────────────────────────────────

/// A planned daily dose, tagged with its stable position in the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseIntent {
    pub ordinal: u32,
    pub original_time: DateTime<Utc>,
}

impl DoseIntent {
    pub fn new(ordinal: u32, original_time: DateTime<Utc>) -> Self {
        Self {
            ordinal,
            original_time,
        }
    }
}

/// How disruptive a conflicting dose is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A dose that falls inside a buffered prayer window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// Ordinal of the conflicting dose.
    pub ordinal: u32,
    /// The original, pre-adjustment dose time.
    pub time: DateTime<Utc>,
    pub prayer_name: PrayerName,
    pub severity: Severity,
    /// `None` when no valid slot was found within the search span.
    pub suggested_alternative: Option<DateTime<Utc>>,
}

/// Outcome of one [`crate::optimize_schedule`] call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOptimizationResult {
    /// One entry per input dose, in ordinal order.
    pub optimized_times: Vec<DateTime<Utc>>,
    /// Conflicts found against the original schedule, with their resolution.
    pub conflicts: Vec<Conflict>,
    /// Residual problems, e.g. conflicts that could not be avoided.
    pub warnings: Vec<String>,
    pub cultural_notes: Vec<String>,
}
