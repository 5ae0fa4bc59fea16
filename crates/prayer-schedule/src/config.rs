//! Caller-owned scheduling configuration.
//!
//! A [`SchedulingConfig`] is produced by the preferences layer and passed by
//! reference into every call. Cultural variation (madhab, Ramadan) lives
//! here as plain values so detection and annotation consume it uniformly.

use std::fmt;

use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::model::PrayerName;

pub const DEFAULT_BUFFER_MINUTES: i64 = 30;
pub const DEFAULT_GRID_STEP_MINUTES: i64 = 15;
pub const DEFAULT_MAX_SEARCH_MINUTES: i64 = 240;

const MINUTES_PER_DAY: i64 = 24 * 60;

// ── Madhab ──────────────────────────────────────────────────────────────────

/// Jurisprudence variant used by the prayer-time provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Madhab {
    #[default]
    Shafii,
    Hanafi,
    Jafari,
}

impl Madhab {
    pub fn as_str(self) -> &'static str {
        match self {
            Madhab::Shafii => "Shafi'i",
            Madhab::Hanafi => "Hanafi",
            Madhab::Jafari => "Ja'fari",
        }
    }

    /// Prayers whose boundaries differ between this variant and the others.
    pub fn boundary_sensitive(self) -> &'static [PrayerName] {
        match self {
            // Shadow-length rule for Asr: one object length vs. two.
            Madhab::Shafii | Madhab::Hanafi => &[PrayerName::Asr],
            Madhab::Jafari => &[PrayerName::Fajr, PrayerName::Maghrib, PrayerName::Isha],
        }
    }

    pub fn affects(self, prayer: PrayerName) -> bool {
        self.boundary_sensitive().contains(&prayer)
    }
}

impl fmt::Display for Madhab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SchedulingConfig ────────────────────────────────────────────────────────

/// Options for one optimization call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulingConfig {
    /// When false, the optimizer passes every dose through untouched.
    pub enabled: bool,
    /// Courtesy margin around each prayer window.
    pub buffer_minutes: i64,
    /// Step of the slot-search grid.
    pub grid_step_minutes: i64,
    /// Minimum gap between adjacent doses; defaults to the grid step.
    pub min_separation_minutes: Option<i64>,
    /// Total span explored by the slot search, split evenly both ways.
    pub max_search_minutes: i64,
    pub madhab: Madhab,
    pub ramadan_mode: bool,
    /// Zone whose calendar day bounds a rescheduled dose.
    #[serde(with = "tz_name")]
    pub timezone: Tz,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
            grid_step_minutes: DEFAULT_GRID_STEP_MINUTES,
            min_separation_minutes: None,
            max_search_minutes: DEFAULT_MAX_SEARCH_MINUTES,
            madhab: Madhab::default(),
            ramadan_mode: false,
            timezone: Tz::UTC,
        }
    }
}

impl SchedulingConfig {
    /// Parse a camelCase JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SchedulingConfig = serde_json::from_str(json)
            .map_err(|e| ScheduleError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn buffer(&self) -> Duration {
        saturating_minutes(self.buffer_minutes)
    }

    pub fn grid_step(&self) -> Duration {
        saturating_minutes(self.grid_step_minutes)
    }

    pub fn min_separation(&self) -> Duration {
        saturating_minutes(self.min_separation_minutes.unwrap_or(self.grid_step_minutes))
    }

    /// How far the slot search may move a dose in either direction.
    pub fn half_search_span(&self) -> Duration {
        saturating_minutes(self.max_search_minutes) / 2
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_minutes < 0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "bufferMinutes must be non-negative, got {}",
                self.buffer_minutes
            )));
        }
        if self.grid_step_minutes <= 0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "gridStepMinutes must be positive, got {}",
                self.grid_step_minutes
            )));
        }
        if let Some(sep) = self.min_separation_minutes {
            if sep <= 0 {
                return Err(ScheduleError::InvalidConfig(format!(
                    "minSeparationMinutes must be positive, got {sep}"
                )));
            }
            // Two doses a full day apart can no longer share a calendar day.
            if sep > MINUTES_PER_DAY {
                return Err(ScheduleError::InvalidConfig(format!(
                    "minSeparationMinutes must be at most {MINUTES_PER_DAY}, got {sep}"
                )));
            }
        }
        if self.max_search_minutes < self.grid_step_minutes {
            return Err(ScheduleError::InvalidConfig(format!(
                "maxSearchMinutes ({}) must be at least gridStepMinutes ({})",
                self.max_search_minutes, self.grid_step_minutes
            )));
        }
        // Wider than this can never stay on the original calendar day.
        if self.buffer_minutes > MINUTES_PER_DAY || self.max_search_minutes > 2 * MINUTES_PER_DAY {
            return Err(ScheduleError::InvalidConfig(
                "bufferMinutes or maxSearchMinutes is out of range".to_string(),
            ));
        }
        Ok(())
    }
}

/// Minutes as a [`Duration`], clamped to its range for unvalidated configs.
fn saturating_minutes(minutes: i64) -> Duration {
    Duration::try_minutes(minutes).unwrap_or(if minutes < 0 {
        Duration::MIN
    } else {
        Duration::MAX
    })
}

/// Serialize a [`Tz`] by its IANA name.
mod tz_name {
    use chrono_tz::Tz;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(tz: &Tz, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(tz.name())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Tz, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse::<Tz>()
            .map_err(|_| de::Error::custom(format!("Invalid timezone: '{name}'")))
    }
}
