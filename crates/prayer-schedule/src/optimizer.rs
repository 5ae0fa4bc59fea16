//! Whole-day schedule optimization.
//!
//! [`optimize_schedule`] detects conflicts against the unmodified dose list,
//! then walks the doses in ordinal order and commits each alternative found
//! by [`find_alternative`] before searching the next one, so every search
//! sees the already-adjusted neighbors. Doses that could not be moved are
//! retried against the committed schedule until a pass makes no progress;
//! whatever is left keeps its original time and is reported as a warning.
//!
//! The reported conflicts describe what was wrong with the input and how it
//! was resolved, not what remains: residual conflicts only show up in the
//! warnings.

use chrono::Duration;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::annotate::annotate;
use crate::config::SchedulingConfig;
use crate::conflict::detect_conflict;
use crate::error::{Result, ScheduleError};
use crate::model::{Conflict, DoseIntent, PrayerWindow, ScheduleOptimizationResult};
use crate::slot::find_alternative;
use crate::validation::{validate_doses, validate_windows};

/// Optimize a day's doses around its prayer windows.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidConfig`] for an invalid config and
/// [`ScheduleError::InvalidInput`] for malformed doses or windows (see
/// [`validate_doses`] and [`validate_windows`]). No partial result is
/// produced in either case. A conflict that cannot be avoided is not an
/// error: the dose keeps its original time and a warning is added.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use prayer_schedule::{optimize_schedule, DoseIntent, PrayerName, PrayerWindow, SchedulingConfig};
///
/// let at = |h, m| Utc.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap();
/// let windows = [
///     PrayerWindow::new(PrayerName::Fajr, at(5, 45), at(6, 15)).unwrap(),
///     PrayerWindow::new(PrayerName::Dhuhr, at(13, 10), at(13, 40)).unwrap(),
///     PrayerWindow::new(PrayerName::Asr, at(16, 30), at(17, 0)).unwrap(),
///     PrayerWindow::new(PrayerName::Maghrib, at(19, 20), at(19, 45)).unwrap(),
///     PrayerWindow::new(PrayerName::Isha, at(20, 40), at(21, 10)).unwrap(),
/// ];
/// let doses = [DoseIntent::new(0, at(6, 0)), DoseIntent::new(1, at(18, 0))];
///
/// let result = optimize_schedule(&doses, &windows, &SchedulingConfig::default()).unwrap();
/// assert_eq!(result.optimized_times, vec![at(5, 0), at(18, 0)]);
/// assert_eq!(result.conflicts[0].suggested_alternative, Some(at(5, 0)));
/// assert!(result.warnings.is_empty());
/// ```
pub fn optimize_schedule(
    doses: &[DoseIntent],
    windows: &[PrayerWindow],
    config: &SchedulingConfig,
) -> Result<ScheduleOptimizationResult> {
    config.validate()?;
    validate_doses(doses)?;
    validate_windows(windows)?;

    if !config.enabled {
        debug!(doses = doses.len(), "prayer-aware scheduling disabled");
        return Ok(ScheduleOptimizationResult {
            optimized_times: doses.iter().map(|d| d.original_time).collect(),
            ..Default::default()
        });
    }

    log_overlapping_buffers(windows, config.buffer());

    // Conflicts against the unmodified list, with the index of each dose.
    let (mut conflicts, positions): (Vec<Conflict>, Vec<usize>) = doses
        .iter()
        .enumerate()
        .filter_map(|(i, dose)| detect_conflict(dose, windows, config).map(|c| (c, i)))
        .unzip();

    let mut schedule = doses.to_vec();
    let mut unresolved: Vec<usize> = (0..conflicts.len()).collect();
    let mut pass = 0;

    loop {
        pass += 1;
        let before = unresolved.len();
        unresolved.retain(|&k| {
            let i = positions[k];
            match find_alternative(&doses[i], windows, &schedule, config) {
                Some(alternative) => {
                    debug!(
                        ordinal = doses[i].ordinal,
                        prayer = %conflicts[k].prayer_name,
                        from = %doses[i].original_time,
                        to = %alternative,
                        pass,
                        "dose moved out of prayer window"
                    );
                    schedule[i].original_time = alternative;
                    conflicts[k].suggested_alternative = Some(alternative);
                    false
                }
                None => true,
            }
        });
        if unresolved.is_empty() || unresolved.len() == before {
            break;
        }
    }

    let warnings: Vec<String> = unresolved
        .iter()
        .map(|&k| {
            let conflict = &conflicts[k];
            warn!(
                ordinal = conflict.ordinal,
                prayer = %conflict.prayer_name,
                time = %conflict.time,
                "could not avoid prayer conflict"
            );
            format!(
                "Could not avoid conflict with {} for dose #{} at {}; original time kept",
                conflict.prayer_name,
                conflict.ordinal,
                conflict.time.with_timezone(&config.timezone).format("%H:%M")
            )
        })
        .collect();

    debug!(
        doses = doses.len(),
        conflicts = conflicts.len(),
        unresolved = warnings.len(),
        "schedule optimized"
    );

    let mut result = ScheduleOptimizationResult {
        optimized_times: schedule.iter().map(|d| d.original_time).collect(),
        conflicts,
        warnings,
        cultural_notes: Vec::new(),
    };
    result.cultural_notes = annotate(&result, config);
    Ok(result)
}

/// A JSON optimization request, as sent by UI bridges.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub doses: Vec<DoseIntent>,
    pub windows: Vec<PrayerWindow>,
    #[serde(default)]
    pub config: SchedulingConfig,
}

/// Run [`optimize_schedule`] on a camelCase JSON request and return the
/// result as JSON.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidInput`] if the request cannot be parsed,
/// plus every error [`optimize_schedule`] can return.
pub fn optimize_schedule_json(request: &str) -> Result<String> {
    let request: OptimizeRequest = serde_json::from_str(request)
        .map_err(|e| ScheduleError::InvalidInput(format!("malformed request: {e}")))?;
    let result = optimize_schedule(&request.doses, &request.windows, &request.config)?;
    serde_json::to_string(&result).map_err(|e| ScheduleError::Serialization(e.to_string()))
}

fn log_overlapping_buffers(windows: &[PrayerWindow], buffer: Duration) {
    for pair in windows.windows(2) {
        if pair[1].start() - pair[0].end() < buffer * 2 {
            debug!(
                first = %pair[0].name(),
                second = %pair[1].name(),
                "buffered prayer windows overlap"
            );
        }
    }
}
