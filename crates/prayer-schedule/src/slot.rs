//! Search for the nearest clear dosing slot on a fixed grid.
//!
//! The search walks outward from the original time in steps of the grid
//! size, trying the earlier candidate before the later one at each distance.
//! A candidate is accepted when it is outside every buffered window, stays on
//! the original calendar day, and keeps the minimum separation from the
//! preceding and following doses.

use chrono::{DateTime, Duration, Utc};

use crate::config::SchedulingConfig;
use crate::conflict::in_any_window;
use crate::model::{DoseIntent, PrayerWindow};

/// Find a conflict-free alternative for `dose`.
///
/// `neighbors` holds the day's doses with their *current* times; only the
/// doses immediately before and after `dose` by ordinal are consulted, and
/// `dose` itself is ignored if present. Returns `None` once half of
/// `config.max_search_minutes` has been explored in both directions.
pub fn find_alternative(
    dose: &DoseIntent,
    windows: &[PrayerWindow],
    neighbors: &[DoseIntent],
    config: &SchedulingConfig,
) -> Option<DateTime<Utc>> {
    let bounds = NeighborBounds::around(dose, neighbors, config.min_separation());
    let step = config.grid_step();
    let reach = config.half_search_span();
    let buffer = config.buffer();
    let day = dose
        .original_time
        .with_timezone(&config.timezone)
        .date_naive();

    let is_valid = |candidate: DateTime<Utc>| {
        candidate.with_timezone(&config.timezone).date_naive() == day
            && bounds.admits(candidate)
            && !in_any_window(candidate, windows, buffer)
    };

    if step <= Duration::zero() {
        return None;
    }
    let mut offset = step;
    while offset <= reach {
        // Candidates beyond the representable range are skipped, not wrapped.
        let earlier = dose.original_time.checked_sub_signed(offset);
        if let Some(t) = earlier.filter(|t| is_valid(*t)) {
            return Some(t);
        }
        let later = dose.original_time.checked_add_signed(offset);
        if let Some(t) = later.filter(|t| is_valid(*t)) {
            return Some(t);
        }
        offset = offset.checked_add(&step)?;
    }
    None
}

/// Earliest and latest instants allowed by the adjacent doses.
#[derive(Debug, Clone, Copy)]
struct NeighborBounds {
    not_before: Option<DateTime<Utc>>,
    not_after: Option<DateTime<Utc>>,
}

impl NeighborBounds {
    fn around(dose: &DoseIntent, neighbors: &[DoseIntent], separation: Duration) -> Self {
        let previous = neighbors
            .iter()
            .filter(|n| n.ordinal < dose.ordinal)
            .max_by_key(|n| n.ordinal);
        let next = neighbors
            .iter()
            .filter(|n| n.ordinal > dose.ordinal)
            .min_by_key(|n| n.ordinal);

        // A bound past the end of time leaves no admissible instant.
        Self {
            not_before: previous.map(|p| {
                p.original_time
                    .checked_add_signed(separation)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC)
            }),
            not_after: next.map(|n| {
                n.original_time
                    .checked_sub_signed(separation)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC)
            }),
        }
    }

    fn admits(&self, t: DateTime<Utc>) -> bool {
        self.not_before.is_none_or(|lo| t >= lo) && self.not_after.is_none_or(|hi| t <= hi)
    }
}
