//! # prayer-schedule
//!
//! Deterministic prayer-aware medication scheduling.
//!
//! Given a day's planned doses and its five prayer windows, the optimizer
//! detects doses that fall inside a buffered window, classifies how
//! disruptive each one is, and moves them to the nearest clear slot while
//! keeping dose count, order, and spacing intact. Every function is pure:
//! callers pass the configuration and the prayer windows explicitly and own
//! any memoization or re-invocation.
//!
//! ## Modules
//!
//! - [`conflict`] — Detect doses inside buffered prayer windows and grade severity
//! - [`slot`] — Grid search for the nearest conflict-free slot
//! - [`optimizer`] — Whole-day optimization with sequential commit
//! - [`annotate`] — Ramadan and madhab notes for the review screen
//! - [`validator`] — Live "avoid medication now" checks
//! - [`timetable`] — Prayer window providers
//! - [`validation`] — Structural input checks
//! - [`config`] — Caller-owned scheduling configuration
//! - [`model`] — Value types
//! - [`error`] — Error types

pub mod annotate;
pub mod config;
pub mod conflict;
pub mod error;
pub mod model;
pub mod optimizer;
pub mod slot;
pub mod timetable;
pub mod validation;
pub mod validator;

pub use annotate::annotate;
pub use config::{Madhab, SchedulingConfig};
pub use conflict::{detect_conflict, detect_conflicts};
pub use error::ScheduleError;
pub use model::{
    Conflict, DoseIntent, PrayerName, PrayerWindow, ScheduleOptimizationResult, Severity,
};
pub use optimizer::{optimize_schedule, optimize_schedule_json, OptimizeRequest};
pub use slot::find_alternative;
pub use timetable::{FixedTimetable, PrayerWindowProvider};
pub use validation::{validate_doses, validate_windows};
pub use validator::{is_conflicting_now, prayer_status, PrayerStatus, UpcomingPrayer};
