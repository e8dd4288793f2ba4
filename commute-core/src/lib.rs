//! commute-core
//!
//! Core traits and pure building blocks shared across the commute workspace.
//!
//! - `api`: the `TransitApi` boundary to the signed timetable client and the
//!   request builders for runs and departures.
//! - `payload`: lenient decoding of runs/departures payloads.
//! - `deadline`: get-going-by / arrive-by computation.
//! - `health`: reliability scoring from health signals.
//! - `activity`: the monotonic ever-active run tracker.
#![warn(missing_docs)]

/// Ever-active run tracking.
pub mod activity;
/// The `TransitApi` trait and request builders.
pub mod api;
/// Deadline computation.
pub mod deadline;
/// Reliability scoring.
pub mod health;
pub mod payload;

pub use activity::ActivityTracker;
pub use api::{ApiRequest, Params, TransitApi};
pub use deadline::{DeadlineInputs, Deadlines, compute_deadlines};
pub use payload::{DepartureBatch, Departure, Run, decode_departures, decode_runs, parse_utc};

pub use commute_types::*;
