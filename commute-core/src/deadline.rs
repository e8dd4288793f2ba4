use chrono::{DateTime, TimeDelta, Utc};

/// Raw timing inputs for one departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineInputs {
    /// Predicted departure, if published.
    pub departure_estimate: Option<DateTime<Utc>>,
    /// Timetabled departure.
    pub departure_scheduled: DateTime<Utc>,
    /// Walk from the commuter to the boarding stop.
    pub walk_before_seconds: u32,
    /// Walk from the alighting stop to the destination.
    pub walk_after_seconds: u32,
    /// Average in-vehicle trip time.
    pub trip_average_seconds: u32,
    /// Safety margin taken off the leave-by time.
    pub buffer_seconds: u32,
}

/// Leave-by and arrive-by instants for one departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    /// Instant used as the departure (estimate when present, else scheduled).
    pub departure_time: DateTime<Utc>,
    /// Latest instant to leave to make the departure with the buffer intact.
    pub get_going_by: DateTime<Utc>,
    /// Expected arrival at the destination.
    pub arrive_by: DateTime<Utc>,
}

/// Compute deadlines for one departure.
///
/// A missing estimate is the normal case and falls back to the scheduled time.
#[must_use]
pub fn compute_deadlines(inputs: &DeadlineInputs) -> Deadlines {
    let departure_time = inputs
        .departure_estimate
        .unwrap_or(inputs.departure_scheduled);
    let secs = |s: u32| TimeDelta::seconds(i64::from(s));
    Deadlines {
        departure_time,
        get_going_by: departure_time - secs(inputs.walk_before_seconds) - secs(inputs.buffer_seconds),
        arrive_by: departure_time + secs(inputs.trip_average_seconds) + secs(inputs.walk_after_seconds),
    }
}
