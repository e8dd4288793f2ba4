//! Derived service records and their health signals.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{DirectionId, RouteId, StopId};

/// Composite key of a service slot: `{route}-{direction}-{stop}-{slot}`.
///
/// Ordering groups every slot of one connection together, which lets the
/// table address a connection's slot range as a contiguous key range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceId {
    /// Route of the connection that owns the slot.
    pub route_id: RouteId,
    /// Direction the departures were requested for.
    pub direction_id: DirectionId,
    /// Boarding stop the departures were requested for.
    pub stop_id: StopId,
    /// Index within the bounded departure window.
    pub slot: usize,
}

impl ServiceId {
    /// Build a slot key.
    #[must_use]
    pub const fn new(route_id: RouteId, direction_id: DirectionId, stop_id: StopId, slot: usize) -> Self {
        Self {
            route_id,
            direction_id,
            stop_id,
            slot,
        }
    }

    /// Returns `true` if both keys belong to the same route/direction/stop slot range.
    #[must_use]
    pub const fn same_range(&self, other: &Self) -> bool {
        self.route_id == other.route_id
            && self.direction_id == other.direction_id
            && self.stop_id == other.stop_id
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.route_id, self.direction_id, self.stop_id, self.slot
        )
    }
}

/// Corroborating signals behind a service's reliability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Health {
    /// The run has been seen with a live vehicle position.
    pub run_active: bool,
    /// The departure carries a predicted (estimated) time.
    pub has_estimated: bool,
    /// The route currently has at least one vehicle with a live position.
    pub route_active: bool,
}

/// Discrete reliability level derived from [`Health`], ordered lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthLevel {
    /// No corroborating signal at all; only the timetable.
    Unverified,
    /// One signal.
    Weak,
    /// Two signals.
    Probable,
    /// Vehicle is live, has a predicted time, and the route has an active vehicle.
    Confirmed,
}

impl HealthLevel {
    /// Number of corroborating signals, `0..=3`.
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::Unverified => 0,
            Self::Weak => 1,
            Self::Probable => 2,
            Self::Confirmed => 3,
        }
    }

    /// Level for a signal count; counts above three saturate.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            0 => Self::Unverified,
            1 => Self::Weak,
            2 => Self::Probable,
            _ => Self::Confirmed,
        }
    }

    /// Short label for presenters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Weak => "weak",
            Self::Probable => "probable",
            Self::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One derived upcoming-departure record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Slot key.
    pub id: ServiceId,
    /// Upstream run identifier, when the departure names one.
    pub run_ref: Option<String>,
    /// Route of the owning connection; also the catalog lookup key.
    pub route_id: RouteId,
    /// Corroborating signals.
    pub health: Health,
    /// Timetabled departure from the boarding stop.
    pub scheduled_departure: DateTime<Utc>,
    /// Departure instant used for deadlines (estimate when present).
    pub departure_time: DateTime<Utc>,
    /// Latest instant to leave in order to make the departure.
    pub get_going_by: DateTime<Utc>,
    /// Expected arrival at the final destination on foot.
    pub arrive_by: DateTime<Utc>,
    /// Trimmed disruption titles affecting the departure batch.
    pub disruptions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_id_renders_composite_key() {
        let id = ServiceId::new(15248, 185, 13950, 2);
        assert_eq!(id.to_string(), "15248-185-13950-2");
    }

    #[test]
    fn slot_ranges_sort_contiguously() {
        let mut ids = vec![
            ServiceId::new(2, 1, 1, 0),
            ServiceId::new(1, 1, 1, 1),
            ServiceId::new(1, 1, 1, 0),
        ];
        ids.sort();
        assert!(ids[0].same_range(&ids[1]));
        assert!(!ids[1].same_range(&ids[2]));
    }

    #[test]
    fn health_level_ordering() {
        assert!(HealthLevel::Unverified < HealthLevel::Weak);
        assert!(HealthLevel::Probable < HealthLevel::Confirmed);
        assert_eq!(HealthLevel::from_score(7), HealthLevel::Confirmed);
    }
}
