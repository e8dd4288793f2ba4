//! Static route catalog describing every tracked connection.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Leg;
use crate::error::CommuteError;

/// Identifier of a route in the upstream timetable API.
pub type RouteId = u32;
/// Identifier of a route direction in the upstream timetable API.
pub type DirectionId = u32;
/// Identifier of a stop in the upstream timetable API.
pub type StopId = u32;

/// Mode of transport, encoded with the upstream route type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TransportType {
    /// Metropolitan train.
    Train,
    /// Tram.
    Tram,
    /// Bus.
    Bus,
    /// Regional coach and train.
    VLine,
    /// Night bus.
    NightBus,
}

impl TransportType {
    /// Upstream `route_type` code used in request paths.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Train => 0,
            Self::Tram => 1,
            Self::Bus => 2,
            Self::VLine => 3,
            Self::NightBus => 4,
        }
    }

    /// Short human label for presenters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Tram => "tram",
            Self::Bus => "bus",
            Self::VLine => "vline",
            Self::NightBus => "night bus",
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One direction of travel along a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction {
    /// Upstream direction id.
    pub direction_id: DirectionId,
    /// Stop where the commuter boards.
    pub origin_stop_id: StopId,
    /// Stop where the commuter alights.
    pub destination_stop_id: StopId,
}

/// Trip duration statistics in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationStats {
    /// Fastest observed trip.
    pub min: u32,
    /// Slowest observed trip.
    pub max: u32,
    /// Average trip, used for arrive-by deadlines.
    pub avg: u32,
}

/// A statically configured route/direction/walking/duration profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Upstream route id; also the catalog key.
    pub id: RouteId,
    /// Mode of transport.
    pub transport_type: TransportType,
    /// Long route name, e.g. "Middle Brighton - Chadstone".
    pub display_name: String,
    /// Public route number, e.g. "626".
    pub short_number: String,
    /// Direction followed on the outbound leg.
    pub forward_direction: Direction,
    /// Direction followed on the return leg, if tracked.
    #[serde(default)]
    pub reverse_direction: Option<Direction>,
    /// Walking time in seconds between the commuter and each referenced stop.
    pub walking_seconds: BTreeMap<StopId, u32>,
    /// Trip duration statistics.
    pub duration: DurationStats,
}

impl Connection {
    /// Direction followed for the given leg, if the connection tracks it.
    #[must_use]
    pub const fn direction_for(&self, leg: Leg) -> Option<&Direction> {
        match leg {
            Leg::Outbound => Some(&self.forward_direction),
            Leg::Return => self.reverse_direction.as_ref(),
        }
    }

    /// Walking seconds for a stop; `0` for stops outside the catalog entry.
    ///
    /// A validated catalog has an entry for every stop referenced by a direction.
    #[must_use]
    pub fn walk_to(&self, stop: StopId) -> u32 {
        self.walking_seconds.get(&stop).copied().unwrap_or(0)
    }

    /// Check the structural invariants of a single connection.
    ///
    /// # Errors
    /// Returns `InvalidCatalog` when a direction references a stop without a
    /// walking entry or the duration statistics are out of order.
    pub fn validate(&self) -> Result<(), CommuteError> {
        let directions = std::iter::once(&self.forward_direction).chain(self.reverse_direction.as_ref());
        for dir in directions {
            for stop in [dir.origin_stop_id, dir.destination_stop_id] {
                if !self.walking_seconds.contains_key(&stop) {
                    return Err(CommuteError::InvalidCatalog(format!(
                        "route {} direction {} references stop {} without walking seconds",
                        self.id, dir.direction_id, stop
                    )));
                }
            }
        }
        let d = self.duration;
        if !(d.min <= d.avg && d.avg <= d.max) {
            return Err(CommuteError::InvalidCatalog(format!(
                "route {} duration stats out of order: min={} avg={} max={}",
                self.id, d.min, d.avg, d.max
            )));
        }
        Ok(())
    }
}

/// Validate a whole catalog: non-empty, unique route ids, every connection valid.
///
/// # Errors
/// Returns `InvalidCatalog` describing the first violation found.
pub fn validate_catalog(catalog: &[Connection]) -> Result<(), CommuteError> {
    if catalog.is_empty() {
        return Err(CommuteError::InvalidCatalog(
            "catalog is empty; add at least one connection".to_string(),
        ));
    }
    let mut seen: HashSet<RouteId> = HashSet::new();
    for c in catalog {
        if !seen.insert(c.id) {
            return Err(CommuteError::InvalidCatalog(format!(
                "route {} listed more than once",
                c.id
            )));
        }
        c.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus_626() -> Connection {
        Connection {
            id: 15248,
            transport_type: TransportType::Bus,
            display_name: "Middle Brighton - Chadstone".into(),
            short_number: "626".into(),
            forward_direction: Direction {
                direction_id: 185,
                origin_stop_id: 13950,
                destination_stop_id: 20001,
            },
            reverse_direction: None,
            walking_seconds: BTreeMap::from([(13950, 300), (20001, 430)]),
            duration: DurationStats {
                min: 480,
                max: 900,
                avg: 600,
            },
        }
    }

    #[test]
    fn missing_walk_entry_is_rejected() {
        let mut c = bus_626();
        c.walking_seconds.remove(&20001);
        let err = c.validate().expect_err("must fail");
        assert!(matches!(err, CommuteError::InvalidCatalog(msg) if msg.contains("20001")));
    }

    #[test]
    fn reverse_direction_stops_are_checked() {
        let mut c = bus_626();
        c.reverse_direction = Some(Direction {
            direction_id: 186,
            origin_stop_id: 20001,
            destination_stop_id: 99,
        });
        assert!(c.validate().is_err());
        c.walking_seconds.insert(99, 60);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn duplicate_routes_are_rejected() {
        let err = validate_catalog(&[bus_626(), bus_626()]).expect_err("dup");
        assert!(matches!(err, CommuteError::InvalidCatalog(_)));
        assert!(validate_catalog(&[]).is_err());
        assert!(validate_catalog(&[bus_626()]).is_ok());
    }

    #[test]
    fn direction_for_leg() {
        let c = bus_626();
        assert_eq!(c.direction_for(Leg::Outbound).map(|d| d.direction_id), Some(185));
        assert!(c.direction_for(Leg::Return).is_none());
    }
}
