//! Presenter-facing projection of the service table.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use commute_core::{
    Connection, Health, HealthLevel, RouteId, Service, ServiceId, TransportType, health,
};

/// One visible upcoming departure, denormalized for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRow {
    /// Slot identity.
    pub id: ServiceId,
    /// Route number shown to riders, e.g. `"626"`.
    pub route_number: String,
    /// Human-readable route name.
    pub route_name: String,
    /// Mode of transport.
    pub transport: TransportType,
    /// Run identifier, when the departure carried one.
    pub run_ref: Option<String>,
    /// Raw health flags.
    pub health: Health,
    /// Reliability level derived from `health`.
    pub level: HealthLevel,
    /// Instant the vehicle departs (estimate when known).
    pub departure_time: DateTime<Utc>,
    /// Latest instant to leave.
    pub get_going_by: DateTime<Utc>,
    /// Expected arrival at the destination.
    pub arrive_by: DateTime<Utc>,
    /// `get_going_by` as `HH:MM` in the configured time zone.
    pub get_going_by_local: String,
    /// `arrive_by` as `HH:MM` in the configured time zone.
    pub arrive_by_local: String,
    /// Seconds until `get_going_by`; negative once it has passed.
    pub time_to_go_seconds: i64,
    /// Disruption titles affecting the connection.
    pub disruptions: Vec<String>,
}

impl ServiceRow {
    /// Signed time left before the rider must leave.
    #[must_use]
    pub fn time_to_go(&self) -> TimeDelta {
        TimeDelta::seconds(self.time_to_go_seconds)
    }

    /// Returns `true` once `get_going_by` has passed.
    #[must_use]
    pub const fn is_late(&self) -> bool {
        self.time_to_go_seconds < 0
    }
}

fn local_hhmm(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%H:%M").to_string()
}

/// Filter out services missed by more than `buffer` and order the rest by
/// arrival, ties broken by slot id.
pub fn visible_rows(
    services: Vec<Service>,
    catalog: &[Connection],
    now: DateTime<Utc>,
    buffer: Duration,
    tz: Tz,
) -> Vec<ServiceRow> {
    let grace = TimeDelta::from_std(buffer).unwrap_or(TimeDelta::MAX);
    let routes: HashMap<RouteId, &Connection> = catalog.iter().map(|c| (c.id, c)).collect();

    let mut rows: Vec<ServiceRow> = services
        .into_iter()
        .filter_map(|s| {
            let time_to_go = s.get_going_by - now;
            if time_to_go < -grace {
                return None;
            }
            let connection = routes.get(&s.route_id)?;
            Some(ServiceRow {
                id: s.id,
                route_number: connection.short_number.clone(),
                route_name: connection.display_name.clone(),
                transport: connection.transport_type,
                run_ref: s.run_ref,
                health: s.health,
                level: health::score(s.health),
                departure_time: s.departure_time,
                get_going_by: s.get_going_by,
                arrive_by: s.arrive_by,
                get_going_by_local: local_hhmm(s.get_going_by, tz),
                arrive_by_local: local_hhmm(s.arrive_by, tz),
                time_to_go_seconds: time_to_go.num_seconds(),
                disruptions: s.disruptions,
            })
        })
        .collect();
    rows.sort_by(|a, b| a.arrive_by.cmp(&b.arrive_by).then_with(|| a.id.cmp(&b.id)));
    rows
}
