#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use commute::{
    Connection, Direction, DurationStats, Leg, Monitor, MonitorBuilder, TransportType,
};
use commute_core::ApiRequest;
use commute_mock::{DynamicMockApi, DynamicMockController};

/// Tram connection with a forward direction `10 -> 20` and a reverse `20 -> 10`.
///
/// Walk 300s to the origin, 430s from the destination, 600s average trip.
pub fn tram(route_id: u32, with_reverse: bool) -> Connection {
    let origin = route_id * 100 + 10;
    let destination = route_id * 100 + 20;
    Connection {
        id: route_id,
        transport_type: TransportType::Tram,
        display_name: format!("Route {route_id}"),
        short_number: route_id.to_string(),
        forward_direction: Direction {
            direction_id: 1,
            origin_stop_id: origin,
            destination_stop_id: destination,
        },
        reverse_direction: with_reverse.then_some(Direction {
            direction_id: 2,
            origin_stop_id: destination,
            destination_stop_id: origin,
        }),
        walking_seconds: BTreeMap::from([(origin, 300), (destination, 430)]),
        duration: DurationStats {
            min: 480,
            max: 900,
            avg: 600,
        },
    }
}

pub fn runs_endpoint(c: &Connection) -> String {
    ApiRequest::runs(c.id, c.transport_type).endpoint
}

pub fn departures_endpoint(c: &Connection, leg: Leg) -> String {
    let dir = c.direction_for(leg).expect("connection tracks leg");
    ApiRequest::departures(
        c.id,
        c.transport_type,
        dir.origin_stop_id,
        dir.direction_id,
        3,
    )
    .endpoint
}

pub fn builder(catalog: Vec<Connection>) -> (MonitorBuilder, DynamicMockController) {
    let (api, controller) = DynamicMockApi::new_with_controller("mock");
    let b = Monitor::builder()
        .with_api(api)
        .catalog(catalog)
        .buffer(Duration::from_secs(120))
        .max_results(3);
    (b, controller)
}

pub fn monitor(catalog: Vec<Connection>) -> (Monitor, DynamicMockController) {
    let (b, controller) = builder(catalog);
    (b.build().expect("monitor builds"), controller)
}

/// Whole-second instant `minutes` from now; payloads carry second precision.
pub fn in_minutes(minutes: i64) -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0) + TimeDelta::minutes(minutes)
}
