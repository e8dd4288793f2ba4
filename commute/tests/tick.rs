mod helpers;

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use commute::{Connection, Direction, DurationStats, Leg, TransportType};
use commute_mock::{DepartureFixture, RunFixture, departures_payload, runs_payload};

use helpers::{departures_endpoint, monitor, runs_endpoint};

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, h, m, 0).unwrap()
}

/// No walking, 10 minute trips: arrival is departure + 10 minutes.
fn bus(route_id: u32) -> Connection {
    let (origin, destination) = (route_id * 10, route_id * 10 + 1);
    Connection {
        id: route_id,
        transport_type: TransportType::Bus,
        display_name: format!("Bus {route_id}"),
        short_number: route_id.to_string(),
        forward_direction: Direction {
            direction_id: 1,
            origin_stop_id: origin,
            destination_stop_id: destination,
        },
        reverse_direction: None,
        walking_seconds: BTreeMap::from([(origin, 0), (destination, 0)]),
        duration: DurationStats {
            min: 600,
            max: 600,
            avg: 600,
        },
    }
}

async fn seeded() -> commute::Monitor {
    let (a, b) = (bus(1), bus(2));
    let (m, ctl) = monitor(vec![a.clone(), b.clone()]);
    for c in [&a, &b] {
        ctl.respond(runs_endpoint(c), runs_payload(&[RunFixture::live("X", 1)]))
            .await;
    }
    // Route 1 arrives 08:10 and 08:20, route 2 arrives 08:05.
    ctl.respond(
        departures_endpoint(&a, Leg::Outbound),
        departures_payload(
            &[
                DepartureFixture::scheduled("A0", at(8, 0)),
                DepartureFixture::scheduled("A1", at(8, 10)),
            ],
            &[],
        ),
    )
    .await;
    ctl.respond(
        departures_endpoint(&b, Leg::Outbound),
        departures_payload(&[DepartureFixture::scheduled("B0", at(7, 55))], &[]),
    )
    .await;
    m.refresh().await.expect("refresh");
    m
}

#[tokio::test]
async fn tick_orders_by_arrival() {
    let m = seeded().await;
    let rows = m.tick_at(at(7, 30)).await;
    let arrivals: Vec<DateTime<Utc>> = rows.iter().map(|r| r.arrive_by).collect();
    assert_eq!(arrivals, vec![at(8, 5), at(8, 10), at(8, 20)]);
    let runs: Vec<&str> = rows.iter().filter_map(|r| r.run_ref.as_deref()).collect();
    assert_eq!(runs, vec!["B0", "A0", "A1"]);
    assert_eq!(m.services(), rows, "tick publishes what it returns");
}

#[tokio::test]
async fn tick_hides_services_missed_beyond_buffer() {
    let m = seeded().await;
    // B0: get-going-by 07:53 (07:55 minus the 2 minute buffer).
    let b0 = m.tick_at(at(7, 30)).await[0].clone();
    assert_eq!(b0.get_going_by, at(7, 53));

    let rows = m.tick_at(at(7, 55)).await;
    assert_eq!(rows.len(), 3, "missed by exactly the buffer is still shown");
    assert_eq!(rows[0].time_to_go(), TimeDelta::minutes(-2));

    let rows = m.tick_at(at(7, 55) + TimeDelta::seconds(1)).await;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.route_number == "1"));
    assert_eq!(m.service_count().await, 3, "hidden services stay in the table");
}

#[tokio::test]
async fn subscribers_see_each_tick() {
    let m = seeded().await;
    let mut rx = m.subscribe();
    let _ = rx.borrow_and_update();
    m.tick_at(at(8, 30)).await;
    rx.changed().await.expect("published");
    assert!(rx.borrow().is_empty());
}
