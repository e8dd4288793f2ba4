//! Builders for upstream-shaped JSON payloads.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};

/// A run line for [`runs_payload`].
#[derive(Debug, Clone)]
pub struct RunFixture {
    /// Run identifier.
    pub run_ref: &'static str,
    /// Direction travelled.
    pub direction_id: u32,
    /// Whether the run reports a live vehicle position.
    pub live: bool,
}

impl RunFixture {
    /// A run with a live vehicle position.
    #[must_use]
    pub const fn live(run_ref: &'static str, direction_id: u32) -> Self {
        Self {
            run_ref,
            direction_id,
            live: true,
        }
    }

    /// A run without a vehicle position.
    #[must_use]
    pub const fn idle(run_ref: &'static str, direction_id: u32) -> Self {
        Self {
            run_ref,
            direction_id,
            live: false,
        }
    }
}

/// A departure line for [`departures_payload`].
#[derive(Debug, Clone)]
pub struct DepartureFixture {
    /// Run identifier.
    pub run_ref: &'static str,
    /// Timetabled departure.
    pub scheduled: DateTime<Utc>,
    /// Predicted departure.
    pub estimated: Option<DateTime<Utc>>,
    /// Referenced disruption ids.
    pub disruption_ids: Vec<u64>,
}

impl DepartureFixture {
    /// A departure with only a timetabled time.
    #[must_use]
    pub const fn scheduled(run_ref: &'static str, scheduled: DateTime<Utc>) -> Self {
        Self {
            run_ref,
            scheduled,
            estimated: None,
            disruption_ids: Vec::new(),
        }
    }

    /// Attach a predicted time.
    #[must_use]
    pub fn estimated(mut self, at: DateTime<Utc>) -> Self {
        self.estimated = Some(at);
        self
    }

    /// Reference a disruption.
    #[must_use]
    pub fn disrupted_by(mut self, id: u64) -> Self {
        self.disruption_ids.push(id);
        self
    }
}

fn ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Runs payload as returned by `/v3/runs/route/{route}/route_type/{type}?expand=VehiclePosition`.
#[must_use]
pub fn runs_payload(runs: &[RunFixture]) -> Value {
    let runs: Vec<Value> = runs
        .iter()
        .map(|r| {
            let position = if r.live {
                json!({"latitude": -37.8136, "longitude": 144.9631, "bearing": 90.0})
            } else {
                Value::Null
            };
            json!({
                "run_ref": r.run_ref,
                "direction_id": r.direction_id,
                "vehicle_position": position,
            })
        })
        .collect();
    json!({ "runs": runs, "status": {"version": "3.0", "health": 1} })
}

/// Departures payload as returned by `/v3/departures/...?expand=Disruption`.
#[must_use]
pub fn departures_payload(departures: &[DepartureFixture], disruptions: &[(u64, &str)]) -> Value {
    let departures: Vec<Value> = departures
        .iter()
        .map(|d| {
            json!({
                "run_ref": d.run_ref,
                "scheduled_departure_utc": ts(d.scheduled),
                "estimated_departure_utc": d.estimated.map(ts),
                "disruption_ids": d.disruption_ids,
            })
        })
        .collect();
    let disruptions: serde_json::Map<String, Value> = disruptions
        .iter()
        .map(|(id, title)| {
            (
                id.to_string(),
                json!({"disruption_id": id, "title": title}),
            )
        })
        .collect();
    json!({
        "departures": departures,
        "disruptions": disruptions,
        "status": {"version": "3.0", "health": 1},
    })
}
