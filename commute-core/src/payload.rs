//! Lenient decoding of runs and departures payloads.
//!
//! A payload that lacks the expected top-level key, or whose shape does not
//! match, decodes to zero results instead of failing the call.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use commute_types::DirectionId;

/// One vehicle trip instance along a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Upstream run identifier.
    pub run_ref: Option<String>,
    /// Direction the run travels in.
    pub direction_id: Option<DirectionId>,
    /// Whether the run currently reports a vehicle position.
    pub has_vehicle_position: bool,
}

/// One upcoming departure from a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Run serving the departure.
    pub run_ref: Option<String>,
    /// Timetabled departure; `None` when missing or unparseable.
    pub scheduled: Option<DateTime<Utc>>,
    /// Predicted departure, when the operator publishes one.
    pub estimated: Option<DateTime<Utc>>,
    /// Disruptions referenced by this departure.
    pub disruption_ids: Vec<u64>,
}

/// A bounded window of departures plus the disruptions they reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DepartureBatch {
    /// Departures in the order returned (window index = slot).
    pub departures: Vec<Departure>,
    /// Disruption titles keyed by disruption id.
    pub disruptions: BTreeMap<u64, String>,
}

impl DepartureBatch {
    /// Trimmed, de-duplicated disruption titles for the whole batch.
    ///
    /// Titles referenced by departures come first, in order of first reference;
    /// the remaining disruptions of the batch follow by id. Blank titles are dropped.
    #[must_use]
    pub fn disruption_titles(&self) -> Vec<String> {
        let mut order: Vec<u64> = Vec::new();
        let mut seen: HashSet<u64> = HashSet::new();
        for id in self.departures.iter().flat_map(|d| d.disruption_ids.iter()) {
            if self.disruptions.contains_key(id) && seen.insert(*id) {
                order.push(*id);
            }
        }
        order.extend(self.disruptions.keys().filter(|id| !seen.contains(id)));

        let mut titles: Vec<String> = Vec::with_capacity(order.len());
        for id in order {
            let Some(title) = self.disruptions.get(&id) else {
                continue;
            };
            let title = title.trim();
            if !title.is_empty() && !titles.iter().any(|t| t == title) {
                titles.push(title.to_string());
            }
        }
        titles
    }
}

/// Parse an upstream UTC timestamp such as `2024-05-17T01:02:36.240509912Z`.
///
/// Accepts timestamps with or without fractional seconds of any length.
#[must_use]
pub fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Default, Deserialize)]
struct RunsPayload {
    #[serde(default)]
    runs: Option<Vec<RawRun>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRun {
    #[serde(default)]
    run_ref: Option<String>,
    #[serde(default)]
    run_id: Option<i64>,
    #[serde(default)]
    direction_id: Option<DirectionId>,
    #[serde(default)]
    vehicle_position: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct DeparturesPayload {
    #[serde(default)]
    departures: Option<Vec<RawDeparture>>,
    #[serde(default)]
    disruptions: Option<BTreeMap<String, RawDisruption>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDeparture {
    #[serde(default)]
    run_ref: Option<String>,
    #[serde(default)]
    run_id: Option<i64>,
    #[serde(default)]
    scheduled_departure_utc: Option<String>,
    #[serde(default)]
    estimated_departure_utc: Option<String>,
    #[serde(default)]
    disruption_ids: Option<Vec<u64>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDisruption {
    #[serde(default)]
    title: Option<String>,
}

fn run_key(run_ref: Option<String>, run_id: Option<i64>) -> Option<String> {
    run_ref
        .filter(|r| !r.is_empty())
        .or_else(|| run_id.map(|id| id.to_string()))
}

fn decode_or_default<T: DeserializeOwned + Default>(value: &serde_json::Value, what: &'static str) -> T {
    match T::deserialize(value) {
        Ok(v) => v,
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(payload = what, error = %_e, "malformed payload; treating as empty");
            #[cfg(not(feature = "tracing"))]
            let _ = what;
            T::default()
        }
    }
}

/// Decode a runs payload (`{"runs": [...]}`) into runs.
#[must_use]
pub fn decode_runs(value: &serde_json::Value) -> Vec<Run> {
    let payload: RunsPayload = decode_or_default(value, "runs");
    payload
        .runs
        .unwrap_or_default()
        .into_iter()
        .map(|r| Run {
            run_ref: run_key(r.run_ref, r.run_id),
            direction_id: r.direction_id,
            has_vehicle_position: r.vehicle_position.is_some_and(|v| !v.is_null()),
        })
        .collect()
}

/// Decode a departures payload (`{"departures": [...], "disruptions": {...}}`).
#[must_use]
pub fn decode_departures(value: &serde_json::Value) -> DepartureBatch {
    let payload: DeparturesPayload = decode_or_default(value, "departures");
    let departures = payload
        .departures
        .unwrap_or_default()
        .into_iter()
        .map(|d| Departure {
            run_ref: run_key(d.run_ref, d.run_id),
            scheduled: d.scheduled_departure_utc.as_deref().and_then(parse_utc),
            estimated: d.estimated_departure_utc.as_deref().and_then(parse_utc),
            disruption_ids: d.disruption_ids.unwrap_or_default(),
        })
        .collect();
    let disruptions = payload
        .disruptions
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| Some((k.trim().parse::<u64>().ok()?, v.title.unwrap_or_default())))
        .collect();
    DepartureBatch {
        departures,
        disruptions,
    }
}
