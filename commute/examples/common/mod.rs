use std::sync::Arc;

use chrono::{SubsecRound, TimeDelta, Utc};
use commute::{CommuteError, Connection, Leg, TransitApi};
use commute_core::ApiRequest;
use commute_mock::{DepartureFixture, DynamicMockApi, RunFixture, departures_payload, runs_payload};

const CATALOG: &str = include_str!("catalog.json");
const RUNS: [&str; 3] = ["mock-run-0", "mock-run-1", "mock-run-2"];

/// Catalog from `COMMUTE_CATALOG` (path to a JSON file) or the bundled one.
pub fn load_catalog() -> Result<Vec<Connection>, Box<dyn std::error::Error>> {
    let raw = match std::env::var("COMMUTE_CATALOG") {
        Ok(path) => std::fs::read_to_string(path)?,
        Err(_) => CATALOG.to_string(),
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Signed PTV client from `PTV_DEV_ID`/`PTV_KEY`, or a scripted mock when
/// `COMMUTE_EXAMPLES_USE_MOCK` is set.
pub async fn get_api(
    catalog: &[Connection],
    leg: Leg,
) -> Result<Arc<dyn TransitApi>, CommuteError> {
    if std::env::var("COMMUTE_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using Mock API for CI) ---");
        return Ok(scripted_mock(catalog, leg).await);
    }
    let dev_id = std::env::var("PTV_DEV_ID")
        .map_err(|_| CommuteError::InvalidArg("PTV_DEV_ID is not set".into()))?;
    let key = std::env::var("PTV_KEY")
        .map_err(|_| CommuteError::InvalidArg("PTV_KEY is not set".into()))?;
    Ok(Arc::new(commute_ptv::PtvClient::new(dev_id, key)?))
}

async fn scripted_mock(catalog: &[Connection], leg: Leg) -> Arc<dyn TransitApi> {
    let (api, ctl) = DynamicMockApi::new_with_controller("examples-mock");
    let now = Utc::now().trunc_subsecs(0);
    for (i, c) in catalog.iter().enumerate() {
        let Some(dir) = c.direction_for(leg) else {
            continue;
        };
        ctl.respond(
            ApiRequest::runs(c.id, c.transport_type).endpoint,
            runs_payload(&[RunFixture::live(RUNS[0], dir.direction_id)]),
        )
        .await;
        let offset = i64::try_from(i).unwrap_or(0) * 4;
        let departures: Vec<DepartureFixture> = (0i64..)
            .zip(RUNS)
            .map(|(n, run)| {
                let at = now + TimeDelta::minutes(8 + offset + n * 12);
                let d = DepartureFixture::scheduled(run, at);
                if n == 0 { d.estimated(at + TimeDelta::minutes(1)) } else { d }
            })
            .collect();
        ctl.respond(
            ApiRequest::departures(c.id, c.transport_type, dir.origin_stop_id, dir.direction_id, 3)
                .endpoint,
            departures_payload(&departures, &[]),
        )
        .await;
    }
    api
}
