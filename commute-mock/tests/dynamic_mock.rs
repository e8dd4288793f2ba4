use std::time::Duration;

use chrono::{TimeZone, Utc};
use commute_core::{CommuteError, TransitApi, decode_departures, decode_runs};
use commute_mock::{
    DepartureFixture, DynamicMockApi, MockBehavior, RunFixture, departures_payload, runs_payload,
};

#[tokio::test]
async fn test_mock_return_and_log() {
    let (api, controller) = DynamicMockApi::new_with_controller("P0");
    controller
        .respond(
            "/v3/runs/route/1/route_type/1",
            runs_payload(&[RunFixture::live("R1", 5), RunFixture::idle("R2", 5)]),
        )
        .await;

    let params = vec![("expand".to_string(), "VehiclePosition".to_string())];
    let value = api
        .call("/v3/runs/route/1/route_type/1", &params)
        .await
        .expect("ok");
    let runs = decode_runs(&value);
    assert_eq!(runs.len(), 2);
    assert!(runs[0].has_vehicle_position);
    assert!(!runs[1].has_vehicle_position);

    let calls = controller.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].params, params);
}

#[tokio::test]
async fn test_mock_fail_and_unconfigured() {
    let (api, controller) = DynamicMockApi::new_with_controller("P0");
    let err = CommuteError::http("/x", 502);
    controller.fail("/x", err.clone()).await;

    let got = api.call("/x", &Vec::new()).await.expect_err("err");
    assert_eq!(got, err);

    let got = api.call("/y", &Vec::new()).await.expect_err("err");
    assert!(matches!(got, CommuteError::Other(_)));
    assert_eq!(controller.call_count("/x").await, 1);
    assert_eq!(controller.call_count("/y").await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_mock_delay_and_hang() {
    let (api, controller) = DynamicMockApi::new_with_controller("P0");
    controller
        .set_behavior(
            "/slow",
            MockBehavior::Delay(Duration::from_secs(5), serde_json::json!({})),
        )
        .await;
    controller.set_behavior("/hang", MockBehavior::Hang).await;

    assert!(api.call("/slow", &Vec::new()).await.is_ok());
    let hung = tokio::time::timeout(Duration::from_secs(60), api.call("/hang", &Vec::new())).await;
    assert!(hung.is_err(), "hang never resolves");
}

#[test]
fn departures_fixture_decodes() {
    let at = Utc.with_ymd_and_hms(2024, 5, 17, 8, 0, 0).unwrap();
    let payload = departures_payload(
        &[
            DepartureFixture::scheduled("R1", at).disrupted_by(9),
            DepartureFixture::scheduled("R2", at).estimated(at + chrono::TimeDelta::minutes(2)),
        ],
        &[(9, "Road works")],
    );
    let batch = decode_departures(&payload);
    assert_eq!(batch.departures.len(), 2);
    assert_eq!(batch.departures[0].scheduled, Some(at));
    assert!(batch.departures[1].estimated.is_some());
    assert_eq!(batch.disruption_titles(), vec!["Road works".to_string()]);
}

#[tokio::test]
async fn clear_all_forgets_behaviors_and_calls() {
    let (api, controller) = DynamicMockApi::new_with_controller("P0");
    controller.respond("/x", runs_payload(&[])).await;
    api.call("/x", &Vec::new()).await.expect("configured");
    assert_eq!(controller.call_count("/x").await, 1);

    controller.clear_all().await;
    assert!(controller.calls().await.is_empty());
    let err = api.call("/x", &Vec::new()).await.expect_err("rule cleared");
    assert!(matches!(err, CommuteError::Other(_)));
    assert_eq!(controller.call_count("/x").await, 1);
}
