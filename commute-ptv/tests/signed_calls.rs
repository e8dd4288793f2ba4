use commute_core::{ApiRequest, CommuteError, TransitApi, TransportType, decode_runs};
use commute_ptv::PtvClient;
use httpmock::prelude::*;
use serde_json::json;

fn client(server: &MockServer) -> PtvClient {
    PtvClient::builder("1000", "secret-key")
        .base_url(server.base_url())
        .build()
        .expect("client")
}

#[tokio::test]
async fn call_sends_devid_and_signature() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v3/runs/route/1/route_type/1")
                .query_param("expand", "VehiclePosition")
                .query_param("devid", "1000")
                .query_param("signature", "1836b00c66888c8b00aeaa27ce463e79f9638ca1");
            then.status(200).json_body(json!({
                "runs": [{"run_ref": "R1", "direction_id": 5, "vehicle_position": {"latitude": -37.81}}]
            }));
        })
        .await;

    let c = client(&server);
    let value = ApiRequest::runs(1, TransportType::Tram)
        .send(&c)
        .await
        .expect("ok");
    m.assert_async().await;

    let runs = decode_runs(&value);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_ref.as_deref(), Some("R1"));
}

#[tokio::test]
async fn non_success_status_maps_to_http_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v3/runs/route/2/route_type/1");
            then.status(403).body("forbidden");
        })
        .await;

    let c = client(&server);
    let err = ApiRequest::runs(2, TransportType::Tram)
        .send(&c)
        .await
        .expect_err("403");
    assert_eq!(
        err,
        CommuteError::http("/v3/runs/route/2/route_type/1", 403)
    );
}

#[tokio::test]
async fn invalid_json_maps_to_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v3/runs/route/3/route_type/1");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let c = client(&server);
    let err = c
        .call("/v3/runs/route/3/route_type/1", &Vec::new())
        .await
        .expect_err("not json");
    assert!(matches!(err, CommuteError::Decode { .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn unreachable_host_maps_to_transport_error() {
    let c = PtvClient::builder("1000", "secret-key")
        .base_url("http://127.0.0.1:9")
        .build()
        .expect("client");
    let err = c
        .call("/v3/runs/route/1/route_type/1", &Vec::new())
        .await
        .expect_err("nothing listens on port 9");
    assert!(matches!(err, CommuteError::Transport { .. }));
}
