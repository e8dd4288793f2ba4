use async_trait::async_trait;

use commute_types::{CommuteError, DirectionId, RouteId, StopId, TransportType};

/// Query parameters of a call, in the order they are sent.
///
/// Repeated keys are allowed (e.g. several `expand` values).
pub type Params = Vec<(String, String)>;

/// Authenticated request/response boundary to the timetable API.
///
/// Implementations sign and perform the call and decode the body as JSON.
/// Any failure of a single call (signing, network, HTTP status, JSON decode)
/// is surfaced through the `Err` channel; the caller decides how to recover.
#[async_trait]
pub trait TransitApi: Send + Sync {
    /// Stable identifier for logging and error tagging.
    fn name(&self) -> &'static str;

    /// Perform one call against `endpoint` (a path such as `/v3/runs/route/1/route_type/1`).
    async fn call(&self, endpoint: &str, params: &Params) -> Result<serde_json::Value, CommuteError>;
}

/// A fully described call: endpoint path plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Endpoint path, without host or query string.
    pub endpoint: String,
    /// Query parameters, excluding authentication.
    pub params: Params,
}

impl ApiRequest {
    /// Perform this request against an API implementation.
    ///
    /// # Errors
    /// Propagates the implementation's call failure unchanged.
    pub async fn send(&self, api: &dyn TransitApi) -> Result<serde_json::Value, CommuteError> {
        api.call(&self.endpoint, &self.params).await
    }

    /// Current runs along a route, expanded with live vehicle positions.
    #[must_use]
    pub fn runs(route_id: RouteId, transport: TransportType) -> Self {
        Self {
            endpoint: format!(
                "/v3/runs/route/{route_id}/route_type/{}",
                transport.code()
            ),
            params: vec![("expand".to_string(), "VehiclePosition".to_string())],
        }
    }

    /// Upcoming departures of a route from a stop in one direction, expanded with disruptions.
    #[must_use]
    pub fn departures(
        route_id: RouteId,
        transport: TransportType,
        stop_id: StopId,
        direction_id: DirectionId,
        max_results: usize,
    ) -> Self {
        Self {
            endpoint: format!(
                "/v3/departures/route_type/{}/stop/{stop_id}/route/{route_id}",
                transport.code()
            ),
            params: vec![
                ("direction_id".to_string(), direction_id.to_string()),
                ("max_results".to_string(), max_results.to_string()),
                ("expand".to_string(), "Disruption".to_string()),
            ],
        }
    }

    /// Look up a parameter value by key (first occurrence).
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
