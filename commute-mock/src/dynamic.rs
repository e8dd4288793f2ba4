use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use commute_core::{CommuteError, Params, TransitApi};

/// Instruction for how a call to an endpoint should behave.
#[derive(Clone)]
pub enum MockBehavior {
    /// Return the provided payload immediately.
    Return(serde_json::Value),
    /// Fail immediately with the provided error.
    Fail(CommuteError),
    /// Return the payload after sleeping (simulate a slow call).
    Delay(Duration, serde_json::Value),
    /// Hang indefinitely (simulate a stalled call).
    Hang,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Endpoint path requested.
    pub endpoint: String,
    /// Query parameters requested.
    pub params: Params,
}

#[derive(Default)]
struct InternalState {
    rules: HashMap<String, MockBehavior>,
    calls: Vec<RecordedCall>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for calls to an endpoint path.
    pub async fn set_behavior(&self, endpoint: impl Into<String>, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(endpoint.into(), behavior);
    }

    /// Shorthand for `set_behavior(endpoint, MockBehavior::Return(payload))`.
    pub async fn respond(&self, endpoint: impl Into<String>, payload: serde_json::Value) {
        self.set_behavior(endpoint, MockBehavior::Return(payload))
            .await;
    }

    /// Shorthand for `set_behavior(endpoint, MockBehavior::Fail(err))`.
    pub async fn fail(&self, endpoint: impl Into<String>, err: CommuteError) {
        self.set_behavior(endpoint, MockBehavior::Fail(err)).await;
    }

    /// Return a copy of the call log, in call order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        let guard = self.state.lock().await;
        guard.calls.clone()
    }

    /// Number of calls made to an endpoint path.
    pub async fn call_count(&self, endpoint: &str) -> usize {
        let guard = self.state.lock().await;
        guard.calls.iter().filter(|c| c.endpoint == endpoint).count()
    }

    /// Clear all configured behaviors and the call log.
    pub async fn clear_all(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.calls.clear();
    }
}

/// A `TransitApi` that defers all behavior to an external controller.
///
/// Endpoints without a configured behavior fail with `CommuteError::Other`.
pub struct DynamicMockApi {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockApi {
    /// Create a new dynamic mock API and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<dyn TransitApi>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn TransitApi>, controller)
    }
}

#[async_trait]
impl TransitApi for DynamicMockApi {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn call(&self, endpoint: &str, params: &Params) -> Result<serde_json::Value, CommuteError> {
        // Log and snapshot the behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.calls.push(RecordedCall {
                endpoint: endpoint.to_string(),
                params: params.clone(),
            });
            guard.rules.get(endpoint).cloned()
        };

        match behavior {
            Some(MockBehavior::Return(v)) => Ok(v),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Delay(d, v)) => {
                tokio::time::sleep(d).await;
                Ok(v)
            }
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(CommuteError::Other(format!(
                "{}: no behavior for {endpoint}",
                self.name
            ))),
        }
    }
}
