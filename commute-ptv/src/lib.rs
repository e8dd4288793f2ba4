//! commute-ptv
//!
//! Public Transport Victoria timetable API v3 client implementing
//! `TransitApi`. Every call is signed with the developer key, performed as an
//! HTTP GET and decoded as JSON; any failure along the way is returned as a
//! `CommuteError` for the caller to handle.
#![warn(missing_docs)]

mod builder;
mod signer;

use std::time::Duration;

use async_trait::async_trait;
use commute_core::{CommuteError, Params, TransitApi};

pub use builder::PtvClientBuilder;
pub use signer::Credentials;

/// Production host of the timetable API.
pub const DEFAULT_BASE_URL: &str = "https://timetableapi.ptv.vic.gov.au";

/// Signed timetable API client. Construct with [`PtvClient::builder`].
pub struct PtvClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
}

impl PtvClient {
    /// Stable name used in logs and error tags.
    pub const NAME: &'static str = "commute-ptv";

    /// Start building a client for the given developer credentials.
    #[must_use]
    pub fn builder(dev_id: impl Into<String>, key: impl AsRef<[u8]>) -> PtvClientBuilder {
        PtvClientBuilder::new(Credentials::new(dev_id, key))
    }

    /// Build a client against the production host with default settings.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(dev_id: impl Into<String>, key: impl AsRef<[u8]>) -> Result<Self, CommuteError> {
        Self::builder(dev_id, key).build()
    }

    /// Host calls are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute signed URL for a call.
    ///
    /// # Errors
    /// Returns `Signing` when the request cannot be signed.
    pub fn signed_url(&self, endpoint: &str, params: &Params) -> Result<String, CommuteError> {
        let path = self.credentials.sign(endpoint, params)?;
        Ok(format!("{}{path}", self.base_url))
    }
}

#[async_trait]
impl TransitApi for PtvClient {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "commute_ptv::call",
            skip(self, params),
            fields(endpoint = %endpoint),
        )
    )]
    async fn call(&self, endpoint: &str, params: &Params) -> Result<serde_json::Value, CommuteError> {
        let url = self.signed_url(endpoint, params)?;
        let resp = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CommuteError::transport(endpoint, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            #[cfg(feature = "tracing")]
            tracing::debug!(status = status.as_u16(), "non-success status");
            return Err(CommuteError::http(endpoint, status.as_u16()));
        }

        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| CommuteError::decode(endpoint, e.to_string()))
    }
}
