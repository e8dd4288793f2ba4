use std::time::Duration;

use commute_core::CommuteError;

use crate::{Credentials, DEFAULT_BASE_URL, PtvClient};

/// Builder for [`PtvClient`].
pub struct PtvClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
    http: Option<reqwest::Client>,
}

impl PtvClientBuilder {
    pub(crate) fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            http: None,
        }
    }

    /// Override the API host, e.g. to point at a local mock server.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-call timeout. This is the only bound on a hung call.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reuse an existing `reqwest::Client` (connection pool, proxies, TLS settings).
    #[must_use]
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the base URL does not parse or the developer id is
    /// empty, and `Other` if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<PtvClient, CommuteError> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| CommuteError::InvalidArg(format!("base url {}: {e}", self.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CommuteError::InvalidArg(format!(
                "base url must be http(s): {}",
                self.base_url
            )));
        }
        if self.credentials.dev_id().is_empty() {
            return Err(CommuteError::InvalidArg("developer id is empty".to_string()));
        }
        let http = match self.http {
            Some(c) => c,
            None => reqwest::Client::builder()
                .build()
                .map_err(|e| CommuteError::Other(e.to_string()))?,
        };
        Ok(PtvClient {
            http,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            credentials: self.credentials,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_base_url() {
        let err = PtvClient::builder("1000", "k")
            .base_url("not a url")
            .build()
            .err()
            .expect("must fail");
        assert!(matches!(err, CommuteError::InvalidArg(_)));

        let err = PtvClient::builder("1000", "k")
            .base_url("ftp://example.com")
            .build()
            .err()
            .expect("must fail");
        assert!(matches!(err, CommuteError::InvalidArg(_)));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = PtvClient::builder("1000", "k")
            .base_url("http://localhost:8080/")
            .build()
            .expect("valid");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn empty_dev_id_is_rejected() {
        assert!(PtvClient::builder("", "k").build().is_err());
    }
}
