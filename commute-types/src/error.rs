use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the commute workspace.
///
/// Wraps transport and decoding failures from the signed API client, catalog
/// validation failures detected at build time, and the refresh re-entrancy guard.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommuteError {
    /// Network-level failure while performing a call.
    #[error("transport failure calling {endpoint}: {msg}")]
    Transport {
        /// Endpoint path that was being called.
        endpoint: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The remote API answered with a non-success HTTP status.
    #[error("http {status} from {endpoint}")]
    Http {
        /// Endpoint path that was being called.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request could not be signed (bad key material, malformed path).
    #[error("signing failed: {0}")]
    Signing(String),

    /// The response body could not be decoded as JSON.
    #[error("decode failure for {endpoint}: {msg}")]
    Decode {
        /// Endpoint path whose response failed to decode.
        endpoint: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The route catalog violates a structural invariant.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A refresh was requested while another one is still running.
    #[error("refresh already in flight")]
    RefreshInFlight,

    /// A call failed while refreshing a specific connection.
    #[error("connection {connection} failed: {source}")]
    Connection {
        /// Catalog id of the connection being refreshed.
        connection: String,
        /// Underlying call failure.
        source: Box<CommuteError>,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl CommuteError {
    /// Helper: build a `Transport` error for an endpoint.
    pub fn transport(endpoint: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `Http` status error for an endpoint.
    pub fn http(endpoint: impl Into<String>, status: u16) -> Self {
        Self::Http {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Helper: build a `Decode` error for an endpoint.
    pub fn decode(endpoint: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            msg: msg.into(),
        }
    }

    /// Helper: tag a call failure with the connection it belongs to.
    pub fn connection(connection: impl Into<String>, source: Self) -> Self {
        Self::Connection {
            connection: connection.into(),
            source: Box::new(source),
        }
    }

    /// Returns `true` for failures of a single call that the next refresh may recover from.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. }
            | Self::Http { .. }
            | Self::Signing(_)
            | Self::Decode { .. }
            | Self::Other(_) => true,
            Self::Connection { source, .. } => source.is_transient(),
            Self::InvalidCatalog(_) | Self::InvalidArg(_) | Self::RefreshInFlight => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_wrapper_keeps_transience() {
        let inner = CommuteError::http("/v3/runs/route/1/route_type/1", 503);
        let wrapped = CommuteError::connection("tram-58", inner);
        assert!(wrapped.is_transient());
        assert_eq!(
            wrapped.to_string(),
            "connection tram-58 failed: http 503 from /v3/runs/route/1/route_type/1"
        );
    }

    #[test]
    fn catalog_errors_are_not_transient() {
        assert!(!CommuteError::InvalidCatalog("x".into()).is_transient());
        assert!(!CommuteError::RefreshInFlight.is_transient());
    }
}
