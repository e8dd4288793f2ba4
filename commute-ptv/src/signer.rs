use hmac::{Hmac, Mac};
use sha1::Sha1;

use commute_core::{CommuteError, Params};

type HmacSha1 = Hmac<Sha1>;

/// Developer credentials issued by the timetable API operator.
#[derive(Clone)]
pub struct Credentials {
    dev_id: String,
    key: Vec<u8>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("dev_id", &self.dev_id)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Wrap a developer id and key.
    pub fn new(dev_id: impl Into<String>, key: impl AsRef<[u8]>) -> Self {
        Self {
            dev_id: dev_id.into(),
            key: key.as_ref().to_vec(),
        }
    }

    /// Developer id sent as `devid`.
    #[must_use]
    pub fn dev_id(&self) -> &str {
        &self.dev_id
    }

    /// Build the signed `path?query&signature=...` for a call.
    ///
    /// The signature is the lowercase hex HMAC-SHA1 of `path?query`, keyed by
    /// the developer key, where the query already carries `devid` as its last pair.
    ///
    /// # Errors
    /// Returns `Signing` when the endpoint is not an absolute path or the key is empty.
    pub fn sign(&self, endpoint: &str, params: &Params) -> Result<String, CommuteError> {
        if !endpoint.starts_with('/') {
            return Err(CommuteError::Signing(format!(
                "endpoint must be an absolute path: {endpoint}"
            )));
        }
        if self.key.is_empty() {
            return Err(CommuteError::Signing("empty developer key".to_string()));
        }
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in params {
            query.append_pair(k, v);
        }
        query.append_pair("devid", &self.dev_id);
        let request = format!("{endpoint}?{}", query.finish());

        let mut mac = HmacSha1::new_from_slice(&self.key)
            .map_err(|e| CommuteError::Signing(e.to_string()))?;
        mac.update(request.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        Ok(format!("{request}&signature={signature}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signs_path_and_query() {
        let creds = Credentials::new("1000", "secret-key");
        let signed = creds
            .sign(
                "/v3/disruptions",
                &vec![("route_types".to_string(), "2".to_string())],
            )
            .unwrap();
        assert_eq!(
            signed,
            "/v3/disruptions?route_types=2&devid=1000&signature=7f7930d4c021f129d903f5c41ea8041b91f1b5f3"
        );
    }

    #[test]
    fn rejects_relative_endpoint_and_empty_key() {
        let creds = Credentials::new("1000", "secret-key");
        assert!(matches!(
            creds.sign("v3/disruptions", &Vec::new()),
            Err(CommuteError::Signing(_))
        ));
        let empty = Credentials::new("1000", "");
        assert!(matches!(
            empty.sign("/v3/disruptions", &Vec::new()),
            Err(CommuteError::Signing(_))
        ));
    }

    #[test]
    fn debug_redacts_key() {
        let creds = Credentials::new("1000", "secret-key");
        let dbg = format!("{creds:?}");
        assert!(dbg.contains("1000"));
        assert!(!dbg.contains("secret-key"));
    }
}
