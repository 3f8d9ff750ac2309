use thiserror::Error;

/// Envelope result codes that signal a transient upstream condition: the
/// request-quota cap and the generic application error the service emits
/// during brief internal outages.
const TRANSIENT_API_CODES: &[&str] = &["0001", "0022"];

/// Errors returned by the upstream tourism API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network, TLS, or HTTP-status failure from the underlying client.
    /// Surfaced only after the retry schedule is exhausted.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The envelope carried a non-success `resultCode` despite HTTP 200.
    /// This is the dominant error path in practice; never retried.
    #[error("upstream API error {code}: {message}")]
    Api { code: String, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ClientError {
    /// Whether a user-visible retry affordance makes sense for this error.
    ///
    /// Transport failures and transient upstream codes qualify; hard 4xx,
    /// permanent upstream codes, and malformed responses do not.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            ClientError::Transport(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            ClientError::Api { code, .. } => TRANSIENT_API_CODES.contains(&code.as_str()),
            ClientError::Deserialize { .. } | ClientError::InvalidBaseUrl { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(code: &str) -> ClientError {
        ClientError::Api {
            code: code.to_owned(),
            message: "test".to_owned(),
        }
    }

    #[test]
    fn quota_code_is_recoverable() {
        assert!(api("0022").is_recoverable());
    }

    #[test]
    fn application_error_code_is_recoverable() {
        assert!(api("0001").is_recoverable());
    }

    #[test]
    fn invalid_key_code_is_not_recoverable() {
        assert!(!api("0030").is_recoverable());
    }

    #[test]
    fn deserialize_error_is_not_recoverable() {
        let source = serde_json::from_str::<()>("nope").unwrap_err();
        let err = ClientError::Deserialize {
            context: "test".to_owned(),
            source,
        };
        assert!(!err.is_recoverable());
    }
}
