//! Error types for the export pipeline.

use thiserror::Error;

/// Failures raised by the azure layer and the export pipeline.
///
/// The content-fetch fallback branches on these instead of catching
/// arbitrary failures: a typed error from the primary path triggers the
/// token-authorized retry, anything else propagates.
#[derive(Debug, Error)]
pub enum Error {
    #[error("a subscription id OR input file must be specified [try -s or --subscription-file]")]
    NoSubscriptionInput,

    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("management api returned {code} for {url}: {body}")]
    Status { url: String, code: u16, body: String },

    #[error("unexpected response at {path}: {message}")]
    Parse { path: String, message: String },

    #[error("resource id has no '{marker}' segment: {id}")]
    ResourceId { marker: &'static str, id: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = Error::Status {
            url: "https://management.azure.com/subscriptions/s1".to_string(),
            code: 403,
            body: "AuthorizationFailed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "management api returned 403 for https://management.azure.com/subscriptions/s1: AuthorizationFailed"
        );
    }

    #[test]
    fn test_missing_env_display() {
        assert_eq!(
            Error::MissingEnv("AZURE_KEY_VALUE").to_string(),
            "missing environment variable AZURE_KEY_VALUE"
        );
    }
}
