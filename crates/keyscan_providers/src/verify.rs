//! Verification outcome types and probe descriptions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when setting up key verification.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// The HTTP client could not be initialised.
    #[error("failed to initialize HTTP client: {0}")]
    ClientInit(String),
}

/// The outcome of probing a candidate key against its provider's API.
///
/// `Unknown` covers every inconclusive case: the provider has no probe, the
/// probe timed out, or the transport failed. It is deliberately distinct
/// from `Invalid` so an unreachable verifier can never mark a key dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Validity {
    /// The provider accepted the key (HTTP 200).
    #[serde(rename = "VALID")]
    Valid,
    /// The provider rejected the key (any non-200 status).
    #[serde(rename = "INVALID")]
    Invalid,
    /// No probe exists for the provider, or the probe could not complete.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "VALID"),
            Self::Invalid => write!(f, "INVALID"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// How a probe presents the candidate key to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`.
    Bearer,
    /// The key in a custom header, e.g. `x-api-key`.
    Header(String),
    /// The key as a query parameter, e.g. `?key=<key>`.
    Query(String),
}

/// A single provider probe: a cheap authenticated GET endpoint plus the
/// provider's auth scheme.
///
/// Probes target model-listing style endpoints that cost nothing to call
/// and only require the key being tested.
#[derive(Debug, Clone)]
pub struct ProbeSpec {
    /// Full URL of the probe endpoint.
    pub url: String,
    /// How the key is attached to the request.
    pub auth: AuthScheme,
    /// Extra static headers some providers require (e.g. `anthropic-version`).
    pub headers: Vec<(String, String)>,
}

impl ProbeSpec {
    /// Creates a probe that sends the key as a bearer token.
    #[must_use]
    pub fn bearer(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth: AuthScheme::Bearer,
            headers: Vec::new(),
        }
    }

    /// Creates a probe that sends the key in the named header.
    #[must_use]
    pub fn header(url: impl Into<String>, header_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth: AuthScheme::Header(header_name.into()),
            headers: Vec::new(),
        }
    }

    /// Creates a probe that sends the key as the named query parameter.
    #[must_use]
    pub fn query(url: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth: AuthScheme::Query(param.into()),
            headers: Vec::new(),
        }
    }

    /// Attaches a static header sent with every probe request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_display_is_uppercase() {
        assert_eq!(format!("{}", Validity::Valid), "VALID");
        assert_eq!(format!("{}", Validity::Invalid), "INVALID");
        assert_eq!(format!("{}", Validity::Unknown), "UNKNOWN");
    }

    #[test]
    fn validity_serde_round_trips() {
        for validity in [Validity::Valid, Validity::Invalid, Validity::Unknown] {
            let json = serde_json::to_string(&validity).unwrap_or_default();
            let back: Validity = serde_json::from_str(&json).unwrap_or(Validity::Unknown);
            assert_eq!(back, validity);
        }
    }

    #[test]
    fn probe_spec_builders_set_auth_scheme() {
        let bearer = ProbeSpec::bearer("https://example.com/v1/models");
        assert_eq!(bearer.auth, AuthScheme::Bearer);

        let header = ProbeSpec::header("https://example.com/v1/models", "x-api-key");
        assert_eq!(header.auth, AuthScheme::Header("x-api-key".to_string()));

        let query = ProbeSpec::query("https://example.com/v1/models", "key");
        assert_eq!(query.auth, AuthScheme::Query("key".to_string()));
    }

    #[test]
    fn with_header_accumulates() {
        let probe = ProbeSpec::header("https://example.com", "x-api-key")
            .with_header("anthropic-version", "2023-06-01");
        assert_eq!(probe.headers.len(), 1);
        assert_eq!(probe.headers[0].0, "anthropic-version");
    }
}
