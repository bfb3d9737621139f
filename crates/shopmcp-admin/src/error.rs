use thiserror::Error;

/// Failures surfaced by [`crate::AdminClient`]. Nothing is retried; callers
/// decide how each variant maps to their own responses.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The admin API answered with a non-2xx status.
    #[error("admin API returned {status} for {method} {path}")]
    Status {
        status: u16,
        method: String,
        path: String,
        body: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid admin API base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("access token contains characters not allowed in an HTTP header")]
    InvalidAccessToken,
}

impl AdminError {
    /// HTTP status reported by the remote side, if the failure carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}
