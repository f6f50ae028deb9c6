//! Error type for Graph API calls.

/// Provider error code Meta uses for application-level rate limiting.
pub const RATE_LIMIT_CODE: i64 = 80004;

/// Errors from the Marketing API layer.
#[derive(Debug, thiserror::Error)]
pub enum AdsApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The Graph API returned an error envelope.
    #[error("Graph API error ({status}, code {code:?}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error code from the response body, when present.
        code: Option<i64>,
        /// Provider error message.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl AdsApiError {
    /// Whether this error is Meta's rate-limit signature.
    ///
    /// Matches the dedicated error code or, for older API versions that
    /// report throttling as a generic error, known message fragments.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            AdsApiError::Api { code, message, .. } => {
                if *code == Some(RATE_LIMIT_CODE) {
                    return true;
                }
                let message = message.to_lowercase();
                message.contains("rate-limiting") || message.contains("too many calls")
            }
            _ => false,
        }
    }
}
