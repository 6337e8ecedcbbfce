//! Client error types.

use thiserror::Error;

/// Errors that can occur when talking to the controller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// GitHub refused the call because a rate limit is exhausted.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// A response did not match the expected schema.
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// No credentials were available for an authenticated call.
    #[error("no GitHub token configured (set github.token, GH_TOKEN or GITHUB_TOKEN)")]
    MissingToken,

    /// The token contains characters that cannot be sent in a header.
    #[error("GitHub token contains invalid header characters")]
    InvalidToken,
}
