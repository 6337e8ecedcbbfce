//! Response checks and body decoding for GitHub REST calls.

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

const DEFAULT_BACKOFF_SECS: u64 = 60;

/// GitHub error payload; only the message is surfaced.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pass successful responses through, map the rest to [`ClientError`].
///
/// GitHub signals rate limiting either as 429 or as 403 with
/// `x-ratelimit-remaining: 0`; both become [`ClientError::RateLimited`].
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if let Some(retry_after_secs) = rate_limit_backoff(status, resp.headers(), now_secs()) {
        return Err(ClientError::RateLimited { retry_after_secs });
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Read the body and decode it into `T`, naming `what` on failure.
pub async fn decode_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    what: &'static str,
) -> Result<T, ClientError> {
    let body = resp.bytes().await?;
    decode_slice(&body, what)
}

pub fn decode_slice<T: DeserializeOwned>(body: &[u8], what: &'static str) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|source| ClientError::Decode { what, source })
}

fn rate_limit_backoff(status: StatusCode, headers: &HeaderMap, now: u64) -> Option<u64> {
    let exhausted = header_u64(headers, "x-ratelimit-remaining") == Some(0);
    let limited = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && exhausted);
    if !limited {
        return None;
    }
    let backoff = header_u64(headers, RETRY_AFTER.as_str()).or_else(|| {
        header_u64(headers, "x-ratelimit-reset").map(|reset| reset.saturating_sub(now))
    });
    Some(backoff.unwrap_or(DEFAULT_BACKOFF_SECS))
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// The `message` field of a GitHub error body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body).map_or_else(|_| body.trim().to_string(), |e| e.message)
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
