//! Rate-limit middleware and client identity extraction.

use std::net::SocketAddr;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use super::error::ApiError;
use super::state::AppState;
use crate::ratelimit::Admission;

/// Identity used when neither a forwarding header nor a peer address is
/// available. Merges all unidentifiable clients into one shared bucket.
const UNKNOWN_IDENTITY: &str = "unknown";

/// Extract the client identity for rate-limit accounting.
///
/// Priority: X-Forwarded-For (first value) > socket peer address > "unknown".
fn client_identity(request: &Request<Body>) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next().map(str::trim) {
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_IDENTITY.to_string())
}

/// Admit or reject the request before it reaches its handler.
///
/// Rejections short-circuit with the 429 envelope and never invoke the inner
/// handler; admitted requests pass through unchanged.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let identity = client_identity(&request);

    match state.limiter.check_and_record(&identity, Instant::now()) {
        Admission::Admit => next.run(request).await,
        Admission::Reject { retry_after } => {
            let retry_after_ms = retry_after.as_millis() as u64;
            warn!(
                identity = %identity,
                retry_after_ms,
                "Request rejected by rate limiter"
            );
            ApiError::rate_limited(retry_after_ms).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Request<Body> {
        Request::builder()
            .uri("/api/chat")
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_forwarded_header_takes_first_value() {
        let mut req = request();
        req.headers_mut()
            .insert("x-forwarded-for", "1.2.3.4, 10.0.0.1".parse().unwrap());

        assert_eq!(client_identity(&req), "1.2.3.4");
    }

    #[test]
    fn test_peer_address_used_without_forwarding_header() {
        let mut req = request();
        let peer: SocketAddr = "192.168.1.7:54321".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));

        assert_eq!(client_identity(&req), "192.168.1.7");
    }

    #[test]
    fn test_forwarded_header_wins_over_peer_address() {
        let mut req = request();
        req.headers_mut()
            .insert("x-forwarded-for", "1.2.3.4".parse().unwrap());
        let peer: SocketAddr = "192.168.1.7:54321".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));

        assert_eq!(client_identity(&req), "1.2.3.4");
    }

    #[test]
    fn test_unknown_fallback_without_any_origin() {
        assert_eq!(client_identity(&request()), UNKNOWN_IDENTITY);
    }

    #[test]
    fn test_empty_forwarded_header_falls_through() {
        let mut req = request();
        req.headers_mut()
            .insert("x-forwarded-for", "  ".parse().unwrap());

        assert_eq!(client_identity(&req), UNKNOWN_IDENTITY);
    }
}
