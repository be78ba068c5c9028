//! Header construction, client identity, and hop-by-hop stripping.
//!
//! [`build_forward_headers`] clones the inbound client headers, strips
//! hop-by-hop headers, rewrites `Host` to the target authority, and adds
//! proxy provenance (`X-Forwarded-For`, `X-Forwarded-Host`,
//! `X-Forwarded-Proto`, `X-Correlation-Id`). [`resolve_client_ip`]
//! derives the originating address from forwarding headers or the
//! transport peer.

use std::net::SocketAddr;
use std::sync::LazyLock;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

static HOP_BY_HOP: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    [
        "connection",
        "keep-alive",
        "transfer-encoding",
        "te",
        "trailer",
        "upgrade",
        "proxy-authorization",
        "proxy-authenticate",
    ]
    .iter()
    .filter_map(|name| name.parse::<HeaderName>().ok())
    .collect()
});

/// Strip hop-by-hop headers from an upstream response before relaying.
///
/// `Content-Length` stays: the body is streamed through unchanged, so
/// the upstream framing remains accurate.
pub fn strip_response_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
}

/// Resolve the originating client address for an inbound request.
///
/// Precedence: first comma-separated `X-Forwarded-For` token, then
/// `X-Real-IP`, then the transport peer address with the port stripped.
/// Never fails.
#[must_use]
pub fn resolve_client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    peer.ip().to_string()
}

/// Scheme reported downstream via `X-Forwarded-Proto`.
///
/// This listener does not terminate TLS, so the inbound leg is plain
/// HTTP; a client-supplied `X-Forwarded-Proto` (from a proxy in front
/// of us) passes through, otherwise `"http"`.
#[must_use]
pub fn forwarded_proto(headers: &HeaderMap) -> &str {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("http")
}

pub fn build_forward_headers(
    original: &HeaderMap,
    client_ip: &str,
    target_url: &Url,
    correlation_id: &str,
) -> HeaderMap {
    let mut headers = original.clone();

    // Strip hop-by-hop
    for header_name in HOP_BY_HOP.iter() {
        headers.remove(header_name);
    }

    // X-Forwarded-Host carries the Host the client targeted, captured
    // before the rewrite below.
    let original_host = original.get("host").cloned();

    // Rewrite Host to the target authority
    if let Some(host) = target_url.host_str() {
        let host_value = target_url
            .port()
            .map_or_else(|| host.to_string(), |port| format!("{host}:{port}"));
        if let Ok(val) = HeaderValue::from_str(&host_value) {
            headers.insert("host", val);
        }
    }

    // X-Forwarded-For: append to chain
    let xff = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map_or_else(
            || client_ip.to_string(),
            |existing| format!("{existing}, {client_ip}"),
        );
    if let Ok(val) = HeaderValue::from_str(&xff) {
        headers.insert("x-forwarded-for", val);
    }

    if let Some(host) = original_host {
        headers.insert("x-forwarded-host", host);
    }

    let proto = forwarded_proto(original);
    if let Ok(val) = HeaderValue::from_str(proto) {
        headers.insert("x-forwarded-proto", val);
    }

    // Correlation ID
    if let Ok(val) = HeaderValue::from_str(correlation_id) {
        headers.insert("x-correlation-id", val);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> SocketAddr {
        "10.0.0.1:54321".parse().unwrap()
    }

    #[test]
    fn resolves_first_forwarded_for_token() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "1.2.3.4, 5.6.7.8".parse().unwrap());
        headers.insert("x-real-ip", "9.9.9.9".parse().unwrap());

        assert_eq!(resolve_client_ip(&headers, peer()), "1.2.3.4");
    }

    #[test]
    fn falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "9.9.9.9".parse().unwrap());

        assert_eq!(resolve_client_ip(&headers, peer()), "9.9.9.9");
    }

    #[test]
    fn falls_back_to_peer_without_port() {
        let headers = HeaderMap::new();
        assert_eq!(resolve_client_ip(&headers, peer()), "10.0.0.1");
    }

    #[test]
    fn strips_hop_by_hop() {
        let mut original = HeaderMap::new();
        original.insert("connection", "keep-alive".parse().unwrap());
        original.insert("content-type", "application/json".parse().unwrap());

        let target = Url::parse("http://target:8080").unwrap();
        let result = build_forward_headers(&original, "10.0.0.1", &target, "test-id");

        assert!(result.get("connection").is_none());
        assert!(result.get("content-type").is_some());
    }

    #[test]
    fn rewrites_host() {
        let mut original = HeaderMap::new();
        original.insert("host", "proxy.example.com".parse().unwrap());

        let target = Url::parse("http://backend:9090/ignored").unwrap();
        let result = build_forward_headers(&original, "10.0.0.1", &target, "test-id");

        assert_eq!(result.get("host").unwrap(), "backend:9090");
        assert_eq!(result.get("x-forwarded-host").unwrap(), "proxy.example.com");
    }

    #[test]
    fn sets_x_forwarded_for_when_absent() {
        let original = HeaderMap::new();
        let target = Url::parse("http://target:8080").unwrap();
        let result = build_forward_headers(&original, "10.0.0.1", &target, "test-id");

        assert_eq!(result.get("x-forwarded-for").unwrap(), "10.0.0.1");
    }

    #[test]
    fn appends_x_forwarded_for() {
        let mut original = HeaderMap::new();
        original.insert("x-forwarded-for", "1.2.3.4".parse().unwrap());

        let target = Url::parse("http://target:8080").unwrap();
        let result = build_forward_headers(&original, "10.0.0.1", &target, "test-id");

        assert_eq!(result.get("x-forwarded-for").unwrap(), "1.2.3.4, 10.0.0.1");
    }

    #[test]
    fn proto_defaults_to_http() {
        let original = HeaderMap::new();
        let target = Url::parse("https://target:8443").unwrap();
        let result = build_forward_headers(&original, "10.0.0.1", &target, "test-id");

        assert_eq!(result.get("x-forwarded-proto").unwrap(), "http");
    }

    #[test]
    fn proto_passes_through_existing_value() {
        let mut original = HeaderMap::new();
        original.insert("x-forwarded-proto", "https".parse().unwrap());

        let target = Url::parse("http://target:8080").unwrap();
        let result = build_forward_headers(&original, "10.0.0.1", &target, "test-id");

        assert_eq!(result.get("x-forwarded-proto").unwrap(), "https");
    }

    #[test]
    fn sets_correlation_id() {
        let original = HeaderMap::new();
        let target = Url::parse("http://target:8080").unwrap();
        let result = build_forward_headers(&original, "10.0.0.1", &target, "my-correlation-id");

        assert_eq!(result.get("x-correlation-id").unwrap(), "my-correlation-id");
    }

    #[test]
    fn response_strip_keeps_content_length() {
        let mut headers = HeaderMap::new();
        headers.insert("transfer-encoding", "chunked".parse().unwrap());
        headers.insert("content-length", "42".parse().unwrap());

        strip_response_hop_by_hop(&mut headers);

        assert!(headers.get("transfer-encoding").is_none());
        assert_eq!(headers.get("content-length").unwrap(), "42");
    }
}
