use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use crate::services::order_mapper::UNKNOWN_IP;

/// Best-effort address of the browser that made the request.
///
/// Proxy headers win over the socket peer. Never rejects: falls back to
/// `0.0.0.0` when nothing usable is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(ClientIp(detect(&parts.headers, peer)))
    }
}

fn detect(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').map(str::trim).find_map(parse_ip));
    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| parse_ip(value.trim()))
    };

    forwarded
        .or_else(real_ip)
        .or(peer)
        .map(|ip| ip.to_canonical().to_string())
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

fn parse_ip(raw: &str) -> Option<IpAddr> {
    raw.parse::<IpAddr>()
        .ok()
        .or_else(|| raw.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_takes_first_valid_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("unknown, 177.45.3.9, 10.0.0.1"),
        );
        assert_eq!(detect(&headers, None), "177.45.3.9");
    }

    #[test]
    fn test_real_ip_then_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("200.200.1.1"));
        let peer = Some("10.1.1.1".parse().unwrap());
        assert_eq!(detect(&headers, peer), "200.200.1.1");
        assert_eq!(detect(&HeaderMap::new(), peer), "10.1.1.1");
    }

    #[test]
    fn test_mapped_ipv6_peer_is_canonicalized() {
        let peer = Some("::ffff:192.168.0.110".parse().unwrap());
        assert_eq!(detect(&HeaderMap::new(), peer), "192.168.0.110");
    }

    #[test]
    fn test_defaults_to_unknown() {
        assert_eq!(detect(&HeaderMap::new(), None), "0.0.0.0");
    }
}
