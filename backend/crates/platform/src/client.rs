//! Client identification utilities
//!
//! The rate limiter keys clients by the peer address of the TCP connection.
//! Forwarded headers are not consulted, so behind a reverse proxy every
//! client shares the proxy's key.

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::Request;

/// Key used when the connection's peer address is not available
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Peer IP of the connection the request arrived on
///
/// The port is dropped on purpose so a new connection does not get a fresh
/// rate-limit budget.
///
/// Requires the server to be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn client_key<B>(req: &Request<B>) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_client_key_from_connect_info() {
        let mut req = Request::new(Body::empty());
        let addr: SocketAddr = "192.168.1.7:51234".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));

        assert_eq!(client_key(&req), "192.168.1.7");
    }

    #[test]
    fn test_forwarded_headers_are_ignored() {
        let mut req = Request::builder()
            .header("x-forwarded-for", "1.2.3.4")
            .body(Body::empty())
            .unwrap();
        let addr: SocketAddr = "10.0.0.1:80".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));

        assert_eq!(client_key(&req), "10.0.0.1");
    }

    #[test]
    fn test_missing_connect_info() {
        let req = Request::new(Body::empty());
        assert_eq!(client_key(&req), UNKNOWN_CLIENT);
    }
}
