//! HTTP utility functions for extracting request information.

use actix_web::HttpRequest;

/// Identity used for per-client rate limiting.
///
/// Uses the address of the connected peer. Forwarding headers are ignored
/// because any client can set them.
pub fn client_identity(req: &HttpRequest) -> String {
    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// Extract user agent from request headers
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}
