//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Route label for metrics.
///
/// Uses the registered resource pattern so that query strings and unknown
/// paths do not blow up label cardinality.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| "unmatched".to_string())
}
