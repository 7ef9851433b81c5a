//! Request ID lookup.

use axum::extract::Request;

/// Opaque per-request identifier.
///
/// Stored in request extensions by whatever upstream layer tracks IDs; the
/// logger only reads it. An absent or empty ID means the request is not
/// tracked and log lines carry no bracketed prefix.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Returns the tracked ID for this request, or `""` when there is none.
pub fn request_id(req: &Request) -> &str {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.as_str())
        .unwrap_or("")
}
