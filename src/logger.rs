//! Request logging middleware.
//!
//! Logs one line when a request arrives and one when its response goes out,
//! with the elapsed time in between. With [`RequestLogger::verbose`] it also
//! dumps every request header after the start line. Lines are colorized
//! through a pluggable [`ColorScheme`] and written to an injected
//! [`LogSink`], so the middleware itself never touches a global logger.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use crate::colors::{ColorScheme, LatencyBucket, Paint, StatusClass};
use crate::request_id::request_id;
use crate::sink::LogSink;

/// Configuration for the request logging middleware.
///
/// Shared via `Arc` across all in-flight requests; nothing here mutates
/// after construction. Attach with
/// `axum::middleware::from_fn_with_state(logger, log_requests)`.
pub struct RequestLogger {
    sink: Arc<dyn LogSink>,
    scheme: Arc<dyn ColorScheme>,
    verbose: bool,
}

impl RequestLogger {
    /// Creates a logger writing to `sink` with the ANSI color scheme.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            scheme: Arc::new(crate::colors::Ansi),
            verbose: false,
        }
    }

    /// Swaps the color strategy, e.g. for [`Plain`](crate::colors::Plain)
    /// output on non-terminal sinks.
    pub fn with_scheme(mut self, scheme: Arc<dyn ColorScheme>) -> Self {
        self.scheme = scheme;
        self
    }

    /// Also log one line per request header key.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The `[<id>] ` segment shared by every line of one request.
    /// Empty ID, empty prefix.
    fn prefix(&self, req_id: &str) -> String {
        if req_id.is_empty() {
            String::new()
        } else {
            format!("{} ", self.scheme.paint(&format!("[{req_id}]"), Paint::RequestId))
        }
    }

    fn start_line(&self, req_id: &str, method: &Method, uri: &Uri, from: &str) -> String {
        format!(
            "{}Started {} {} from {}",
            self.prefix(req_id),
            self.scheme.paint(method.as_str(), Paint::Method),
            self.scheme.paint(&format!("\"{uri}\""), Paint::Url),
            from,
        )
    }

    /// One line per distinct header key, values comma-joined in their
    /// original order. Key order is whatever `HeaderMap` yields.
    fn header_lines(&self, req_id: &str, headers: &HeaderMap) -> Vec<String> {
        let prefix = self.prefix(req_id);
        headers
            .keys()
            .map(|key| {
                let values = headers
                    .get_all(key)
                    .iter()
                    .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{prefix}{key}: {values}")
            })
            .collect()
    }

    fn end_line(&self, req_id: &str, status: StatusCode, elapsed: Duration) -> String {
        let code = status.as_u16();
        format!(
            "{}Returning {} in {}",
            self.prefix(req_id),
            self.scheme
                .paint(&format!("{code:03}"), Paint::Status(StatusClass::of(code))),
            self.scheme
                .paint(&format!("{elapsed:?}"), Paint::Latency(LatencyBucket::of(elapsed))),
        )
    }
}

/// Middleware entry point; attach with `middleware::from_fn_with_state`.
///
/// The elapsed time covers exactly the inner handler chain: the clock starts
/// after the start line (and any header lines) have been written and stops
/// as soon as the response comes back.
pub async fn log_requests(
    State(logger): State<Arc<RequestLogger>>,
    req: Request,
    next: Next,
) -> Response {
    let req_id = request_id(&req).to_string();
    let from = client_addr(&req);

    logger
        .sink
        .write_line(&logger.start_line(&req_id, req.method(), req.uri(), &from));

    if logger.verbose {
        for line in logger.header_lines(&req_id, req.headers()) {
            logger.sink.write_line(&line);
        }
    }

    let started = Instant::now();
    let response = next.run(req).await;
    let elapsed = started.elapsed();

    logger
        .sink
        .write_line(&logger.end_line(&req_id, response.status(), elapsed));

    response
}

/// The address a request came from: a non-empty `X-Forwarded-For` header
/// wins, then the peer address the listener saw, then `"unknown"` when the
/// server was not set up with connect info.
fn client_addr(req: &Request) -> String {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(String::from)
        .unwrap_or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Plain;
    use crate::sink::BufferSink;
    use axum::body::Body;

    fn plain_logger() -> RequestLogger {
        RequestLogger::new(Arc::new(BufferSink::new())).with_scheme(Arc::new(Plain))
    }

    #[test]
    fn start_line_without_id_has_no_bracket_prefix() {
        let logger = plain_logger();
        let uri: Uri = "/widgets?id=1".parse().unwrap();
        let line = logger.start_line("", &Method::GET, &uri, "10.0.0.5");
        assert_eq!(line, "Started GET \"/widgets?id=1\" from 10.0.0.5");
    }

    #[test]
    fn start_line_with_id_is_prefixed() {
        let logger = plain_logger();
        let uri: Uri = "/widgets?id=1".parse().unwrap();
        let line = logger.start_line("abc123", &Method::GET, &uri, "10.0.0.5");
        assert_eq!(line, "[abc123] Started GET \"/widgets?id=1\" from 10.0.0.5");
    }

    #[test]
    fn end_line_reports_status_and_duration() {
        let logger = plain_logger();
        let line = logger.end_line("", StatusCode::NOT_FOUND, Duration::from_millis(120));
        assert_eq!(line, "Returning 404 in 120ms");
    }

    #[test]
    fn end_line_uses_seconds_for_slow_requests() {
        let logger = plain_logger();
        let line = logger.end_line("abc123", StatusCode::OK, Duration::from_secs(6));
        assert_eq!(line, "[abc123] Returning 200 in 6s");
    }

    #[test]
    fn header_lines_join_values_per_key() {
        let logger = plain_logger();
        let mut headers = HeaderMap::new();
        headers.append("x-one", "a".parse().unwrap());
        headers.append("x-one", "b".parse().unwrap());
        headers.insert("x-two", "c".parse().unwrap());

        let lines = logger.header_lines("", &headers);
        assert_eq!(lines.len(), 2);
        assert!(lines.contains(&"x-one: a, b".to_string()));
        assert!(lines.contains(&"x-two: c".to_string()));
    }

    #[test]
    fn header_lines_carry_the_request_id() {
        let logger = plain_logger();
        let mut headers = HeaderMap::new();
        headers.insert("accept", "*/*".parse().unwrap());

        let lines = logger.header_lines("abc123", &headers);
        assert_eq!(lines, vec!["[abc123] accept: */*".to_string()]);
    }

    #[test]
    fn forwarded_for_wins_over_peer_address() {
        let mut req = Request::builder()
            .uri("/")
            .header("x-forwarded-for", "10.0.0.5")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 9000))));
        assert_eq!(client_addr(&req), "10.0.0.5");
    }

    #[test]
    fn empty_forwarded_for_falls_back_to_peer_address() {
        let mut req = Request::builder()
            .uri("/")
            .header("x-forwarded-for", "")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 9000))));
        assert_eq!(client_addr(&req), "127.0.0.1:9000");
    }

    #[test]
    fn missing_connect_info_reads_as_unknown() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(client_addr(&req), "unknown");
    }
}
