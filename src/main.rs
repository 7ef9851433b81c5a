//! Demo host server for the request logging middleware.
//!
//! Serves a handful of routes that exercise different status codes and
//! latencies, tags each request with a short ID, and logs every request
//! through the middleware:
//! - `/` answers immediately with 200
//! - `/slow` sleeps long enough to land in the moderate latency bucket
//! - `/teapot` answers with a client error

use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use nanoid::nanoid;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing::{Level, info};

use reqlog_rs::cli::Cli;
use reqlog_rs::colors::{Ansi, ColorScheme, Plain};
use reqlog_rs::logger::{RequestLogger, log_requests};
use reqlog_rs::request_id::RequestId;
use reqlog_rs::sink::TracingSink;

/// Tags each request with a short ID before the logger reads it.
async fn assign_request_id(mut req: Request, next: Next) -> Response {
    req.extensions_mut().insert(RequestId(nanoid!(5)));
    next.run(req).await
}

#[tokio::main]
async fn main() {
    // Initialize structured logging with INFO level as default
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args: Cli = argh::from_env();

    let scheme: Arc<dyn ColorScheme> = if args.no_color {
        Arc::new(Plain)
    } else {
        Arc::new(Ansi)
    };
    let logger = Arc::new(
        RequestLogger::new(Arc::new(TracingSink))
            .with_scheme(scheme)
            .verbose(args.verbose),
    );

    // Request IDs are assigned by the outermost layer so the logger below
    // it sees them.
    let app = Router::new()
        .route("/", get(|| async { "hello\n" }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(750)).await;
                "eventually\n"
            }),
        )
        .route("/teapot", get(|| async { StatusCode::IM_A_TEAPOT }))
        .layer(middleware::from_fn_with_state(Arc::clone(&logger), log_requests))
        .layer(middleware::from_fn(assign_request_id));

    info!("Server running on: http://{}", args.bind);

    axum::serve(
        tokio::net::TcpListener::bind(args.bind).await.unwrap(),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
