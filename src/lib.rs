//! Reqlog-rs library - Request logging middleware for axum servers.

pub mod cli;
pub mod colors;
pub mod logger;
pub mod request_id;
pub mod sink;
