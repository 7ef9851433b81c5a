//! Command-line interface configuration.

use argh::FromArgs;
use std::net::SocketAddr;

/// A demo HTTP server wired with the request logging middleware
#[derive(Debug, FromArgs)]
pub struct Cli {
    /// server bind address (default: '127.0.0.1:8000')
    #[argh(option, default = "\"127.0.0.1:8000\".parse().unwrap()")]
    pub bind: SocketAddr,

    /// also log every request header
    #[argh(switch)]
    pub verbose: bool,

    /// emit plain lines without ANSI colors
    #[argh(switch, long = "no-color")]
    pub no_color: bool,
}
