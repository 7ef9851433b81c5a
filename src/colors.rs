//! Color strategies for log line segments.

use owo_colors::{AnsiColors, DynColors, OwoColorize, Style};
use std::time::Duration;

/// Status classes in increasing order of alarm, one per color bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Informational,
    Success,
    Redirect,
    ClientError,
    ServerError,
}

impl StatusClass {
    /// Buckets a numeric status code. Anything below 200 counts as
    /// informational, anything from 500 up as a server error.
    pub fn of(code: u16) -> Self {
        match code {
            0..=199 => Self::Informational,
            200..=299 => Self::Success,
            300..=399 => Self::Redirect,
            400..=499 => Self::ClientError,
            _ => Self::ServerError,
        }
    }
}

/// Latency buckets: under 500ms reads as fast, 5s and beyond gets a red line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyBucket {
    Fast,
    Moderate,
    Slow,
}

impl LatencyBucket {
    pub fn of(elapsed: Duration) -> Self {
        if elapsed < Duration::from_millis(500) {
            Self::Fast
        } else if elapsed < Duration::from_secs(5) {
            Self::Moderate
        } else {
            Self::Slow
        }
    }
}

/// A paintable segment of a log line.
#[derive(Debug, Clone, Copy)]
pub enum Paint {
    RequestId,
    Method,
    Url,
    Status(StatusClass),
    Latency(LatencyBucket),
}

/// Strategy for rendering color annotations into log text.
///
/// The formatters never touch escape codes themselves; they hand each
/// segment to a scheme. Non-terminal sinks plug in [`Plain`] to get the
/// same lines with no codes at all.
pub trait ColorScheme: Send + Sync {
    fn paint(&self, text: &str, paint: Paint) -> String;
}

/// ANSI color scheme for terminal sinks.
///
/// Status buckets use the bright palette (blue, green, cyan, yellow, red),
/// latency buckets the normal one (green, yellow, red). Request IDs get a
/// deterministic hash-picked color so every line of one request shares a hue.
#[derive(Debug, Default)]
pub struct Ansi;

impl ColorScheme for Ansi {
    fn paint(&self, text: &str, paint: Paint) -> String {
        let style = match paint {
            Paint::RequestId => Style::new().color(DynColors::Ansi(id_color(text))),
            Paint::Method => Style::new().bright_magenta(),
            Paint::Url => Style::new().blue(),
            Paint::Status(class) => match class {
                StatusClass::Informational => Style::new().bright_blue(),
                StatusClass::Success => Style::new().bright_green(),
                StatusClass::Redirect => Style::new().bright_cyan(),
                StatusClass::ClientError => Style::new().bright_yellow(),
                StatusClass::ServerError => Style::new().bright_red(),
            },
            Paint::Latency(bucket) => match bucket {
                LatencyBucket::Fast => Style::new().green(),
                LatencyBucket::Moderate => Style::new().yellow(),
                LatencyBucket::Slow => Style::new().red(),
            },
        };
        text.style(style).to_string()
    }
}

/// Passthrough scheme: returns every segment unchanged.
#[derive(Debug, Default)]
pub struct Plain;

impl ColorScheme for Plain {
    fn paint(&self, text: &str, _paint: Paint) -> String {
        text.to_string()
    }
}

/// 12 visually distinct ANSI colors for request ID coloring
const ID_COLORS: [AnsiColors; 12] = [
    AnsiColors::Red,
    AnsiColors::Green,
    AnsiColors::Yellow,
    AnsiColors::Blue,
    AnsiColors::Magenta,
    AnsiColors::Cyan,
    AnsiColors::BrightRed,
    AnsiColors::BrightGreen,
    AnsiColors::BrightYellow,
    AnsiColors::BrightBlue,
    AnsiColors::BrightMagenta,
    AnsiColors::BrightCyan,
];

/// Deterministically maps a request ID to one of the palette colors.
/// Same ID, same color, across every line and every run.
fn id_color(id: &str) -> AnsiColors {
    let hash = id
        .chars()
        .fold(0u32, |acc, c| acc.wrapping_mul(31).wrapping_add(c as u32));
    ID_COLORS[(hash as usize) % ID_COLORS.len()]
}
