//! Log sinks: where composed lines end up.

use std::sync::{Arc, Mutex};

/// Destination for whole log lines.
///
/// One call is one record. Implementations are shared across concurrent
/// requests and must not interleave partial lines. Writes are
/// fire-and-forget; a sink that cannot write has nowhere to report it.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Forwards each line through the process-wide `tracing` pipeline.
#[derive(Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, line: &str) {
        tracing::info!("{line}");
    }
}

/// Collects lines in memory, in write order.
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for BufferSink {
    fn write_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_sink_preserves_write_order() {
        let sink = BufferSink::new();
        sink.write_line("first");
        sink.write_line("second");
        assert_eq!(sink.lines(), vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn buffer_sink_clones_share_storage() {
        let sink = BufferSink::new();
        let other = sink.clone();
        other.write_line("shared");
        assert_eq!(sink.lines(), vec!["shared".to_string()]);
    }
}
