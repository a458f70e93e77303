use std::sync::{Mutex, PoisonError};

use ngscrape_logging::scrape_debug;

/// Receives one human-readable line per extraction step when debugging is on.
pub trait DebugSink: Send + Sync {
    fn line(&self, message: &str);
}

/// Forwards lines to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DebugSink for LogSink {
    fn line(&self, message: &str) {
        scrape_debug!("NGScrape: {message}");
    }
}

/// Keeps every line in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<String> {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        lines.drain(..).collect()
    }
}

impl DebugSink for MemorySink {
    fn line(&self, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
