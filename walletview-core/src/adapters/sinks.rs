//! Log sink adapters

use std::sync::{Arc, Mutex};

use crate::ports::{LogEvent, LogLevel, LogSink};

/// Forwards events to the `log` facade under the `walletview` target
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn record(&self, event: LogEvent) {
        let level = match event.level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        };
        let mut line = event.event.clone();
        if let Some(id) = event.account_id {
            line.push_str(&format!(" account={}", id));
        }
        if let Some(id) = event.wallet_id {
            line.push_str(&format!(" wallet={}", id));
        }
        if let Some(msg) = &event.message {
            line.push_str(&format!(" message={:?}", msg));
        }
        if let Some(err) = &event.error {
            line.push_str(&format!(" error={:?}", err));
        }
        log::log!(target: "walletview", level, "{}", line);
    }
}

/// Keeps events in memory, for tests and in-app diagnostics
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events, oldest first
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Recorded events with the given name
    pub fn named(&self, event: &str) -> Vec<LogEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.event == event)
            .collect()
    }
}

impl LogSink for MemorySink {
    fn record(&self, event: LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Sends every event to each inner sink
pub struct FanoutSink {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self { sinks }
    }
}

impl LogSink for FanoutSink {
    fn record(&self, event: LogEvent) {
        for sink in &self.sinks {
            sink.record(event.clone());
        }
    }
}
