//! Injected log sink for the protocol core
//!
//! The core emits structured (severity, message) events to a sink supplied
//! at session construction; where those events go (env_logger, a test
//! collector, nowhere) is the embedder's business.

use std::sync::Mutex;

/// Severity of an emitted log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

/// Destination for log events emitted by the protocol core
pub trait LogSink: Send {
    fn log(&self, severity: Severity, message: &str);
}

impl<S: LogSink + Sync> LogSink for std::sync::Arc<S> {
    fn log(&self, severity: Severity, message: &str) {
        (**self).log(severity, message);
    }
}

/// Default sink: forwards events to the `log` crate facade, so a binary
/// that calls `env_logger::init()` gets them for free.
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => log::debug!("{}", message),
            Severity::Info => log::info!("{}", message),
            Severity::Warn => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        }
    }
}

/// Sink that discards everything
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _severity: Severity, _message: &str) {}
}

/// Sink that collects events in memory, for asserting on them in tests
pub struct MemorySink {
    events: Mutex<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self { events: Mutex::new(Vec::new()) }
    }

    pub fn events(&self) -> Vec<(Severity, String)> {
        self.events.lock().unwrap().clone()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for MemorySink {
    fn log(&self, severity: Severity, message: &str) {
        self.events.lock().unwrap().push((severity, message.to_string()));
    }
}
