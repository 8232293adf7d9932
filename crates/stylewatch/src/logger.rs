use log::Level;
use std::sync::{Arc, Mutex};

/// Log target used for diagnostics routed through the `log` facade
pub const LOG_TARGET: &str = "stylewatch";

/// Destination for user-facing diagnostics.
///
/// Passed into the plugin at registration instead of being a global, so embedders
/// can route messages into their own reporting and tests can capture them.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Forwards diagnostics to whatever `log` backend the binary installed
#[derive(Debug, Default, Clone, Copy)]
pub struct LogLogger;

impl Logger for LogLogger {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: LOG_TARGET, level, "{message}");
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct CaptureLogger {
    messages: Mutex<Vec<(Level, String)>>,
}

impl CaptureLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured messages, oldest first
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Whether a message at `level` containing `needle` was captured
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages().iter().any(|(l, m)| *l == level && m.contains(needle))
    }

    pub fn count(&self, level: Level) -> usize {
        self.messages().iter().filter(|(l, _)| *l == level).count()
    }
}

impl Logger for CaptureLogger {
    fn log(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}

/// Logger wrapper that drops debug messages unless verbose output was requested
#[derive(Clone)]
pub(crate) struct Diagnostics {
    logger: Arc<dyn Logger>,
    verbose: bool,
}

impl Diagnostics {
    pub(crate) fn new(logger: Arc<dyn Logger>, verbose: bool) -> Self {
        Self { logger, verbose }
    }

    pub(crate) fn debug(&self, message: &str) {
        if self.verbose {
            self.logger.debug(message);
        }
    }

    pub(crate) fn info(&self, message: &str) {
        self.logger.info(message);
    }

    pub(crate) fn warn(&self, message: &str) {
        self.logger.warn(message);
    }

    pub(crate) fn error(&self, message: &str) {
        self.logger.error(message);
    }
}
