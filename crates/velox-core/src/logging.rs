//! Minimal structured logging for the routing core.
//!
//! Diagnostics only: dispatch failures log at [`LogLevel::Error`], degraded
//! lookups (malformed input treated as no-route) at [`LogLevel::Debug`].
//! Expected control-flow outcomes — 404s, 405s — are never logged as failures.
//!
//! The sink is process-global and pluggable so embedders (and tests) can
//! capture entries; the default writes to stderr.

use parking_lot::RwLock;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The uppercase label for this level.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// A single log entry as handed to the sink.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
}

type Sink = Box<dyn Fn(&LogEntry) + Send + Sync>;

struct LoggerState {
    sink: Option<Sink>,
    min_level: LogLevel,
}

static LOGGER: RwLock<LoggerState> = RwLock::new(LoggerState {
    sink: None,
    min_level: LogLevel::Info,
});

/// Replace the global sink. Pass entries wherever the embedder wants them.
pub fn set_sink(sink: impl Fn(&LogEntry) + Send + Sync + 'static) {
    LOGGER.write().sink = Some(Box::new(sink));
}

/// Restore the default stderr sink.
pub fn reset_sink() {
    LOGGER.write().sink = None;
}

/// Set the minimum level that reaches the sink.
pub fn set_min_level(level: LogLevel) {
    LOGGER.write().min_level = level;
}

/// Emit an entry at the given level.
pub fn log(level: LogLevel, message: impl Into<String>) {
    let state = LOGGER.read();
    if level < state.min_level {
        return;
    }
    let entry = LogEntry {
        level,
        message: message.into(),
    };
    match &state.sink {
        Some(sink) => sink(&entry),
        None => eprintln!("[{}] {}", entry.level.as_str(), entry.message),
    }
}

/// Emit at [`LogLevel::Debug`].
pub fn debug(message: impl Into<String>) {
    log(LogLevel::Debug, message);
}

/// Emit at [`LogLevel::Warn`].
pub fn warn(message: impl Into<String>) {
    log(LogLevel::Warn, message);
}

/// Emit at [`LogLevel::Error`].
pub fn error(message: impl Into<String>) {
    log(LogLevel::Error, message);
}
