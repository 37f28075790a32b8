//! Pipeline progress logging.
//!
//! Thin helpers over `tracing` so pipeline code reads as a sequence of
//! user-facing steps. The binary installs the subscriber; library users get
//! whatever subscriber they have configured (or none).

use std::fmt;

/// Severity of a pipeline log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log line with optional nesting.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogEntry {
    level: LogLevel,
    message: String,
    indent: u8,
}

impl LogEntry {
    fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Emit as a `tracing` event.
    fn emit(&self) {
        match self.level {
            LogLevel::Info => tracing::info!(target: "casecounts", "{}", self),
            LogLevel::Success => tracing::info!(target: "casecounts", "{}", self),
            LogLevel::Warning => tracing::warn!(target: "casecounts", "{}", self),
            LogLevel::Error => tracing::error!(target: "casecounts", "{}", self),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.level {
            LogLevel::Success => "✓ ",
            _ => "",
        };
        let indent = "   ".repeat(self.indent as usize);
        write!(f, "{}{}{}", indent, prefix, self.message)
    }
}

pub fn log_info(msg: impl Into<String>) {
    LogEntry::info(msg).emit();
}

pub fn log_success(msg: impl Into<String>) {
    LogEntry::success(msg).emit();
}

pub fn log_warning(msg: impl Into<String>) {
    LogEntry::warning(msg).emit();
}

pub fn log_error(msg: impl Into<String>) {
    LogEntry::error(msg).emit();
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LogEntry::info(msg).with_indent(indent).emit();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefix_and_indent() {
        assert_eq!(LogEntry::success("done").to_string(), "✓ done");
        assert_eq!(LogEntry::info("step").with_indent(2).to_string(), "      step");
        assert_eq!(LogEntry::warning("careful").to_string(), "careful");
    }

    #[test]
    fn test_emit_without_subscriber() {
        log_info("no subscriber installed");
        log_error("still fine");
    }
}
