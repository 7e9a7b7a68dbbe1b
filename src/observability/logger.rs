//! Structured JSON logger
//!
//! - One line per event
//! - `event` first, then `severity`, then fields sorted by key
//! - Synchronous, no buffering
//! - ERROR and FATAL go to stderr, everything else to stdout

use std::fmt;
use std::io::{self, Write};

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    fn uses_stderr(&self) -> bool {
        *self >= Severity::Error
    }
}

/// Output stream a log line is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    /// Diagnostics always go to stderr, other lines only from ERROR up
    pub fn route(severity: Severity, diagnostic: bool) -> Self {
        if diagnostic || severity.uses_stderr() {
            Stream::Stderr
        } else {
            Stream::Stdout
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stateless JSON line logger
pub struct Logger;

impl Logger {
    /// Log `event` with its default severity
    pub fn event(event: Event, fields: &[(&str, &str)]) {
        Self::log(event.severity(), event.as_str(), fields);
    }

    /// Log `event` to stderr at any severity. For commands whose stdout
    /// carries their result.
    pub fn diagnostic(event: Event, fields: &[(&str, &str)]) {
        let severity = event.severity();
        let line = Self::format_line(severity, event.as_str(), fields);
        Self::emit(Stream::route(severity, true), &line);
    }

    /// Log a free-form event name at `severity`
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = Self::format_line(severity, event, fields);
        Self::emit(Stream::route(severity, false), &line);
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    /// Render one log line, newline included
    pub fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);

        let mut line = String::with_capacity(64 + fields.len() * 24);
        line.push_str("{\"event\":");
        push_json_string(&mut line, event);
        line.push_str(",\"severity\":");
        push_json_string(&mut line, severity.as_str());

        for (key, value) in sorted {
            line.push(',');
            push_json_string(&mut line, key);
            line.push(':');
            push_json_string(&mut line, value);
        }

        line.push_str("}\n");
        line
    }

    fn emit(stream: Stream, line: &str) {
        match stream {
            Stream::Stdout => Self::write_line(line, &mut io::stdout().lock()),
            Stream::Stderr => Self::write_line(line, &mut io::stderr().lock()),
        }
    }

    // Logging never fails the caller
    fn write_line<W: Write>(line: &str, writer: &mut W) {
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

fn push_json_string(out: &mut String, s: &str) {
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => out.push_str("\"\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
        assert!(Severity::Error.uses_stderr());
        assert!(!Severity::Warn.uses_stderr());
    }

    #[test]
    fn test_stream_routing() {
        assert_eq!(Stream::route(Severity::Info, false), Stream::Stdout);
        assert_eq!(Stream::route(Severity::Warn, false), Stream::Stdout);
        assert_eq!(Stream::route(Severity::Error, false), Stream::Stderr);
        assert_eq!(Stream::route(Severity::Trace, true), Stream::Stderr);
        assert_eq!(Stream::route(Severity::Info, true), Stream::Stderr);
    }

    #[test]
    fn test_line_is_json() {
        let line = Logger::format_line(Severity::Info, "PASS_START", &[("pass", "1")]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "PASS_START");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["pass"], "1");
    }

    #[test]
    fn test_field_order_is_deterministic() {
        let a = Logger::format_line(
            Severity::Info,
            "TEST",
            &[("zebra", "1"), ("apple", "2"), ("mango", "3")],
        );
        let b = Logger::format_line(
            Severity::Info,
            "TEST",
            &[("mango", "3"), ("zebra", "1"), ("apple", "2")],
        );
        assert_eq!(a, b);

        let apple = a.find("apple").unwrap();
        let mango = a.find("mango").unwrap();
        let zebra = a.find("zebra").unwrap();
        assert!(a.find("\"event\"").unwrap() < a.find("\"severity\"").unwrap());
        assert!(apple < mango && mango < zebra);
    }

    #[test]
    fn test_escapes_and_single_line() {
        let line = Logger::format_line(
            Severity::Warn,
            "TEST",
            &[("key1", "A1 <--@--> \"B2\"\nnext")],
        );
        assert_eq!(line.matches('\n').count(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["key1"], "A1 <--@--> \"B2\"\nnext");
    }
}
