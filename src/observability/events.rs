//! Lifecycle events
//!
//! Events are explicit and typed. Hot paths (hashing, lookups, inserts) emit
//! nothing; only rare structural changes and checker milestones are logged.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file read and validated
    ConfigLoaded,
    /// Encoding wheel read from disk
    WheelLoaded,
    /// Encoding wheel written to disk
    WheelSaved,

    // Index
    /// Tail segment was full, a new one was appended
    SegmentAllocated,
    /// Index reset to its initial state
    IndexCleared,

    // Collision checker
    CheckerStart,
    CheckerComplete,
    PassStart,
    PassComplete,
    /// Two distinct inputs produced the same digest
    CollisionDetected,
    /// A worker stopped on an error it could not recover from
    WorkerFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::WheelLoaded => "WHEEL_LOADED",
            Event::WheelSaved => "WHEEL_SAVED",
            Event::SegmentAllocated => "SEGMENT_ALLOCATED",
            Event::IndexCleared => "INDEX_CLEARED",
            Event::CheckerStart => "CHECKER_START",
            Event::CheckerComplete => "CHECKER_COMPLETE",
            Event::PassStart => "PASS_START",
            Event::PassComplete => "PASS_COMPLETE",
            Event::CollisionDetected => "COLLISION_DETECTED",
            Event::WorkerFailed => "WORKER_FAILED",
        }
    }

    /// Severity used by [`Logger::event`](super::Logger::event)
    pub fn severity(&self) -> Severity {
        match self {
            Event::CollisionDetected => Severity::Warn,
            Event::WorkerFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_upper_snake() {
        let events = [
            Event::ConfigLoaded,
            Event::WheelLoaded,
            Event::WheelSaved,
            Event::SegmentAllocated,
            Event::IndexCleared,
            Event::CheckerStart,
            Event::CheckerComplete,
            Event::PassStart,
            Event::PassComplete,
            Event::CollisionDetected,
            Event::WorkerFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_severities() {
        assert_eq!(Event::PassStart.severity(), Severity::Info);
        assert_eq!(Event::CollisionDetected.severity(), Severity::Warn);
        assert_eq!(Event::WorkerFailed.severity(), Severity::Error);
        assert_eq!(Event::SegmentAllocated.to_string(), "SEGMENT_ALLOCATED");
    }
}
