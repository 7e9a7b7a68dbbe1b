//! Observability subsystem
//!
//! - Structured JSON logging, with a stderr-only diagnostic route
//! - Typed lifecycle events
//! - Atomic checker counters
//!
//! Observability is read-only: it never changes what the hasher, the index or
//! the checker compute, and a failed log write is ignored.
//!
//! ```ignore
//! use wheelhash::observability::{Event, Logger};
//!
//! Logger::event(Event::PassStart, &[("pass", "1")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity, Stream};
pub use metrics::{CheckerMetrics, MetricsSnapshot};
