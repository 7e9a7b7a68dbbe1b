//! Collision checker counters
//!
//! - Counters only, monotonic within a pass
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters shared by every worker of a checker pass
///
/// Relaxed ordering throughout: totals are only read after the workers have
/// been joined.
#[derive(Debug, Default)]
pub struct CheckerMetrics {
    /// Candidates hashed and checked against the store
    iterations: AtomicU64,
    /// Distinct inputs that produced an existing digest
    collisions: AtomicU64,
    /// Candidates whose sanitized form was already a key
    input_collisions: AtomicU64,
    /// Candidates the hasher refused (too short after sanitization)
    rejected_candidates: AtomicU64,
    /// Records inserted into the store
    records_added: AtomicU64,
}

impl CheckerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_iterations(&self) {
        self.iterations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_collisions(&self) {
        self.collisions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_input_collisions(&self) {
        self.input_collisions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.rejected_candidates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_records_added(&self) {
        self.records_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn collisions(&self) -> u64 {
        self.collisions.load(Ordering::Relaxed)
    }

    pub fn iterations(&self) -> u64 {
        self.iterations.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            iterations: self.iterations.load(Ordering::Relaxed),
            collisions: self.collisions.load(Ordering::Relaxed),
            input_collisions: self.input_collisions.load(Ordering::Relaxed),
            rejected_candidates: self.rejected_candidates.load(Ordering::Relaxed),
            records_added: self.records_added.load(Ordering::Relaxed),
        }
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Point-in-time copy of [`CheckerMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub iterations: u64,
    pub collisions: u64,
    pub input_collisions: u64,
    pub rejected_candidates: u64,
    pub records_added: u64,
}
