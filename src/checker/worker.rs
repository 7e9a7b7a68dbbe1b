//! Collision worker
//!
//! Each worker generates candidates, hashes them with the shared hasher and
//! records them in the shared store. A candidate whose digest is already
//! stored under a different input is a collision.

use serde::Serialize;

use super::candidate::CandidateGenerator;
use super::collision_log::CollisionLog;
use super::errors::CheckerResult;
use super::store::CollisionStore;
use crate::hasher::Hasher;
use crate::observability::{CheckerMetrics, Event, Logger};

/// Per-worker totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkerSummary {
    pub iterations: u64,
    pub collisions: u64,
    pub input_collisions: u64,
    pub rejected_candidates: u64,
}

impl WorkerSummary {
    pub fn merge(&mut self, other: &WorkerSummary) {
        self.iterations += other.iterations;
        self.collisions += other.collisions;
        self.input_collisions += other.input_collisions;
        self.rejected_candidates += other.rejected_candidates;
    }
}

pub struct Worker<'a> {
    id: usize,
    iterations: u64,
    generator: CandidateGenerator,
    hasher: &'a Hasher,
    store: &'a dyn CollisionStore,
    log: &'a CollisionLog,
    metrics: &'a CheckerMetrics,
}

impl<'a> Worker<'a> {
    pub fn new(
        id: usize,
        iterations: u64,
        generator: CandidateGenerator,
        hasher: &'a Hasher,
        store: &'a dyn CollisionStore,
        log: &'a CollisionLog,
        metrics: &'a CheckerMetrics,
    ) -> Self {
        Self {
            id,
            iterations,
            generator,
            hasher,
            store,
            log,
            metrics,
        }
    }

    pub fn run(mut self) -> CheckerResult<WorkerSummary> {
        let mut summary = WorkerSummary::default();

        for _ in 0..self.iterations {
            let (key, digest) = self.next_unique(&mut summary)?;
            summary.iterations += 1;
            self.metrics.increment_iterations();

            match self.store.find_value(&digest) {
                Some(hit) => {
                    summary.collisions += 1;
                    self.metrics.increment_collisions();
                    self.log.record(&hit.record.key, &key, &digest)?;
                    self.report_collision(&hit.record.key, &key, &digest);
                }
                None => {
                    self.store.add(key, digest);
                    self.metrics.increment_records_added();
                }
            }
        }

        Ok(summary)
    }

    /// Next (sanitized input, digest) whose input is not yet stored.
    /// Candidates the hasher rejects are replaced, other hashing errors stop
    /// the worker.
    fn next_unique(&mut self, summary: &mut WorkerSummary) -> CheckerResult<(String, String)> {
        loop {
            let input = self.generator.next_candidate();
            let key = self.hasher.sanitize_input(&input)?;
            if self.store.contains_key(&key) {
                summary.input_collisions += 1;
                self.metrics.increment_input_collisions();
                continue;
            }

            match self.hasher.compute_hash(&input) {
                Ok(digest) => return Ok((key, digest)),
                Err(e) if e.is_input_error() => {
                    summary.rejected_candidates += 1;
                    self.metrics.increment_rejected();
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn report_collision(&self, key1: &str, key2: &str, digest: &str) {
        // Both stored inputs must hash to the same digest again
        let confirmed = match (
            self.hasher.compute_hash(key1),
            self.hasher.compute_hash(key2),
        ) {
            (Ok(a), Ok(b)) => self.hasher.compare_hashes(&a, &b).unwrap_or(false),
            _ => false,
        };

        Logger::event(
            Event::CollisionDetected,
            &[
                ("confirmed", if confirmed { "true" } else { "false" }),
                ("digest", digest),
                ("key1", key1),
                ("key2", key2),
                ("worker", &self.id.to_string()),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::store::PairedMapStore;
    use crate::hasher::HasherConfig;
    use crate::wheel::EncodingWheel;

    #[test]
    fn test_every_iteration_adds_or_collides() {
        let hasher = Hasher::default();
        let store = PairedMapStore::default();
        let log = CollisionLog::sink();
        let metrics = CheckerMetrics::new();

        let worker = Worker::new(
            0,
            300,
            CandidateGenerator::new(1, 24),
            &hasher,
            &store,
            &log,
            &metrics,
        );
        let summary = worker.run().unwrap();

        assert_eq!(summary.iterations, 300);
        assert_eq!(store.count() + summary.collisions, 300);
        assert_eq!(log.lines(), summary.collisions);
        assert_eq!(metrics.snapshot().records_added, store.count());
    }

    #[test]
    fn test_small_digests_collide() {
        // 3-glyph digests over a 2-glyph wheel: at most 8 distinct digests
        let config = HasherConfig {
            min_hash_size: 3,
            readable_formatting: false,
            ..HasherConfig::default()
        };
        let wheel = EncodingWheel::new("01".chars()).unwrap();
        let hasher = Hasher::new(config, wheel).unwrap();
        let store = PairedMapStore::default();
        let log = CollisionLog::sink();
        let metrics = CheckerMetrics::new();

        let summary = Worker::new(
            3,
            100,
            CandidateGenerator::new(5, 16),
            &hasher,
            &store,
            &log,
            &metrics,
        )
        .run()
        .unwrap();

        assert!(summary.collisions > 0);
        assert_eq!(store.count() + summary.collisions, 100);
    }

    #[test]
    fn test_merge() {
        let mut total = WorkerSummary::default();
        let part = WorkerSummary {
            iterations: 5,
            collisions: 1,
            input_collisions: 2,
            rejected_candidates: 3,
        };
        total.merge(&part);
        total.merge(&part);
        assert_eq!(total.iterations, 10);
        assert_eq!(total.rejected_candidates, 6);
    }
}
