//! Collision checker
//!
//! Empirical collision search over random inputs. Each pass builds a fresh
//! store, splits the iterations across worker threads that share one hasher
//! and one store, and reports how many distinct inputs produced a digest that
//! was already taken.
//!
//! # Flow
//!
//! ```text
//! config -> wheel + hasher -> for each pass:
//!     store <- workers (generate, sanitize, hash, find_value, add | log)
//! ```

mod candidate;
mod collision_log;
mod config;
mod errors;
mod store;
mod worker;

pub use candidate::CandidateGenerator;
pub use collision_log::CollisionLog;
pub use config::{CheckerConfig, MAX_THREADS};
pub use errors::{CheckerError, CheckerResult};
pub use store::{CollisionStore, PairedMapStore};
pub use worker::{Worker, WorkerSummary};

use std::thread;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

use crate::hasher::Hasher;
use crate::index::{DoubleHashedIndex, IndexConfig};
use crate::observability::{CheckerMetrics, Event, Logger, MetricsSnapshot};
use crate::wheel::EncodingWheel;

/// Outcome of one pass
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub pass: u32,
    pub stored: u64,
    pub max_chain_length: usize,
    pub elapsed_ms: i64,
    pub totals: WorkerSummary,
    pub metrics: MetricsSnapshot,
}

/// Outcome of a whole checker run
#[derive(Debug, Clone, Serialize)]
pub struct CheckerReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// CRC32 of the wheel the digests were written with
    pub wheel_fingerprint: u32,
    /// Birthday-bound probability of at least one collision over all passes
    pub clash_chance: f64,
    pub passes: Vec<PassReport>,
    pub totals: WorkerSummary,
}

impl CheckerReport {
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// `1 - e^(-k(k-1) / 2n)` with `n = glyph_count ^ digest_glyphs`
pub fn clash_chance(glyph_count: usize, digest_glyphs: usize, candidates: u64) -> f64 {
    let n = (glyph_count as f64).powi(digest_glyphs as i32);
    let k = candidates as f64;
    1.0 - (-k * (k - 1.0) / (2.0 * n)).exp()
}

/// Split `total` iterations over at most `threads` workers, spreading the
/// remainder over the first ones
pub fn split_iterations(total: u64, threads: usize) -> Vec<u64> {
    let workers = u64::try_from(threads.max(1))
        .unwrap_or(u64::MAX)
        .min(total);
    if workers == 0 {
        return Vec::new();
    }
    let base = total / workers;
    let remainder = total % workers;
    (0..workers)
        .map(|i| base + u64::from(i < remainder))
        .collect()
}

/// Load the wheel, open the collision log and run every pass
pub fn run(config: &CheckerConfig) -> CheckerResult<CheckerReport> {
    config.validate()?;

    let wheel = match &config.alphabet_file {
        Some(path) => {
            let wheel = EncodingWheel::load(path)?;
            Logger::event(
                Event::WheelLoaded,
                &[("path", &path.display().to_string())],
            );
            wheel
        }
        None => EncodingWheel::default(),
    };
    let hasher = Hasher::new(config.hasher.clone(), wheel)?;
    let log = CollisionLog::open(&config.collision_log)?;

    run_with(config, &hasher, &log)
}

/// Run every pass with a prepared hasher and log
pub fn run_with(
    config: &CheckerConfig,
    hasher: &Hasher,
    log: &CollisionLog,
) -> CheckerResult<CheckerReport> {
    config.validate()?;

    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let chance = clash_chance(
        hasher.wheel().glyph_count(),
        config.hasher.min_hash_size,
        config.total_candidates(),
    );

    Logger::event(
        Event::CheckerStart,
        &[
            ("block_size", &config.block_size.to_string()),
            ("clash_chance", &format!("{:.5}", chance * 100.0)),
            ("iterations", &config.iterations.to_string()),
            ("repetitions", &config.repetitions.to_string()),
            ("run_id", &run_id.to_string()),
            ("threads", &config.threads.to_string()),
        ],
    );

    let mut seeds = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let store = build_store(config)?;
    let mut passes = Vec::with_capacity(config.repetitions as usize);
    let mut totals = WorkerSummary::default();

    for pass in 1..=config.repetitions {
        let report = run_pass(pass, config, hasher, store.as_ref(), log, &mut seeds)?;
        totals.merge(&report.totals);
        passes.push(report);
        store.clear();
    }
    log.flush()?;

    let report = CheckerReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        wheel_fingerprint: hasher.wheel().fingerprint(),
        clash_chance: chance,
        passes,
        totals,
    };

    Logger::event(
        Event::CheckerComplete,
        &[
            ("collisions", &totals.collisions.to_string()),
            ("elapsed_ms", &report.elapsed_ms().to_string()),
            ("run_id", &run_id.to_string()),
        ],
    );
    Ok(report)
}

fn build_store(config: &CheckerConfig) -> CheckerResult<Box<dyn CollisionStore>> {
    if config.use_double_hashed_index {
        let index_config = IndexConfig {
            expected_capacity: config.iterations,
            compress_maps: config.compress_maps,
            ..IndexConfig::default()
        };
        let index: DoubleHashedIndex<String, String> = DoubleHashedIndex::new(index_config)?;
        Ok(Box::new(index))
    } else {
        let capacity = usize::try_from(config.iterations).unwrap_or(usize::MAX);
        Ok(Box::new(PairedMapStore::with_capacity(capacity.min(1 << 24))))
    }
}

fn run_pass(
    pass: u32,
    config: &CheckerConfig,
    hasher: &Hasher,
    store: &dyn CollisionStore,
    log: &CollisionLog,
    seeds: &mut StdRng,
) -> CheckerResult<PassReport> {
    let started = Utc::now();
    let metrics = CheckerMetrics::new();
    Logger::event(
        Event::PassStart,
        &[
            ("pass", &pass.to_string()),
            ("repetitions", &config.repetitions.to_string()),
        ],
    );

    let workers: Vec<Worker<'_>> = split_iterations(config.iterations, config.threads)
        .into_iter()
        .enumerate()
        .map(|(id, iterations)| {
            let generator = CandidateGenerator::new(seeds.gen(), config.block_size);
            Worker::new(id, iterations, generator, hasher, store, log, &metrics)
        })
        .collect();

    let results: Vec<(usize, CheckerResult<WorkerSummary>)> = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers.len());
        let mut spawn_failure = None;
        for (id, worker) in workers.into_iter().enumerate() {
            let spawned = thread::Builder::new()
                .name(format!("checker-worker-{}", id))
                .spawn_scoped(scope, move || worker.run());
            match spawned {
                Ok(handle) => handles.push((id, handle)),
                Err(e) => {
                    spawn_failure = Some((id, Err(CheckerError::Io(e))));
                    break;
                }
            }
        }

        let mut results: Vec<_> = handles
            .into_iter()
            .map(|(id, handle)| {
                let result = handle
                    .join()
                    .unwrap_or(Err(CheckerError::WorkerPanicked(id)));
                (id, result)
            })
            .collect();
        results.extend(spawn_failure);
        results
    });

    let mut totals = WorkerSummary::default();
    for (id, result) in results {
        match result {
            Ok(summary) => totals.merge(&summary),
            Err(e) => {
                Logger::event(
                    Event::WorkerFailed,
                    &[("code", e.code()), ("error", &e.to_string()), ("worker", &id.to_string())],
                );
                return Err(e);
            }
        }
    }

    let report = PassReport {
        pass,
        stored: store.count(),
        max_chain_length: store.max_chain_length(),
        elapsed_ms: (Utc::now() - started).num_milliseconds(),
        totals,
        metrics: metrics.snapshot(),
    };

    Logger::event(
        Event::PassComplete,
        &[
            ("collisions", &totals.collisions.to_string()),
            ("elapsed_ms", &report.elapsed_ms.to_string()),
            ("max_chain_length", &report.max_chain_length.to_string()),
            ("metrics", &metrics.to_json()),
            ("pass", &pass.to_string()),
            ("stored", &report.stored.to_string()),
        ],
    );
    Ok(report)
}
