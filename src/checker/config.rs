//! Collision checker configuration
//!
//! Read from a JSON file; every field is optional and falls back to the
//! defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CheckerError, CheckerResult};
use crate::hasher::HasherConfig;
use crate::observability::{Event, Logger};

/// Upper bound on worker threads per pass
pub const MAX_THREADS: usize = 1024;

/// Collision checker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Candidates hashed per pass, across all workers
    #[serde(default = "default_iterations")]
    pub iterations: u64,

    /// Characters per generated candidate
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Worker threads per pass
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Passes, each with a fresh store
    #[serde(default = "default_repetitions")]
    pub repetitions: u32,

    /// Double-hashed index instead of the paired-map baseline
    #[serde(default = "default_true")]
    pub use_double_hashed_index: bool,

    #[serde(default = "default_true")]
    pub compress_maps: bool,

    /// Collision lines are appended here
    #[serde(default = "default_collision_log")]
    pub collision_log: PathBuf,

    /// Persisted wheel to hash with; the default wheel when absent
    #[serde(default)]
    pub alphabet_file: Option<PathBuf>,

    /// Master seed for candidate generation; drawn from the OS when absent
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_hasher")]
    pub hasher: HasherConfig,
}

fn default_iterations() -> u64 {
    7_000_000
}
fn default_block_size() -> usize {
    72
}
fn default_threads() -> usize {
    16
}
fn default_repetitions() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_collision_log() -> PathBuf {
    PathBuf::from("collisions.log")
}
fn default_hasher() -> HasherConfig {
    HasherConfig::with_min_hash_size(14)
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            block_size: default_block_size(),
            threads: default_threads(),
            repetitions: default_repetitions(),
            use_double_hashed_index: true,
            compress_maps: true,
            collision_log: default_collision_log(),
            alphabet_file: None,
            seed: None,
            hasher: default_hasher(),
        }
    }
}

impl CheckerConfig {
    /// Read and validate a config file
    pub fn load(path: &Path) -> CheckerResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: CheckerConfig = serde_json::from_str(&content)?;
        config.validate()?;

        Logger::event(
            Event::ConfigLoaded,
            &[("path", &path.display().to_string())],
        );
        Ok(config)
    }

    pub fn validate(&self) -> CheckerResult<()> {
        if self.threads == 0 || self.threads > MAX_THREADS {
            return Err(CheckerError::InvalidConfig(format!(
                "threads must lie in 1..={}, got {}",
                MAX_THREADS, self.threads
            )));
        }
        if self.repetitions == 0 {
            return Err(CheckerError::InvalidConfig(
                "repetitions must be at least 1".into(),
            ));
        }

        self.hasher.validate()?;

        let minimum = self.hasher.minimum_input_size();
        if self.block_size < minimum || self.block_size > crate::hasher::MAX_INPUT_LEN - 1 {
            return Err(CheckerError::InvalidConfig(format!(
                "block_size {} must lie in {}..{}",
                self.block_size,
                minimum,
                crate::hasher::MAX_INPUT_LEN
            )));
        }
        Ok(())
    }

    /// Total candidates across all passes
    pub fn total_candidates(&self) -> u64 {
        self.iterations.saturating_mul(self.repetitions as u64)
    }
}
