//! Random candidate inputs
//!
//! Candidates mix digits, uppercase and lowercase ASCII letters, each class
//! equally likely, with a 10% chance of a space after every character.
//!
//! All three ranges are inclusive: `'9'`, `'Z'` and `'z'` are generated just
//! like every other member of their class.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chance of a space following each generated character
const SPACE_PROBABILITY: f64 = 0.1;

/// Seeded, deterministic candidate source
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    rng: StdRng,
    block_size: usize,
}

impl CandidateGenerator {
    pub fn new(seed: u64, block_size: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            block_size,
        }
    }

    /// Next candidate, `block_size` or `block_size + 1` characters long
    pub fn next_candidate(&mut self) -> String {
        let mut candidate = String::with_capacity(self.block_size + 1);
        while candidate.len() < self.block_size {
            // Inclusive upper bounds
            let c = match self.rng.gen_range(0..3) {
                0 => self.rng.gen_range(b'0'..=b'9'),
                1 => self.rng.gen_range(b'A'..=b'Z'),
                _ => self.rng.gen_range(b'a'..=b'z'),
            };
            candidate.push(c as char);

            if self.rng.gen_bool(SPACE_PROBABILITY) {
                candidate.push(' ');
            }
        }
        candidate
    }
}

impl Iterator for CandidateGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        Some(self.next_candidate())
    }
}
