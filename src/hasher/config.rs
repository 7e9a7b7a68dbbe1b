//! Hasher configuration
//!
//! Everything the digest pipeline depends on besides the wheel lives here and
//! is passed at construction. Defaults: 8 significant glyphs, inputs
//! `0x30..=0x5D`, case folding and dash grouping on.

use serde::{Deserialize, Serialize};

use super::errors::{HashError, HashResult};

/// Hard upper bound on input length, in characters
pub const MAX_INPUT_LEN: usize = 1024;

/// Configuration of the digest pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasherConfig {
    /// Minimum count of significant digest glyphs, separators excluded
    #[serde(default = "default_min_hash_size")]
    pub min_hash_size: usize,

    /// Lowest accepted input character (inclusive)
    #[serde(default = "default_input_trimming_low")]
    pub input_trimming_low: u8,

    /// Highest accepted input character (inclusive)
    #[serde(default = "default_input_trimming_high")]
    pub input_trimming_high: u8,

    /// Uppercase the input before filtering
    #[serde(default = "default_true")]
    pub ignore_casing: bool,

    /// Split the digest into separator-delimited groups
    #[serde(default = "default_true")]
    pub readable_formatting: bool,

    /// Group separator; must not be a wheel glyph
    #[serde(default = "default_separator")]
    pub separator: char,
}

fn default_min_hash_size() -> usize {
    8
}
fn default_input_trimming_low() -> u8 {
    0x30
}
fn default_input_trimming_high() -> u8 {
    0x5D
}
fn default_true() -> bool {
    true
}
fn default_separator() -> char {
    '-'
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            min_hash_size: default_min_hash_size(),
            input_trimming_low: default_input_trimming_low(),
            input_trimming_high: default_input_trimming_high(),
            ignore_casing: true,
            readable_formatting: true,
            separator: default_separator(),
        }
    }
}

impl HasherConfig {
    /// Config with a different minimum digest size, other fields default
    pub fn with_min_hash_size(min_hash_size: usize) -> Self {
        Self {
            min_hash_size,
            ..Self::default()
        }
    }

    /// Shortest input accepted, before and after sanitization:
    /// `((h - 2) * 2) - 1`, saturating at `usize::MAX`
    pub fn minimum_input_size(&self) -> usize {
        self.min_hash_size
            .saturating_sub(2)
            .saturating_mul(2)
            .saturating_sub(1)
    }

    /// Check internal consistency. Wheel-dependent checks happen in
    /// [`Hasher::new`](super::Hasher::new).
    pub fn validate(&self) -> HashResult<()> {
        if self.min_hash_size < 3 {
            return Err(HashError::InvalidConfig(format!(
                "min_hash_size must be >= 3, got {}",
                self.min_hash_size
            )));
        }

        if self.minimum_input_size() > MAX_INPUT_LEN {
            return Err(HashError::InvalidConfig(format!(
                "min_hash_size {} requires inputs longer than {} characters",
                self.min_hash_size, MAX_INPUT_LEN
            )));
        }

        if self.input_trimming_low > self.input_trimming_high {
            return Err(HashError::InvalidConfig(format!(
                "input_trimming_low 0x{:02X} is above input_trimming_high 0x{:02X}",
                self.input_trimming_low, self.input_trimming_high
            )));
        }

        Ok(())
    }

    /// Whether `c` falls inside the accepted input range
    pub fn accepts(&self, c: char) -> bool {
        let code = c as u32;
        code >= self.input_trimming_low as u32 && code <= self.input_trimming_high as u32
    }
}
