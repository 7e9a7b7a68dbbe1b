//! CLI module for wheelhash
//!
//! Provides command-line interface for:
//! - hash: Digest of one input block
//! - validate: Check a digest's trailing check glyph
//! - compare: Format-tolerant digest equality
//! - shuffle: Shuffle and persist an encoding wheel
//! - check: Run the collision checker

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, HasherArgs};
pub use commands::{check, compare, execute, hash, load_hasher, run, run_command, shuffle, validate};
pub use errors::{CliError, CliErrorCode, CliResult};
