//! CLI argument definitions using clap
//!
//! Commands:
//! - wheelhash hash <INPUT> [--trace]
//! - wheelhash validate <DIGEST>
//! - wheelhash compare <A> <B>
//! - wheelhash shuffle [--seed N] [--output PATH]
//! - wheelhash check [--config PATH]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// wheelhash - short, human-readable digests and collision checks
#[derive(Parser, Debug)]
#[command(name = "wheelhash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where the hasher configuration and wheel come from
#[derive(Args, Debug, Clone, Default)]
pub struct HasherArgs {
    /// JSON hasher configuration; defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Persisted wheel; the default 32-glyph wheel when omitted
    #[arg(long)]
    pub alphabet: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the digest of INPUT
    Hash {
        input: String,

        /// Print the full hashing result as JSON
        #[arg(long)]
        trace: bool,

        #[command(flatten)]
        hasher: HasherArgs,
    },

    /// Check a digest against its trailing check glyph
    Validate {
        digest: String,

        #[command(flatten)]
        hasher: HasherArgs,
    },

    /// Compare two digests, ignoring separators, spacing and casing
    Compare {
        a: String,
        b: String,

        #[command(flatten)]
        hasher: HasherArgs,
    },

    /// Shuffle a wheel and optionally persist it
    Shuffle {
        /// Reproduce a previous shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Write the shuffled wheel here
        #[arg(long)]
        output: Option<PathBuf>,

        /// Wheel to start from
        #[arg(long)]
        alphabet: Option<PathBuf>,
    },

    /// Run the collision checker
    Check {
        /// JSON checker configuration; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
