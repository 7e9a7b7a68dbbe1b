//! CLI command implementations
//!
//! Commands write their result to the given writer; `run` wires them to
//! stdout. Lifecycle logs go to stderr so stdout carries only the result.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::json;

use crate::checker::{self, CheckerConfig};
use crate::hasher::{Hasher, HasherConfig};
use crate::observability::{Event, Logger};
use crate::wheel::EncodingWheel;

use super::args::{Command, HasherArgs};
use super::errors::CliResult;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run a command against stdout
pub fn run_command(cmd: Command) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(cmd, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn execute<W: Write>(cmd: Command, out: &mut W) -> CliResult<()> {
    match cmd {
        Command::Hash {
            input,
            trace,
            hasher,
        } => hash(&input, trace, &hasher, out),
        Command::Validate { digest, hasher } => validate(&digest, &hasher, out),
        Command::Compare { a, b, hasher } => compare(&a, &b, &hasher, out),
        Command::Shuffle {
            seed,
            output,
            alphabet,
        } => shuffle(seed, output.as_deref(), alphabet.as_deref(), out),
        Command::Check { config } => check(config.as_deref(), out),
    }
}

fn load_wheel(path: Option<&Path>) -> CliResult<EncodingWheel> {
    match path {
        Some(path) => {
            let wheel = EncodingWheel::load(path)?;
            Logger::diagnostic(
                Event::WheelLoaded,
                &[("path", &path.display().to_string())],
            );
            Ok(wheel)
        }
        None => Ok(EncodingWheel::default()),
    }
}

/// Build a hasher from the optional config and wheel files
pub fn load_hasher(args: &HasherArgs) -> CliResult<Hasher> {
    let config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            let config: HasherConfig = serde_json::from_str(&content)?;
            Logger::diagnostic(
                Event::ConfigLoaded,
                &[("path", &path.display().to_string())],
            );
            config
        }
        None => HasherConfig::default(),
    };
    let wheel = load_wheel(args.alphabet.as_deref())?;
    Ok(Hasher::new(config, wheel)?)
}

pub fn hash<W: Write>(input: &str, trace: bool, args: &HasherArgs, out: &mut W) -> CliResult<()> {
    let hasher = load_hasher(args)?;
    let result = hasher.hash_block(input)?;
    if trace {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        writeln!(out, "{}", result.digest())?;
    }
    Ok(())
}

pub fn validate<W: Write>(digest: &str, args: &HasherArgs, out: &mut W) -> CliResult<()> {
    let hasher = load_hasher(args)?;
    let valid = hasher.validate_hash(digest)?;
    writeln!(out, "{}", if valid { "valid" } else { "invalid" })?;
    Ok(())
}

pub fn compare<W: Write>(a: &str, b: &str, args: &HasherArgs, out: &mut W) -> CliResult<()> {
    let hasher = load_hasher(args)?;
    let equal = hasher.compare_hashes(a, b)?;
    writeln!(out, "{}", if equal { "equal" } else { "different" })?;
    Ok(())
}

pub fn shuffle<W: Write>(
    seed: Option<u64>,
    output: Option<&Path>,
    alphabet: Option<&Path>,
    out: &mut W,
) -> CliResult<()> {
    let mut wheel = load_wheel(alphabet)?;
    let seed = match seed {
        Some(seed) => {
            wheel.shuffle_with_seed(seed);
            seed
        }
        None => wheel.shuffle(),
    };

    if let Some(path) = output {
        wheel.save(path)?;
        Logger::diagnostic(
            Event::WheelSaved,
            &[
                ("fingerprint", &format!("{:08x}", wheel.fingerprint())),
                ("path", &path.display().to_string()),
            ],
        );
    }

    let summary = json!({
        "seed": seed,
        "wheel": wheel.to_string(),
        "fingerprint": format!("{:08x}", wheel.fingerprint()),
    });
    writeln!(out, "{}", summary)?;
    Ok(())
}

pub fn check<W: Write>(config_path: Option<&Path>, out: &mut W) -> CliResult<()> {
    let config = match config_path {
        Some(path) => CheckerConfig::load(path)?,
        None => CheckerConfig::default(),
    };
    let report = checker::run(&config)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
