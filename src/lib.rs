//! wheelhash - short, human-readable digests over a rotating glyph wheel
//!
//! - `wheel`: ordered, rotatable glyph alphabet and its persistence
//! - `hasher`: deterministic digest pipeline with a trailing check glyph
//! - `index`: segmented, double-hashed record index with stable addresses
//! - `checker`: multi-threaded empirical collision search
//! - `observability`: structured JSON logging and checker counters

pub mod checker;
pub mod cli;
pub mod hasher;
pub mod index;
pub mod observability;
pub mod wheel;
