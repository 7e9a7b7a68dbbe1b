//! Hasher subsystem
//!
//! Turns a text block of up to 1024 characters into a short, human-readable
//! digest written with the glyphs of an [`EncodingWheel`](crate::wheel::EncodingWheel).
//!
//! A digest is laid out as
//!
//! ```text
//! [checksum A|B] [reduced payload ...] [checksum C]
//! ```
//!
//! The leading glyph checks the sanitized input, the trailing glyph checks the
//! payload. Only the trailing glyph can be verified from a digest alone, which
//! is what [`Hasher::validate_hash`] does.
//!
//! Digests are not cryptographic and must not be used for secrets.

pub mod checksum;
mod config;
mod errors;
pub mod format;
mod pipeline;
mod result;

pub use config::{HasherConfig, MAX_INPUT_LEN};
pub use errors::{HashError, HashResult, InputStage};
pub use pipeline::Hasher;
pub use result::HashingResult;
