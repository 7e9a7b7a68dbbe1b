//! Encoding wheel subsystem
//!
//! The wheel is the alphabet digests are written in. It defines the numeral
//! base of every reduction round and the glyph each index transposes to.
//!
//! # Invariants
//!
//! - Glyphs are unique and the wheel is never empty
//! - Rotation accumulates unbounded and is normalized only on read
//! - Same seed + same starting order => same shuffle

mod document;
mod encoding;
mod errors;

pub use document::WheelDocument;
pub use encoding::{EncodingWheel, DEFAULT_GLYPHS};
pub use errors::{WheelError, WheelResult};
