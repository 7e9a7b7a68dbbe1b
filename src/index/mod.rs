//! Index subsystem
//!
//! In-memory associative store for very large record counts, with lookup by
//! key and by value.
//!
//! # Design Principles
//!
//! - Segmented storage: no single array holds the whole data set
//! - Stable addresses: removal tombstones, addresses are never reused
//! - Chained slots: slot aliasing is resolved by comparing stored items
//! - No persistence: process-lifetime only
//!
//! # Invariants
//!
//! - Every live record has exactly one address, assigned at insertion
//! - Addresses increase monotonically across segment boundaries
//! - A new segment is allocated exactly when the tail segment is full
//! - `count` is the sum of live records; `capacity` the sum of segment capacities

mod double_hashed;
mod errors;
mod policy;
mod record;
mod segment;
mod slots;

pub use double_hashed::{DoubleHashedIndex, IndexConfig, DEFAULT_SEGMENT_CAPACITY};
pub use errors::{IndexError, IndexErrorCode, IndexResult};
pub use policy::{slot_count, FixedCompression, SlotCountPolicy, TieredCompression};
pub use record::{IndexHit, Record, VirtualAddress};
pub use segment::{Locator, Segment};
pub use slots::{SlotTable, PAGE_SLOTS};
