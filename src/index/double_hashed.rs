//! Double-hashed, segmented record index
//!
//! Records live in an arena of fixed-capacity [`Segment`]s addressed by a
//! global, 1-based [`VirtualAddress`]. Two slot tables map the compressed hash
//! of every key and of every value to the chains of addresses that hashed
//! there, so a record can be found from either side.
//!
//! # Address arithmetic
//!
//! ```text
//! segment     = (address - 1) / segment_capacity
//! base_offset = segment * segment_capacity
//! physical    = address - base_offset - 1
//! ```
//!
//! # Concurrency
//!
//! One `RwLock` guards the whole structure. Lookups share it; `add`,
//! `add_range`, `set`, `remove`, `remove_at` and `clear` hold it exclusively
//! and are fully serialized across threads. Bulk inserts take the lock once
//! and call the same already-locked insert primitive as `add`.

use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use super::errors::{IndexError, IndexResult};
use super::policy::{slot_count, SlotCountPolicy, TieredCompression};
use super::record::{IndexHit, Record, VirtualAddress};
use super::segment::{Locator, Segment};
use super::slots::SlotTable;
use crate::observability::{Event, Logger};

/// Records per segment unless configured otherwise
pub const DEFAULT_SEGMENT_CAPACITY: usize = 2_000_000;

/// Index configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Expected number of records; sizes the compressed slot tables
    #[serde(default = "default_expected_capacity")]
    pub expected_capacity: u64,

    /// Divide hash codes by the policy's compression factor. When off, every
    /// 31-bit hash code is its own slot.
    #[serde(default = "default_true")]
    pub compress_maps: bool,

    #[serde(default = "default_segment_capacity")]
    pub segment_capacity: usize,

    /// Resolve exact (key, value) lookups through the key chain rather than
    /// the value chain. Throughput knob only, results are identical.
    #[serde(default = "default_true")]
    pub prefer_key_map_addresses: bool,
}

fn default_expected_capacity() -> u64 {
    1_000_000
}
fn default_true() -> bool {
    true
}
fn default_segment_capacity() -> usize {
    DEFAULT_SEGMENT_CAPACITY
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            expected_capacity: default_expected_capacity(),
            compress_maps: true,
            segment_capacity: DEFAULT_SEGMENT_CAPACITY,
            prefer_key_map_addresses: true,
        }
    }
}

impl IndexConfig {
    pub fn with_capacity(expected_capacity: u64) -> Self {
        Self {
            expected_capacity,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> IndexResult<()> {
        if self.segment_capacity == 0 {
            return Err(IndexError::invalid_config(
                "segment_capacity must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// State guarded by the index lock
struct IndexInner<K, V> {
    segments: Vec<Segment<Record<K, V>>>,
    key_map: SlotTable,
    value_map: SlotTable,
}

impl<K, V> IndexInner<K, V> {
    fn new(segment_capacity: usize, slot_count: usize) -> Self {
        Self {
            segments: vec![Segment::new(0, segment_capacity)],
            key_map: SlotTable::new(slot_count),
            value_map: SlotTable::new(slot_count),
        }
    }
}

/// In-memory associative store with reverse lookup by key and by value
pub struct DoubleHashedIndex<K, V, S = BuildHasherDefault<DefaultHasher>> {
    config: IndexConfig,
    compression_factor: u32,
    hash_builder: S,
    inner: RwLock<IndexInner<K, V>>,
    /// Longest slot chain seen since the last clear
    max_chain_len: AtomicUsize,
}

impl<K, V> DoubleHashedIndex<K, V>
where
    K: Hash + Eq,
    V: Hash + Eq,
{
    /// Index with the default config sized for `expected_capacity` records
    pub fn with_capacity(expected_capacity: u64) -> Self {
        let config = IndexConfig::with_capacity(expected_capacity);
        let factor = TieredCompression.compression_factor(expected_capacity);
        Self::build(config, factor, BuildHasherDefault::default())
    }

    /// Index sized by [`TieredCompression`]
    pub fn new(config: IndexConfig) -> IndexResult<Self> {
        Self::with_policy(config, &TieredCompression)
    }

    pub fn with_policy(config: IndexConfig, policy: &dyn SlotCountPolicy) -> IndexResult<Self> {
        Self::with_policy_and_hasher(config, policy, BuildHasherDefault::default())
    }
}

impl<K, V, S> DoubleHashedIndex<K, V, S>
where
    K: Hash + Eq,
    V: Hash + Eq,
    S: BuildHasher,
{
    pub fn with_policy_and_hasher(
        config: IndexConfig,
        policy: &dyn SlotCountPolicy,
        hash_builder: S,
    ) -> IndexResult<Self> {
        config.validate()?;

        let factor = if config.compress_maps {
            policy.compression_factor(config.expected_capacity)
        } else {
            1
        };
        if factor == 0 {
            return Err(IndexError::invalid_config(
                "compression factor must be greater than zero",
            ));
        }

        Ok(Self::build(config, factor, hash_builder))
    }

    fn build(config: IndexConfig, compression_factor: u32, hash_builder: S) -> Self {
        let inner = IndexInner::new(config.segment_capacity, slot_count(compression_factor));
        Self {
            config,
            compression_factor,
            hash_builder,
            inner: RwLock::new(inner),
            max_chain_len: AtomicUsize::new(0),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexInner<K, V>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexInner<K, V>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Compressed slot of a key or value
    fn slot_of<Q: Hash + ?Sized>(&self, item: &Q) -> usize {
        let code = (self.hash_builder.hash_one(item) as u32) & 0x7FFF_FFFF;
        (code / self.compression_factor) as usize
    }

    fn segment_for<'a>(
        &self,
        inner: &'a IndexInner<K, V>,
        address: VirtualAddress,
    ) -> Option<&'a Segment<Record<K, V>>> {
        if address == 0 {
            return None;
        }
        let segment = (address - 1) / self.config.segment_capacity as u64;
        inner.segments.get(segment as usize)
    }

    /// Insert a record, returning its address
    pub fn add(&self, record: Record<K, V>) -> VirtualAddress {
        let mut inner = self.write();
        self.insert_locked(&mut inner, record)
    }

    /// Insert every record under one exclusive lock. Addresses are contiguous.
    pub fn add_range<I>(&self, records: I) -> Vec<VirtualAddress>
    where
        I: IntoIterator<Item = Record<K, V>>,
    {
        let mut inner = self.write();
        records
            .into_iter()
            .map(|record| self.insert_locked(&mut inner, record))
            .collect()
    }

    /// Insert primitive. The caller holds the exclusive lock.
    fn insert_locked(&self, inner: &mut IndexInner<K, V>, record: Record<K, V>) -> VirtualAddress {
        let key_slot = self.slot_of(&record.key);
        let value_slot = self.slot_of(&record.value);

        let mut record = record;
        let address = loop {
            if let Some(tail) = inner.segments.last() {
                match tail.add(record) {
                    Ok(address) => break address,
                    Err(returned) => record = returned,
                }
            }
            self.allocate_segment(inner);
        };

        let key_chain = inner.key_map.push(key_slot, address);
        let value_chain = inner.value_map.push(value_slot, address);
        self.max_chain_len
            .fetch_max(key_chain.max(value_chain), Ordering::Relaxed);

        address
    }

    fn allocate_segment(&self, inner: &mut IndexInner<K, V>) {
        let index = inner.segments.len();
        let base_offset = index as u64 * self.config.segment_capacity as u64;
        inner
            .segments
            .push(Segment::new(base_offset, self.config.segment_capacity));

        Logger::event(
            Event::SegmentAllocated,
            &[
                ("base_offset", &base_offset.to_string()),
                ("segment", &index.to_string()),
            ],
        );
    }

    fn scan_key<Q>(&self, inner: &IndexInner<K, V>, key: &Q) -> Option<VirtualAddress>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        inner
            .key_map
            .chain(self.slot_of(key))
            .iter()
            .copied()
            .find(|&address| {
                self.segment_for(inner, address)
                    .and_then(|s| s.inspect(Locator::Virtual(address), |r| r.key.borrow() == key))
                    .unwrap_or(false)
            })
    }

    fn scan_value<Q>(&self, inner: &IndexInner<K, V>, value: &Q) -> Option<VirtualAddress>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        inner
            .value_map
            .chain(self.slot_of(value))
            .iter()
            .copied()
            .find(|&address| {
                self.segment_for(inner, address)
                    .and_then(|s| {
                        s.inspect(Locator::Virtual(address), |r| r.value.borrow() == value)
                    })
                    .unwrap_or(false)
            })
    }

    fn scan_item(&self, inner: &IndexInner<K, V>, record: &Record<K, V>) -> Option<VirtualAddress> {
        let chain = if self.config.prefer_key_map_addresses {
            inner.key_map.chain(self.slot_of(&record.key))
        } else {
            inner.value_map.chain(self.slot_of(&record.value))
        };

        chain.iter().copied().find(|&address| {
            self.segment_for(inner, address)
                .and_then(|s| s.inspect(Locator::Virtual(address), |r| r == record))
                .unwrap_or(false)
        })
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let inner = self.read();
        self.scan_key(&inner, key).is_some()
    }

    pub fn contains_value<Q>(&self, value: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let inner = self.read();
        self.scan_value(&inner, value).is_some()
    }

    /// Address of the exact (key, value) pair
    pub fn get_index_for_item(&self, record: &Record<K, V>) -> IndexResult<VirtualAddress> {
        let inner = self.read();
        self.scan_item(&inner, record)
            .ok_or_else(IndexError::record_not_found)
    }

    pub fn contains_item(&self, record: &Record<K, V>) -> bool {
        self.get_index_for_item(record).is_ok()
    }

    /// Remove the exact (key, value) pair, returning the address it held
    pub fn remove(&self, record: &Record<K, V>) -> IndexResult<VirtualAddress> {
        let mut inner = self.write();
        let address = self
            .scan_item(&inner, record)
            .ok_or_else(IndexError::record_not_found)?;
        self.remove_locked(&mut inner, address)?;
        Ok(address)
    }

    /// Remove whatever record lives at `address`
    pub fn remove_at(&self, address: VirtualAddress) -> IndexResult<Record<K, V>> {
        let mut inner = self.write();
        self.remove_locked(&mut inner, address)
    }

    fn remove_locked(
        &self,
        inner: &mut IndexInner<K, V>,
        address: VirtualAddress,
    ) -> IndexResult<Record<K, V>> {
        let record = self
            .segment_for(inner, address)
            .and_then(|s| s.remove(Locator::Virtual(address)))
            .ok_or_else(|| IndexError::address_not_found(address))?;

        inner.key_map.remove(self.slot_of(&record.key), address);
        inner.value_map.remove(self.slot_of(&record.value), address);
        Ok(record)
    }

    /// Replace the record at `address`, returning the previous one. The
    /// address moves to the chains of the new key and value.
    pub fn set(&self, address: VirtualAddress, record: Record<K, V>) -> IndexResult<Record<K, V>> {
        let key_slot = self.slot_of(&record.key);
        let value_slot = self.slot_of(&record.value);

        let mut inner = self.write();
        let previous = self
            .segment_for(&inner, address)
            .ok_or_else(|| IndexError::address_not_found(address))?
            .set(Locator::Virtual(address), record)
            .map_err(|_| IndexError::address_not_found(address))?;

        inner.key_map.remove(self.slot_of(&previous.key), address);
        inner.value_map.remove(self.slot_of(&previous.value), address);
        let key_chain = inner.key_map.push(key_slot, address);
        let value_chain = inner.value_map.push(value_slot, address);
        self.max_chain_len
            .fetch_max(key_chain.max(value_chain), Ordering::Relaxed);

        Ok(previous)
    }

    /// Drop every record and start over from address 1
    pub fn clear(&self) {
        let mut inner = self.write();
        *inner = IndexInner::new(self.config.segment_capacity, slot_count(self.compression_factor));
        self.max_chain_len.store(0, Ordering::Relaxed);
        drop(inner);

        Logger::event(
            Event::IndexCleared,
            &[("compression_factor", &self.compression_factor.to_string())],
        );
    }

    /// Live records across all segments
    pub fn count(&self) -> u64 {
        let inner = self.read();
        inner.segments.iter().map(|s| s.len() as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Sum of segment capacities
    pub fn capacity(&self) -> u64 {
        let inner = self.read();
        inner.segments.iter().map(|s| s.capacity() as u64).sum()
    }

    pub fn segment_count(&self) -> usize {
        self.read().segments.len()
    }

    /// Longest slot chain observed since construction or the last clear
    pub fn max_chain_length(&self) -> usize {
        self.max_chain_len.load(Ordering::Relaxed)
    }

    pub fn compression_factor(&self) -> u32 {
        self.compression_factor
    }

    pub fn slot_count(&self) -> usize {
        slot_count(self.compression_factor)
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }
}

impl<K, V, S> DoubleHashedIndex<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// First record (in insertion order) whose key equals `key`
    pub fn find_key<Q>(&self, key: &Q) -> Option<IndexHit<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let inner = self.read();
        let address = self.scan_key(&inner, key)?;
        self.hit_at(&inner, address)
    }

    /// First record (in insertion order) whose value equals `value`
    pub fn find_value<Q>(&self, value: &Q) -> Option<IndexHit<K, V>>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let inner = self.read();
        let address = self.scan_value(&inner, value)?;
        self.hit_at(&inner, address)
    }

    /// Copy of the record at `address`
    pub fn get(&self, address: VirtualAddress) -> Option<Record<K, V>> {
        let inner = self.read();
        self.segment_for(&inner, address)?
            .get(Locator::Virtual(address))
    }

    fn hit_at(&self, inner: &IndexInner<K, V>, address: VirtualAddress) -> Option<IndexHit<K, V>> {
        let record = self
            .segment_for(inner, address)?
            .get(Locator::Virtual(address))?;
        Some(IndexHit { address, record })
    }
}
