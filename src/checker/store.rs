//! Stores the checker can record (sanitized input, digest) pairs in

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::index::{DoubleHashedIndex, IndexHit, Record, VirtualAddress};

/// Shared (input, digest) store used by every worker of a pass
pub trait CollisionStore: Send + Sync {
    fn add(&self, key: String, value: String) -> VirtualAddress;
    fn contains_key(&self, key: &str) -> bool;
    fn contains_value(&self, value: &str) -> bool;
    /// Earliest stored pair whose digest equals `value`
    fn find_value(&self, value: &str) -> Option<IndexHit<String, String>>;
    fn count(&self) -> u64;
    /// Longest slot chain seen; 0 for stores without chains
    fn max_chain_length(&self) -> usize;
    fn clear(&self);
}

impl CollisionStore for DoubleHashedIndex<String, String> {
    fn add(&self, key: String, value: String) -> VirtualAddress {
        DoubleHashedIndex::add(self, Record::new(key, value))
    }

    fn contains_key(&self, key: &str) -> bool {
        DoubleHashedIndex::contains_key(self, key)
    }

    fn contains_value(&self, value: &str) -> bool {
        DoubleHashedIndex::contains_value(self, value)
    }

    fn find_value(&self, value: &str) -> Option<IndexHit<String, String>> {
        DoubleHashedIndex::find_value(self, value)
    }

    fn count(&self) -> u64 {
        DoubleHashedIndex::count(self)
    }

    fn max_chain_length(&self) -> usize {
        DoubleHashedIndex::max_chain_length(self)
    }

    fn clear(&self) {
        DoubleHashedIndex::clear(self)
    }
}

#[derive(Debug, Default)]
struct PairedMaps {
    /// key -> (address, value)
    by_key: HashMap<String, (VirtualAddress, String)>,
    /// value -> (address, key), first insert wins
    by_value: HashMap<String, (VirtualAddress, String)>,
    inserted: u64,
}

/// Baseline store: two std maps behind one mutex
#[derive(Debug, Default)]
pub struct PairedMapStore {
    maps: Mutex<PairedMaps>,
}

impl PairedMapStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            maps: Mutex::new(PairedMaps {
                by_key: HashMap::with_capacity(capacity),
                by_value: HashMap::with_capacity(capacity),
                inserted: 0,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PairedMaps> {
        self.maps.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CollisionStore for PairedMapStore {
    fn add(&self, key: String, value: String) -> VirtualAddress {
        let mut maps = self.lock();
        maps.inserted += 1;
        let address = maps.inserted;
        maps.by_value
            .entry(value.clone())
            .or_insert_with(|| (address, key.clone()));
        maps.by_key.entry(key).or_insert((address, value));
        address
    }

    fn contains_key(&self, key: &str) -> bool {
        self.lock().by_key.contains_key(key)
    }

    fn contains_value(&self, value: &str) -> bool {
        self.lock().by_value.contains_key(value)
    }

    fn find_value(&self, value: &str) -> Option<IndexHit<String, String>> {
        let maps = self.lock();
        maps.by_value.get(value).map(|(address, key)| IndexHit {
            address: *address,
            record: Record::new(key.clone(), value.to_string()),
        })
    }

    fn count(&self) -> u64 {
        self.lock().by_key.len() as u64
    }

    fn max_chain_length(&self) -> usize {
        0
    }

    fn clear(&self) {
        *self.lock() = PairedMaps::default();
    }
}
