//! Records and lookup results

use serde::{Deserialize, Serialize};

/// Global 1-based address of a record, stable for the record's lifetime
pub type VirtualAddress = u64;

/// Ordered (key, value) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Record<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Record<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// A stored record together with the address it lives at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHit<K, V> {
    pub address: VirtualAddress,
    pub record: Record<K, V>,
}
