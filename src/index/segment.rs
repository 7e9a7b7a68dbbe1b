//! Capacity-bounded record segment
//!
//! A segment owns one contiguous run of the global address space:
//! `base_offset + 1 ..= base_offset + capacity`. Records are appended in
//! order; the `n`-th record (1-based) gets address `base_offset + n`.
//!
//! Removal leaves a tombstone. Physical positions never shift, so every other
//! address stays valid and no address is ever handed out twice.
//!
//! Each segment has its own lock for direct positional access. Racing writers
//! to the same position are not ordered: the last write wins.

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::record::VirtualAddress;

/// Position of a record, either as a global address or as an offset into the
/// segment's own storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    Virtual(VirtualAddress),
    Physical(usize),
}

#[derive(Debug)]
struct SegmentInner<T> {
    /// `None` marks a removed record
    records: Vec<Option<T>>,
    live: usize,
}

#[derive(Debug)]
pub struct Segment<T> {
    base_offset: u64,
    capacity: usize,
    inner: RwLock<SegmentInner<T>>,
}

impl<T> Segment<T> {
    /// Empty segment. Storage grows on demand up to `capacity`.
    pub fn new(base_offset: u64, capacity: usize) -> Self {
        Self {
            base_offset,
            capacity,
            inner: RwLock::new(SegmentInner {
                records: Vec::new(),
                live: 0,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SegmentInner<T>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SegmentInner<T>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `item`, returning its address. A full segment hands the item
    /// back.
    pub fn add(&self, item: T) -> Result<VirtualAddress, T> {
        let mut inner = self.write();
        if inner.records.len() >= self.capacity {
            return Err(item);
        }
        inner.records.push(Some(item));
        inner.live += 1;
        Ok(self.base_offset + inner.records.len() as u64)
    }

    /// Run `f` on the live record at `locator`
    pub fn inspect<R>(&self, locator: Locator, f: impl FnOnce(&T) -> R) -> Option<R> {
        let position = self.resolve(locator)?;
        let inner = self.read();
        inner.records.get(position)?.as_ref().map(f)
    }

    /// Replace the live record at `locator`, returning the previous one.
    /// Tombstones and unused positions hand the item back.
    pub fn set(&self, locator: Locator, item: T) -> Result<T, T> {
        let Some(position) = self.resolve(locator) else {
            return Err(item);
        };
        let mut inner = self.write();
        match inner.records.get_mut(position) {
            Some(Some(existing)) => Ok(std::mem::replace(existing, item)),
            _ => Err(item),
        }
    }

    /// Tombstone the record at `locator` and return it
    pub fn remove(&self, locator: Locator) -> Option<T> {
        let position = self.resolve(locator)?;
        let mut inner = self.write();
        let removed = inner.records.get_mut(position)?.take()?;
        inner.live -= 1;
        Some(removed)
    }

    /// Live records
    pub fn len(&self) -> usize {
        self.read().live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positions handed out, tombstones included
    pub fn physical_len(&self) -> usize {
        self.read().records.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.physical_len() >= self.capacity
    }

    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// Whether `address` falls in this segment's address range, used or not
    pub fn contains_address(&self, address: VirtualAddress) -> bool {
        address > self.base_offset && address - self.base_offset <= self.capacity as u64
    }

    pub fn physical_to_virtual(&self, position: usize) -> VirtualAddress {
        self.base_offset + position as u64 + 1
    }

    pub fn virtual_to_physical(&self, address: VirtualAddress) -> Option<usize> {
        if !self.contains_address(address) {
            return None;
        }
        Some((address - self.base_offset - 1) as usize)
    }

    /// Drop every record. Addressing restarts at `base_offset + 1`.
    pub fn clear(&self) {
        let mut inner = self.write();
        inner.records.clear();
        inner.live = 0;
    }

    fn resolve(&self, locator: Locator) -> Option<usize> {
        match locator {
            Locator::Virtual(address) => self.virtual_to_physical(address),
            Locator::Physical(position) => Some(position),
        }
    }
}

impl<T: Clone> Segment<T> {
    /// Copy of the live record at `locator`
    pub fn get(&self, locator: Locator) -> Option<T> {
        self.inspect(locator, T::clone)
    }
}

impl<T> fmt::Display for Segment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Segment {}..={}, {} records",
            self.base_offset + 1,
            self.base_offset + self.capacity as u64,
            self.len()
        )
    }
}
