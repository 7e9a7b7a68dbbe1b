//! Paged slot table
//!
//! Maps a slot number to the chain of addresses whose item hashed there.
//! Slots are grouped in pages of [`PAGE_SLOTS`]; a page is only allocated the
//! first time one of its slots receives an address, so even the full 2^31 slot
//! domain never needs one contiguous array.

use super::record::VirtualAddress;

/// Slots per page
pub const PAGE_SLOTS: usize = 1 << 16;

type Page = Box<[Vec<VirtualAddress>]>;

#[derive(Debug)]
pub struct SlotTable {
    slot_count: usize,
    pages: Vec<Option<Page>>,
}

impl SlotTable {
    pub fn new(slot_count: usize) -> Self {
        let page_count = slot_count.div_ceil(PAGE_SLOTS);
        let mut pages = Vec::with_capacity(page_count);
        pages.resize_with(page_count, || None);
        Self { slot_count, pages }
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Pages touched so far
    pub fn allocated_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.is_some()).count()
    }

    /// Addresses in `slot`, oldest first. Empty for untouched or out-of-range
    /// slots.
    pub fn chain(&self, slot: usize) -> &[VirtualAddress] {
        let (page, offset) = Self::split(slot);
        match self.pages.get(page) {
            Some(Some(page)) => page.get(offset).map(Vec::as_slice).unwrap_or(&[]),
            _ => &[],
        }
    }

    /// Append `address` to the chain of `slot`, returning the new chain length.
    /// Out-of-range slots are ignored and report 0.
    pub fn push(&mut self, slot: usize, address: VirtualAddress) -> usize {
        if slot >= self.slot_count {
            return 0;
        }
        let (page, offset) = Self::split(slot);
        let page_len = PAGE_SLOTS.min(self.slot_count - page * PAGE_SLOTS);

        let Some(entry) = self.pages.get_mut(page) else {
            return 0;
        };
        let page = entry.get_or_insert_with(|| {
            let mut slots = Vec::with_capacity(page_len);
            slots.resize_with(page_len, Vec::new);
            slots.into_boxed_slice()
        });

        let chain = &mut page[offset];
        chain.push(address);
        chain.len()
    }

    /// Drop the first occurrence of `address` from `slot`, keeping the order
    /// of the rest
    pub fn remove(&mut self, slot: usize, address: VirtualAddress) -> bool {
        let (page, offset) = Self::split(slot);
        let Some(Some(page)) = self.pages.get_mut(page) else {
            return false;
        };
        let Some(chain) = page.get_mut(offset) else {
            return false;
        };
        match chain.iter().position(|&a| a == address) {
            Some(pos) => {
                chain.remove(pos);
                true
            }
            None => false,
        }
    }

    fn split(slot: usize) -> (usize, usize) {
        (slot / PAGE_SLOTS, slot % PAGE_SLOTS)
    }
}
