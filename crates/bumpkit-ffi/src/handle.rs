//! Slot+generation handle table for manually managed objects.
//!
//! Objects created through the manual surface are owned by this table, not
//! by the host. A destroyed handle keeps its slot index but carries a stale
//! generation, so a second destroy (or any access) resolves to `None`
//! instead of touching freed memory.
//!
//! Generations start at 1, so no live handle ever encodes to 0 and 0 can
//! serve as the null handle.

/// Handle encoding: upper 32 bits = slot index, lower 32 bits = generation.
fn encode(slot: u32, generation: u32) -> u64 {
    ((slot as u64) << 32) | (generation as u64)
}

fn decode(handle: u64) -> (u32, u32) {
    let slot = (handle >> 32) as u32;
    let generation = handle as u32;
    (slot, generation)
}

struct Slot<T> {
    generation: u32,
    data: Option<T>,
}

/// A slot+generation table mapping `u64` handles to owned values.
///
/// Reuses slots via a free list. Generation counters increment on removal,
/// making stale handles detectable.
pub(crate) struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
}

impl<T> HandleTable<T> {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a value and return its handle. Never returns [`BUMPKIT_NULL_HANDLE`](crate::status::BUMPKIT_NULL_HANDLE).
    pub fn insert(&mut self, value: T) -> u64 {
        if let Some(slot_idx) = self.free_list.pop() {
            let slot = &mut self.slots[slot_idx as usize];
            slot.data = Some(value);
            encode(slot_idx, slot.generation)
        } else {
            let slot_idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                data: Some(value),
            });
            encode(slot_idx, 1)
        }
    }

    /// Shared access to the value behind a handle, `None` if stale or null.
    pub fn get(&self, handle: u64) -> Option<&T> {
        let (slot_idx, generation) = decode(handle);
        let slot = self.slots.get(slot_idx as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.data.as_ref()
    }

    /// Mutable access to the value behind a handle, `None` if stale or null.
    pub fn get_mut(&mut self, handle: u64) -> Option<&mut T> {
        let (slot_idx, generation) = decode(handle);
        let slot = self.slots.get_mut(slot_idx as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.data.as_mut()
    }

    /// Remove and return the value behind a handle.
    ///
    /// Bumps the slot's generation. A slot whose generation wraps to 0 is
    /// retired instead of recycled: 0 would collide with [`BUMPKIT_NULL_HANDLE`](crate::status::BUMPKIT_NULL_HANDLE)
    /// for slot 0 and with stale handles from the first epoch elsewhere.
    /// Returns `None` for stale handles, so double removal is safe.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (slot_idx, generation) = decode(handle);
        let slot = self.slots.get_mut(slot_idx as usize)?;
        if slot.generation != generation {
            return None;
        }
        let value = slot.data.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free_list.push(slot_idx);
        }
        Some(value)
    }
}
