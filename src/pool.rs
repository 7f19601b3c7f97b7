//! A generational free-list pool for `SupportPoint`s, so `Simplex` and
//! `Polyhedron` can hand out small integer handles instead of cloning support
//! points around. Modeled on the teacher's `utils/allocator.rs::Arena<T>`.

use std::collections::{HashSet, VecDeque};

use crate::support::SupportPoint;

/// A handle into a `SupportPointPool`. Carries a generation counter so a
/// handle from a freed slot can never be mistaken for the slot's new
/// occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SupportHandle {
    index: u32,
    generation: u32,
}

struct Slot {
    value: Option<SupportPoint>,
    generation: u32,
}

/// Pool of `SupportPoint`s shared by one `test_collision` call's GJK and EPA
/// phases. Reused across calls by the caller to amortize allocation.
#[derive(Default)]
pub struct SupportPointPool {
    slots: Vec<Slot>,
    free: VecDeque<u32>,
}

impl SupportPointPool {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: VecDeque::new(),
        }
    }

    /// Inserts a support point and returns a handle to it.
    pub fn insert(&mut self, point: SupportPoint) -> SupportHandle {
        if let Some(index) = self.free.pop_front() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(point);
            return SupportHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            value: Some(point),
            generation: 0,
        });
        SupportHandle {
            index,
            generation: 0,
        }
    }

    pub fn get(&self, handle: SupportHandle) -> Option<&SupportPoint> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Releases a handle back to the free list, bumping its generation so
    /// stale handles from before this call can no longer resolve.
    pub fn remove(&mut self, handle: SupportHandle) {
        if let Some(slot) = self.slots.get_mut(handle.index as usize) {
            if slot.generation == handle.generation && slot.value.is_some() {
                slot.value = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push_back(handle.index);
            }
        }
    }

    /// Releases every handle in `handles`, skipping duplicates so a vertex
    /// referenced by several faces during EPA teardown is freed exactly
    /// once.
    pub fn remove_all(&mut self, handles: impl IntoIterator<Item = SupportHandle>) {
        let mut seen = HashSet::new();
        for handle in handles {
            if seen.insert(handle) {
                self.remove(handle);
            }
        }
    }

    /// Drops every entry currently held, without shrinking the backing
    /// storage, so the pool can be reused for the next `test_collision` call.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.is_some() {
                slot.value = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push_back(index as u32);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.value.is_none())
    }
}
