#![forbid(unsafe_code)]

//! Sparse slot → cell mapping and vacancy search.
//!
//! The registry is the single source of truth for where each cell
//! logically lives. Keys are unique; every key lies at or below the
//! layout's maximum slot under normal operation, except for soft-overflow
//! cells added while the grid was full, which carry larger slots until
//! the grid grows or they are moved.

use ahash::AHashMap;
use cubby_core::{GridLayout, Slot};

/// One cell: its current slot, the application payload, and an optional
/// back-reference into the rendering layer.
///
/// Slots are placements, not identities; `slot` always equals the
/// registry key the record is stored under.
#[derive(Debug, Clone)]
pub struct CellRecord<T, H> {
    /// Current placement. Mirrors the registry key.
    pub slot: Slot,
    /// Application payload. Owned by the host, never interpreted here.
    pub payload: T,
    /// Render handle, if the provider produced a view for this item.
    pub handle: Option<H>,
}

/// Sparse mapping from slot to [`CellRecord`].
#[derive(Debug, Clone, Default)]
pub struct Registry<T, H> {
    cells: AHashMap<u32, CellRecord<T, H>>,
}

impl<T, H> Registry<T, H> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: AHashMap::new(),
        }
    }

    /// Number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the registry holds no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether a slot is occupied.
    #[inline]
    #[must_use]
    pub fn contains(&self, slot: Slot) -> bool {
        self.cells.contains_key(&slot.get())
    }

    /// The record at a slot, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, slot: Slot) -> Option<&CellRecord<T, H>> {
        self.cells.get(&slot.get())
    }

    /// Mutable record at a slot, if any.
    #[inline]
    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut CellRecord<T, H>> {
        self.cells.get_mut(&slot.get())
    }

    /// Iterate over all records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &CellRecord<T, H>> {
        self.cells.values()
    }

    /// Insert a record at its slot. Returns the displaced record if the
    /// slot was occupied; callers resolve collisions before inserting, so
    /// a displaced record indicates a bookkeeping bug upstream.
    pub fn insert(&mut self, record: CellRecord<T, H>) -> Option<CellRecord<T, H>> {
        self.cells.insert(record.slot.get(), record)
    }

    /// Remove and return the record at a slot.
    pub fn remove(&mut self, slot: Slot) -> Option<CellRecord<T, H>> {
        self.cells.remove(&slot.get())
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Rekey the record at `old` to `new` in one call, keeping the
    /// record's own slot in sync. No observer can see both keys present
    /// or both absent. Returns `false` (and changes nothing) if `old` is
    /// vacant or `new` is occupied.
    pub fn move_to(&mut self, old: Slot, new: Slot) -> bool {
        if old == new {
            return self.contains(old);
        }
        if self.contains(new) || !self.contains(old) {
            return false;
        }
        let mut record = self
            .cells
            .remove(&old.get())
            .unwrap_or_else(|| unreachable!("occupancy checked above"));
        record.slot = new;
        self.cells.insert(new.get(), record);
        true
    }

    /// Smallest vacant slot inside the visible matrix, `None` iff the
    /// grid is full.
    #[must_use]
    pub fn find_min_vacant(&self, layout: &GridLayout) -> Option<Slot> {
        (0..layout.capacity())
            .map(Slot::new)
            .find(|slot| !self.contains(*slot))
    }

    /// Smallest vacant slot with no upper bound. Used as the
    /// soft-overflow fallback when the visible matrix is full; always
    /// terminates because the registry is finite.
    #[must_use]
    pub fn find_min_vacant_unbounded(&self) -> Slot {
        (0..)
            .map(Slot::new)
            .find(|slot| !self.contains(*slot))
            .unwrap_or_else(|| unreachable!("registry is finite"))
    }

    /// Whether every visible slot is occupied.
    #[must_use]
    pub fn is_full(&self, layout: &GridLayout) -> bool {
        self.find_min_vacant(layout).is_none()
    }
}
