#![forbid(unsafe_code)]

//! Process-lifecycle save/restore of grid placement.
//!
//! [`GridPersistState`] round-trips the `(slot, payload)` pairs and the
//! open edit session across a host teardown. Payloads are carried
//! opaquely; serde derives are available behind the `state-persistence`
//! feature, the type itself is always present.

/// Snapshot of cell placement and the open edit session.
///
/// Produced by [`GridView::save_state`](crate::GridView::save_state) and
/// consumed by [`GridView::restore_state`](crate::GridView::restore_state).
/// `cells` is sorted by slot so snapshots of the same board compare (and
/// serialize) identically.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct GridPersistState<T> {
    /// `(slot, payload)` pairs, ascending by slot.
    pub cells: Vec<(u32, T)>,
    /// Slot of the open edit session, if one was open.
    pub editing_slot: Option<u32>,
}
