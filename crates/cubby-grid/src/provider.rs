#![forbid(unsafe_code)]

//! Collaborator seams: data access, notifications, and visual effects.
//!
//! The grid core owns placement and ordering; everything else crosses one
//! of three traits. [`DataProvider`] supplies payloads and persists their
//! slots, [`GridListener`] receives lifecycle notifications, and
//! [`RenderHost`] plays visual effects. All calls are synchronous: the
//! registry and slot bookkeeping are already committed when a listener or
//! render call observes them, so state queries reflect logical truth even
//! while an animation is still in flight.

use cubby_core::{Point, Rect, Slot};

/// Source of cell payloads and the authority on their stored slots.
///
/// The grid never copies or serializes payloads; it reads and writes their
/// slot through this trait and requests render handles for them. `items`
/// is a restartable snapshot, the Rust rendition of the original iterator
/// contract.
pub trait DataProvider {
    /// Application payload bound to a cell.
    type Item;
    /// Opaque back-reference into the host's rendering layer.
    type Handle;

    /// Snapshot of all items, in provider order.
    fn items(&mut self) -> Vec<Self::Item>;

    /// The item's stored slot, `None` if it has never been placed.
    fn slot(&self, item: &Self::Item) -> Option<Slot>;

    /// Persist a new slot for the item.
    fn set_slot(&mut self, item: &Self::Item, slot: Slot);

    /// Create a render handle for the item, or refresh `existing` after
    /// the payload changed. `None` means the item has no view and is
    /// filtered out of the grid.
    fn view(&mut self, existing: Option<Self::Handle>, item: &Self::Item) -> Option<Self::Handle>;
}

/// Notifications fired synchronously from within the triggering call.
///
/// `on_drag_end` is deliberately withheld when a drag ends over the drop
/// area: it fires only once the resulting edit session resolves, so host
/// chrome hidden for the drag stays hidden through the modal decision.
pub trait GridListener<T> {
    /// A cell was lifted and a drag began.
    fn on_drag_start(&mut self) {}

    /// A drag or edit session fully resolved.
    fn on_drag_end(&mut self) {}

    /// A cell was dropped on the drop area; the host should offer an
    /// edit/delete choice and close the session with exactly one of
    /// `commit_edit`, `commit_delete`, or `cancel_edit`.
    fn on_edit_object(&mut self, item: &T) {
        let _ = item;
    }

    /// Cell placement changed; stored slots are already written back.
    fn on_reorder(&mut self) {}
}

/// Fire-and-forget visual effect surface.
///
/// Every method is a request to animate or reposition; none of them may
/// feed back into grid state. Coordinates are the top-left pixel of the
/// affected cell in the layout the grid currently reports.
pub trait RenderHost<H> {
    /// Put a cell at its slot rectangle without animation.
    fn place(&mut self, handle: &H, rect: Rect);

    /// Scale the cell up and bring it under the pointer (drag start).
    fn lift(&mut self, handle: &H, origin: Point);

    /// Track the dragged cell to a new visual position.
    fn drag_to(&mut self, handle: &H, origin: Point);

    /// Animate the cell to `origin` at normal scale (drop or cancel).
    fn settle(&mut self, handle: &H, origin: Point);

    /// Play the removal effect and discard the handle.
    fn remove(&mut self, handle: H);

    /// Return an edited cell to `origin`, fading it back in.
    fn restore(&mut self, handle: &H, origin: Point);

    /// Show the placeholder under the hovered slot, or hide it.
    fn drop_marker(&mut self, at: Option<Point>);

    /// Show the swap-candidate marker at the dragged cell's home slot,
    /// or hide it.
    fn swap_marker(&mut self, at: Option<Point>);

    /// Highlight the drop area while the pointer hovers it.
    fn drop_area_active(&mut self, active: bool);

    /// Bring the cell above its siblings.
    fn raise(&mut self, handle: &H);
}

/// A [`RenderHost`] that ignores every effect. Useful for headless hosts
/// and tests that only care about logical state.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessRender;

impl<H> RenderHost<H> for HeadlessRender {
    fn place(&mut self, _handle: &H, _rect: Rect) {}
    fn lift(&mut self, _handle: &H, _origin: Point) {}
    fn drag_to(&mut self, _handle: &H, _origin: Point) {}
    fn settle(&mut self, _handle: &H, _origin: Point) {}
    fn remove(&mut self, _handle: H) {}
    fn restore(&mut self, _handle: &H, _origin: Point) {}
    fn drop_marker(&mut self, _at: Option<Point>) {}
    fn swap_marker(&mut self, _at: Option<Point>) {}
    fn drop_area_active(&mut self, _active: bool) {}
    fn raise(&mut self, _handle: &H) {}
}
