#![forbid(unsafe_code)]

//! Press tracking and drag session state.
//!
//! Two small state holders back the grid's pointer handling:
//!
//! - [`PressTracker`] watches a pointer between down and up. If it stays
//!   within tolerance past the long-press threshold, the grid starts a
//!   drag; if it lifts earlier with the press still armed, the grid fires
//!   the cell-click callback instead. A drag and a click never both come
//!   out of the same press.
//! - [`DragSession`] exists only while a cell is lifted. It pins the
//!   driving pointer id, the dragged record's registry key, the current
//!   hover target, and the swap candidate. There is never more than one
//!   session; a long-press during a drag is a no-op.
//!
//! The actual transitions (who mutates the registry, who notifies) live
//! on the grid view; these types only hold and validate gesture state.

use std::time::Duration;

use cubby_core::{HitTarget, Point, PointerId, Slot};
use web_time::Instant;

/// Gesture thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// How long a press must be held before a drag starts (default 500ms).
    pub long_press_threshold: Duration,
    /// Movement in pixels that disarms a press (default 4.0).
    pub click_tolerance: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            long_press_threshold: Duration::from_millis(500),
            click_tolerance: 4.0,
        }
    }
}

/// An armed press: a pointer went down on an occupied cell and has not
/// yet lifted, strayed, or matured into a drag.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PressTracker {
    pub pointer: PointerId,
    pub slot: Slot,
    pub down: Point,
    pub at: Instant,
}

impl PressTracker {
    pub(crate) fn new(pointer: PointerId, slot: Slot, down: Point, at: Instant) -> Self {
        Self {
            pointer,
            slot,
            down,
            at,
        }
    }

    /// Whether the pointer has wandered too far to still count as a
    /// press.
    pub(crate) fn strayed(&self, p: Point, config: &DragConfig) -> bool {
        self.down.distance(p) > config.click_tolerance
    }

    /// Whether the press has been held long enough to become a drag.
    pub(crate) fn long_press_ready(&self, now: Instant, config: &DragConfig) -> bool {
        now.saturating_duration_since(self.at) >= config.long_press_threshold
    }
}

/// State of one in-flight drag.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DragSession {
    /// Registry key of the dragged record. Stable for the whole drag;
    /// the registry is only rekeyed at commit.
    pub origin: Slot,
    /// Hit target under the pointer as of the last move.
    pub hover: HitTarget,
    /// Registry key of the cell previewed as displaced, if any. Never
    /// the origin itself.
    pub swap_candidate: Option<Slot>,
    /// The pointer driving this drag. Events from other ids are ignored.
    pub pointer: PointerId,
    /// Last pointer position, for cumulative deltas.
    pub last: Point,
    /// Current top-left of the lifted visual.
    pub pos: Point,
}

impl DragSession {
    pub(crate) fn new(origin: Slot, pointer: PointerId, last: Point, lifted: Point) -> Self {
        Self {
            origin,
            hover: HitTarget::Slot(origin),
            swap_candidate: None,
            pointer,
            last,
            pos: lifted,
        }
    }

    /// Fold a pointer move into the session: advances the lifted visual
    /// by the pointer delta and returns the new visual position.
    pub(crate) fn track(&mut self, p: Point) -> Point {
        self.pos = self.pos.offset(p.x - self.last.x, p.y - self.last.y);
        self.last = p;
        self.pos
    }

    /// Whether an event from `pointer` belongs to this drag.
    pub(crate) fn owns(&self, pointer: PointerId) -> bool {
        self.pointer == pointer
    }
}
