#![forbid(unsafe_code)]

//! Canonical pointer input types.
//!
//! The grid consumes a small pointer vocabulary rather than any platform's
//! native event type; hosts translate their toolkit events into
//! [`PointerEvent`]s.
//!
//! # Design Notes
//!
//! - Coordinates are pixels, 0-indexed, origin at top-left.
//! - Every event carries a [`PointerId`] so multi-touch hosts can deliver
//!   all pointers; the grid latches onto one id per gesture and ignores
//!   the rest.
//! - `PointerButtons` use bitflags for easy combination. Touch hosts
//!   report `PRIMARY` for every contact.

use bitflags::bitflags;

use crate::geometry::Point;

/// Identifier of a pointer (finger, stylus, or mouse) across a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointerId(u64);

impl PointerId {
    /// Create a pointer id.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

bitflags! {
    /// Buttons held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        /// No buttons.
        const NONE      = 0b000;
        /// Primary button or touch contact.
        const PRIMARY   = 0b001;
        /// Secondary (context) button.
        const SECONDARY = 0b010;
        /// Middle button.
        const MIDDLE    = 0b100;
    }
}

impl Default for PointerButtons {
    fn default() -> Self {
        Self::NONE
    }
}

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Pointer made contact / button pressed.
    Down,
    /// Pointer moved while tracked.
    Move,
    /// Pointer lifted / button released.
    Up,
    /// The gesture was lost (platform grab, focus loss, palm rejection).
    Cancel,
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Which pointer this event belongs to.
    pub id: PointerId,
    /// The kind of event.
    pub kind: PointerEventKind,
    /// X coordinate in pixels.
    pub x: f32,
    /// Y coordinate in pixels.
    pub y: f32,
    /// Buttons held during the event.
    pub buttons: PointerButtons,
}

impl PointerEvent {
    /// Create a pointer-down event with the primary button held.
    #[must_use]
    pub const fn down(id: PointerId, x: f32, y: f32) -> Self {
        Self {
            id,
            kind: PointerEventKind::Down,
            x,
            y,
            buttons: PointerButtons::PRIMARY,
        }
    }

    /// Create a pointer-move event.
    #[must_use]
    pub const fn moved(id: PointerId, x: f32, y: f32) -> Self {
        Self {
            id,
            kind: PointerEventKind::Move,
            x,
            y,
            buttons: PointerButtons::PRIMARY,
        }
    }

    /// Create a pointer-up event.
    #[must_use]
    pub const fn up(id: PointerId, x: f32, y: f32) -> Self {
        Self {
            id,
            kind: PointerEventKind::Up,
            x,
            y,
            buttons: PointerButtons::NONE,
        }
    }

    /// Create a pointer-cancel event.
    #[must_use]
    pub const fn cancelled(id: PointerId, x: f32, y: f32) -> Self {
        Self {
            id,
            kind: PointerEventKind::Cancel,
            x,
            y,
            buttons: PointerButtons::NONE,
        }
    }

    /// Override the button set.
    #[must_use]
    pub const fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Event position as a [`Point`].
    #[inline]
    #[must_use]
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if the primary button (or a touch contact) is held.
    #[inline]
    #[must_use]
    pub const fn primary(&self) -> bool {
        self.buttons.contains(PointerButtons::PRIMARY)
    }
}
