#![forbid(unsafe_code)]

//! Input and geometry primitives for the cubby reorderable grid.
//!
//! This crate is deliberately stateless: it defines the pointer event
//! vocabulary ([`event`]) and the pure grid geometry ([`layout`]) that the
//! `cubby-grid` widget consumes. Nothing here owns cells or talks to a
//! renderer.

pub mod event;
pub mod geometry;
pub mod layout;

pub use event::{PointerButtons, PointerEvent, PointerEventKind, PointerId};
pub use geometry::{Point, Rect};
pub use layout::{GridLayout, GridSpec, HitTarget, Slot};
