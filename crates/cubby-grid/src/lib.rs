#![forbid(unsafe_code)]

//! A reorderable grid widget: a fixed-capacity matrix of cells bound to
//! application objects, rearranged by long-press dragging, with a
//! reserved drop area that routes a drag into an edit/delete workflow
//! instead of a move.
//!
//! The widget core is deliberately headless. It owns placement (the
//! sparse slot registry), the gesture state machine, and the edit
//! session; payload contents, pixel rendering, and the edit UI live
//! behind the [`DataProvider`], [`RenderHost`], and [`GridListener`]
//! seams. Registry state and notifications commit synchronously; render
//! effects are fire-and-forget, so queries always reflect logical truth
//! even mid-animation.
//!
//! # Example
//!
//! ```no_run
//! use cubby_grid::{GridSpec, GridView, HeadlessRender, PointerEvent, PointerId};
//!
//! let spec = GridSpec::new(80.0, 90.0).top_space(100.0);
//! let mut grid: GridView<u32, u32> = GridView::new(spec, Box::new(HeadlessRender));
//! grid.resize(640.0, 480.0);
//! grid.handle_pointer(&PointerEvent::down(PointerId::new(0), 12.0, 120.0));
//! ```

pub mod drag;
pub mod error;
pub mod persist;
pub mod provider;
pub mod registry;
pub mod view;

pub use cubby_core::{
    GridLayout, GridSpec, HitTarget, Point, PointerButtons, PointerEvent, PointerEventKind,
    PointerId, Rect, Slot,
};
pub use drag::DragConfig;
pub use error::GridError;
pub use persist::GridPersistState;
pub use provider::{DataProvider, GridListener, HeadlessRender, RenderHost};
pub use registry::{CellRecord, Registry};
pub use view::{BulkLoadReport, GridView};
pub use web_time::Instant;
