#![forbid(unsafe_code)]

//! The reorderable grid widget.
//!
//! [`GridView`] composes the pure geometry from `cubby-core`, the sparse
//! [`Registry`], and the gesture state from [`crate::drag`] into the
//! public widget surface: pointer handling, bulk load, add/remove, the
//! edit session, and listener dispatch.
//!
//! # State machine
//!
//! Pointer handling is a two-state machine, Idle and Dragging. A press on
//! an occupied cell arms a [`PressTracker`]; if it survives the long-press
//! threshold (checked on [`tick`](GridView::tick)) and the grid is
//! editable, a [`DragSession`] opens. While dragging, moves update the
//! lifted visual by cumulative pointer delta and re-derive the hover
//! target; releasing commits, cancels, or opens an edit session depending
//! on where the pointer ended:
//!
//! - outside the grid: the cell settles back, `on_drag_end` fires;
//! - on the drop area: an edit session opens, `on_edit_object` fires, and
//!   `on_drag_end` is deferred until the session resolves;
//! - on a slot: the cell settles there; if the slot changed, any occupant
//!   is moved into the vacated origin (the swap), stored slots are written
//!   through the provider, then `on_drag_end` and `on_reorder` fire.
//!
//! # Invariants
//!
//! 1. At most one drag session and one edit session exist at a time, and
//!    a long-press during a drag is a no-op.
//! 2. Registry keys stay unique through every commit; a drop on an
//!    occupied slot always swaps, never overwrites.
//! 3. Listener notifications observe fully committed registry and
//!    provider state; render effects are fire-and-forget after that.
//! 4. A drag cancel is idempotent and safe with no drag active.

use cubby_core::{GridLayout, GridSpec, HitTarget, Point, PointerEvent, PointerEventKind, Slot};
use web_time::Instant;

use crate::drag::{DragConfig, DragSession, PressTracker};
use crate::error::GridError;
use crate::provider::{DataProvider, GridListener, RenderHost};
use crate::registry::{CellRecord, Registry};

/// Render handle at a slot. Free-standing so callers can keep borrowing
/// other `GridView` fields mutably while the handle is alive.
fn handle_at<T, H>(registry: &Registry<T, H>, slot: Slot) -> Option<&H> {
    registry.get(slot).and_then(|record| record.handle.as_ref())
}

/// Outcome counts from a bulk load or state restore.
///
/// `skipped` counts items the provider filtered out (no view or no stored
/// slot); `reassigned` counts duplicate-slot collisions resolved to the
/// smallest vacant slot; `dropped` counts items discarded because no
/// vacant slot remained inside the visible matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkLoadReport {
    /// Cells that made it into the registry.
    pub loaded: usize,
    /// Items filtered out by the provider.
    pub skipped: usize,
    /// Items moved off a duplicated slot.
    pub reassigned: usize,
    /// Items discarded because the grid was full.
    pub dropped: usize,
}

/// A fixed-capacity matrix of cells, reorderable by dragging, with a
/// dedicated drop area that routes a drag into an edit/delete workflow.
///
/// `T` is the application payload; `H` is the host's opaque render
/// handle. All operations are synchronous and single-threaded.
pub struct GridView<T, H> {
    spec: GridSpec,
    layout: GridLayout,
    registry: Registry<T, H>,
    provider: Option<Box<dyn DataProvider<Item = T, Handle = H>>>,
    listener: Option<Box<dyn GridListener<T>>>,
    on_cell_click: Option<Box<dyn FnMut(Slot, &T)>>,
    render: Box<dyn RenderHost<H>>,
    drag_config: DragConfig,
    press: Option<PressTracker>,
    drag: Option<DragSession>,
    editing: Option<Slot>,
    editable: bool,
}

impl<T, H> GridView<T, H> {
    /// Create a grid with the given layout spec and render host. The
    /// layout starts as a 1x1 matrix until the first [`resize`].
    ///
    /// [`resize`]: GridView::resize
    #[must_use]
    pub fn new(spec: GridSpec, render: Box<dyn RenderHost<H>>) -> Self {
        Self {
            layout: GridLayout::initial(&spec),
            spec,
            registry: Registry::new(),
            provider: None,
            listener: None,
            on_cell_click: None,
            render,
            drag_config: DragConfig::default(),
            press: None,
            drag: None,
            editing: None,
            editable: true,
        }
    }

    /// Set the listener receiving lifecycle notifications.
    pub fn set_listener(&mut self, listener: Box<dyn GridListener<T>>) {
        self.listener = Some(listener);
    }

    /// Set the callback fired when a press completes without a drag.
    pub fn set_on_cell_click(&mut self, callback: Box<dyn FnMut(Slot, &T)>) {
        self.on_cell_click = Some(callback);
    }

    /// Override gesture thresholds.
    pub fn set_drag_config(&mut self, config: DragConfig) {
        self.drag_config = config;
    }

    /// Set the data provider and bulk-load its items.
    ///
    /// Any in-flight gesture or edit session is discarded without
    /// notifications; the board is rebuilt from scratch. Items with no
    /// view or no stored slot are filtered out; duplicated slots are
    /// reassigned to the smallest vacant slot and written back through
    /// the provider, firing `on_reorder` once after the pass if anything
    /// moved. Items that cannot be placed inside the visible matrix are
    /// dropped — bulk load never creates soft-overflow slots.
    pub fn set_data_provider(
        &mut self,
        provider: Box<dyn DataProvider<Item = T, Handle = H>>,
    ) -> BulkLoadReport {
        self.provider = Some(provider);
        self.bulk_load()
    }

    fn bulk_load(&mut self) -> BulkLoadReport {
        self.press = None;
        self.drag = None;
        self.editing = None;
        self.registry.clear();

        let mut report = BulkLoadReport::default();
        let Some(provider) = self.provider.as_mut() else {
            return report;
        };

        let mut altered = false;
        for item in provider.items() {
            let handle = provider.view(None, &item);
            let stored = provider.slot(&item);
            let (Some(handle), Some(mut slot)) = (handle, stored) else {
                report.skipped += 1;
                continue;
            };
            if self.registry.contains(slot) {
                match self.registry.find_min_vacant(&self.layout) {
                    Some(alt) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            from = slot.get(),
                            to = alt.get(),
                            "grid.load_reassigned"
                        );
                        provider.set_slot(&item, alt);
                        slot = alt;
                        report.reassigned += 1;
                        altered = true;
                    }
                    None => {
                        #[cfg(feature = "tracing")]
                        tracing::error!(slot = slot.get(), "grid.load_dropped");
                        report.dropped += 1;
                        continue;
                    }
                }
            }
            if self.layout.in_bounds(slot) {
                self.render.place(&handle, self.layout.cell_rect(slot));
            }
            self.registry.insert(CellRecord {
                slot,
                payload: item,
                handle: Some(handle),
            });
            report.loaded += 1;
        }
        if altered {
            self.notify_reorder();
        }
        report
    }

    /// Add a cell, assigning it the smallest vacant slot.
    ///
    /// If the visible matrix is full the cell is given the smallest slot
    /// beyond it instead (soft overflow): it exists in the registry and
    /// in the provider's stored state but is not laid out until the grid
    /// grows or it is moved. Returns the assigned slot.
    pub fn add_object(&mut self, payload: T) -> Result<Slot, GridError> {
        if self.provider.is_none() {
            return Err(GridError::ProviderMissing);
        }
        let slot = match self.registry.find_min_vacant(&self.layout) {
            Some(slot) => slot,
            None => {
                let slot = self.registry.find_min_vacant_unbounded();
                #[cfg(feature = "tracing")]
                tracing::warn!(slot = slot.get(), "grid.soft_overflow");
                slot
            }
        };
        if let Some(provider) = self.provider.as_mut() {
            provider.set_slot(&payload, slot);
        }
        self.notify_reorder();

        let handle = match self.provider.as_mut() {
            Some(provider) => provider.view(None, &payload),
            None => None,
        };
        let Some(handle) = handle else {
            #[cfg(feature = "tracing")]
            tracing::warn!(slot = slot.get(), "grid.add_without_view");
            return Ok(slot);
        };
        if self.layout.in_bounds(slot) {
            self.render.place(&handle, self.layout.cell_rect(slot));
        }
        self.registry.insert(CellRecord {
            slot,
            payload,
            handle: Some(handle),
        });
        Ok(slot)
    }

    /// Remove the cell at a slot. Fires `on_reorder` and plays the
    /// removal effect. Returns `false` if the slot was vacant.
    pub fn remove_object(&mut self, slot: Slot) -> bool {
        let removed = self.delete_cell(slot);
        if removed && self.editing == Some(slot) {
            self.editing = None;
        }
        removed
    }

    fn delete_cell(&mut self, slot: Slot) -> bool {
        let Some(record) = self.registry.remove(slot) else {
            #[cfg(feature = "tracing")]
            tracing::error!(slot = slot.get(), "grid.delete_vacant");
            return false;
        };
        self.notify_reorder();
        if let Some(handle) = record.handle {
            self.render.remove(handle);
        }
        true
    }

    /// Whether every visible slot is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.registry.is_full(&self.layout)
    }

    /// Number of cells, soft-overflow cells included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether the grid holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// The current layout.
    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// The layout spec.
    #[must_use]
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// The payload at a slot, if any.
    #[must_use]
    pub fn payload_at(&self, slot: Slot) -> Option<&T> {
        self.registry.get(slot).map(|record| &record.payload)
    }

    /// Whether a slot is occupied.
    #[must_use]
    pub fn contains(&self, slot: Slot) -> bool {
        self.registry.contains(slot)
    }

    /// The slot held by the open edit session, if one is open.
    #[must_use]
    pub fn editing_slot(&self) -> Option<Slot> {
        self.editing
    }

    /// Whether a drag is in flight.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether cells accept long-press.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Toggle whether cells accept long-press. Disabling cancels any
    /// in-flight drag or edit session first.
    pub fn set_editable(&mut self, editable: bool) {
        if self.editable == editable {
            return;
        }
        self.editable = editable;
        if !editable {
            if self.drag.is_some() {
                self.cancel_drag();
            }
            if self.editing.is_some() {
                self.cancel_edit();
            }
            self.press = None;
        }
    }

    /// Recompute the layout for a new container size and re-place every
    /// in-bounds cell. The dragged cell and the cell under edit are
    /// skipped so they do not snap back mid-gesture.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.layout = GridLayout::compute(&self.spec, width, height);
        let dragged = self.drag.map(|session| session.origin);
        for record in self.registry.iter() {
            if Some(record.slot) == dragged || Some(record.slot) == self.editing {
                continue;
            }
            if !self.layout.in_bounds(record.slot) {
                continue;
            }
            if let Some(handle) = record.handle.as_ref() {
                self.render.place(handle, self.layout.cell_rect(record.slot));
            }
        }
    }

    // ── Pointer handling ────────────────────────────────────────────────

    /// Feed one pointer event into the state machine.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        match event.kind {
            PointerEventKind::Down => self.pointer_down(event),
            PointerEventKind::Move => self.pointer_move(event),
            PointerEventKind::Up => self.pointer_up(event),
            PointerEventKind::Cancel => self.pointer_cancel(event),
        }
    }

    /// Check the long-press clock. Hosts call this on their tick; a press
    /// held past the threshold starts a drag when the grid is editable.
    pub fn tick(&mut self, now: Instant) {
        let Some(press) = self.press else {
            return;
        };
        if self.drag.is_some() {
            self.press = None;
            return;
        }
        if self.editable && press.long_press_ready(now, &self.drag_config) {
            self.press = None;
            self.start_drag(press);
        }
    }

    fn pointer_down(&mut self, event: &PointerEvent) {
        if self.drag.is_some() || self.press.is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(pointer = event.id.get(), "grid.down_ignored");
            return;
        }
        if let HitTarget::Slot(slot) = self.layout.hit_test(event.point()) {
            if self.registry.contains(slot) {
                self.press = Some(PressTracker::new(
                    event.id,
                    slot,
                    event.point(),
                    Instant::now(),
                ));
            }
        }
    }

    fn pointer_move(&mut self, event: &PointerEvent) {
        if self.drag.is_some() {
            self.drag_move(event);
            return;
        }
        if let Some(press) = self.press {
            if press.pointer == event.id && press.strayed(event.point(), &self.drag_config) {
                self.press = None;
            }
        }
    }

    fn pointer_up(&mut self, event: &PointerEvent) {
        if let Some(session) = self.drag {
            if session.owns(event.id) {
                self.drag = None;
                self.end_drag(session, event.point());
            } else {
                #[cfg(feature = "tracing")]
                tracing::debug!(pointer = event.id.get(), "grid.up_ignored");
            }
            return;
        }
        if let Some(press) = self.press.take() {
            if press.pointer != event.id {
                self.press = Some(press);
                return;
            }
            if !press.strayed(event.point(), &self.drag_config) {
                if let (Some(callback), Some(record)) =
                    (self.on_cell_click.as_mut(), self.registry.get(press.slot))
                {
                    callback(press.slot, &record.payload);
                }
            }
        }
    }

    fn pointer_cancel(&mut self, event: &PointerEvent) {
        if let Some(session) = self.drag {
            if session.owns(event.id) {
                self.cancel_drag();
            }
            return;
        }
        if self.press.is_some_and(|press| press.pointer == event.id) {
            self.press = None;
        }
    }

    fn start_drag(&mut self, press: PressTracker) {
        if self.drag.is_some() || !self.registry.contains(press.slot) {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(slot = press.slot.get(), "grid.drag_start");
        self.notify_drag_start();
        let lifted = self.layout.origin_of(press.slot);
        if let Some(handle) = handle_at(&self.registry, press.slot) {
            self.render.raise(handle);
            self.render.lift(handle, lifted);
        }
        self.drag = Some(DragSession::new(press.slot, press.pointer, press.down, lifted));
    }

    fn drag_move(&mut self, event: &PointerEvent) {
        let Some(mut session) = self.drag else {
            return;
        };
        if !session.owns(event.id) {
            #[cfg(feature = "tracing")]
            tracing::debug!(pointer = event.id.get(), "grid.move_ignored");
            return;
        }
        let p = event.point();
        let pos = session.track(p);
        if let Some(handle) = handle_at(&self.registry, session.origin) {
            self.render.drag_to(handle, pos);
        }

        let hover = self.layout.hit_test(p);
        if hover != session.hover {
            self.cancel_swap_preview(&session);
            session.swap_candidate = None;
            if let HitTarget::Slot(slot) = hover {
                // The origin never becomes its own swap candidate.
                if slot != session.origin && self.registry.contains(slot) {
                    session.swap_candidate = Some(slot);
                    self.swap_preview(&session);
                }
            }
        }
        self.render.drop_area_active(hover.is_drop_area());
        match hover {
            HitTarget::Slot(slot) => {
                let origin = self.layout.origin_of(slot);
                self.render.drop_marker(Some(origin));
            }
            _ => self.render.drop_marker(None),
        }
        session.hover = hover;
        self.drag = Some(session);
    }

    /// Cancel an in-flight drag: the cell settles back into its slot and
    /// `on_drag_end` fires. Safe to call with no drag active.
    pub fn cancel_drag(&mut self) {
        let Some(session) = self.drag.take() else {
            return;
        };
        self.press = None;
        self.cancel_move(&session);
        self.render.drop_marker(None);
        self.render.drop_area_active(false);
        self.notify_drag_end();
    }

    fn end_drag(&mut self, session: DragSession, p: Point) {
        self.render.drop_marker(None);
        self.render.drop_area_active(false);
        match self.layout.hit_test(p) {
            HitTarget::Outside => {
                self.cancel_move(&session);
                self.notify_drag_end();
            }
            HitTarget::DropArea => {
                self.cancel_swap_preview(&session);
                self.editing = Some(session.origin);
                #[cfg(feature = "tracing")]
                tracing::debug!(slot = session.origin.get(), "grid.edit_open");
                // on_drag_end is deferred until the edit session resolves.
                if let (Some(listener), Some(record)) =
                    (self.listener.as_mut(), self.registry.get(session.origin))
                {
                    listener.on_edit_object(&record.payload);
                }
            }
            HitTarget::Slot(slot) => {
                let target = self.layout.origin_of(slot);
                if let Some(handle) = handle_at(&self.registry, session.origin) {
                    self.render.settle(handle, target);
                }
                let mut reordered = false;
                if slot == session.origin {
                    self.cancel_swap_preview(&session);
                } else {
                    reordered = self.commit_move(&session, slot);
                }
                self.notify_drag_end();
                if reordered {
                    self.notify_reorder();
                }
            }
        }
    }

    /// Rekey the dragged record to `slot`, swapping with the occupant if
    /// there is one, and write both stored slots through the provider.
    fn commit_move(&mut self, session: &DragSession, slot: Slot) -> bool {
        let Some(mut dragged) = self.registry.remove(session.origin) else {
            #[cfg(feature = "tracing")]
            tracing::error!(slot = session.origin.get(), "grid.commit_lost_record");
            return false;
        };
        if self.registry.contains(slot) {
            // Swap: the occupant takes the vacated origin. This covers
            // both the previewed swap candidate and an occupant the
            // pointer never hovered.
            self.registry.move_to(slot, session.origin);
            let home = self.layout.origin_of(session.origin);
            if let Some(handle) = handle_at(&self.registry, session.origin) {
                self.render.settle(handle, home);
            }
            self.render.swap_marker(None);
            self.write_slot(session.origin);
        }
        dragged.slot = slot;
        self.registry.insert(dragged);
        self.write_slot(slot);
        true
    }

    fn cancel_move(&mut self, session: &DragSession) {
        self.cancel_swap_preview(session);
        let home = self.layout.origin_of(session.origin);
        if let Some(handle) = handle_at(&self.registry, session.origin) {
            self.render.settle(handle, home);
        }
    }

    /// Move the swap candidate's visual back to its own slot and hide
    /// the marker.
    fn cancel_swap_preview(&mut self, session: &DragSession) {
        let Some(candidate) = session.swap_candidate else {
            return;
        };
        let target = self.layout.origin_of(candidate);
        if let Some(handle) = handle_at(&self.registry, candidate) {
            self.render.settle(handle, target);
        }
        self.render.swap_marker(None);
    }

    /// Preview the swap: the candidate's visual moves into the dragged
    /// cell's home slot and the marker appears there.
    fn swap_preview(&mut self, session: &DragSession) {
        let Some(candidate) = session.swap_candidate else {
            return;
        };
        let home = self.layout.origin_of(session.origin);
        if let Some(handle) = handle_at(&self.registry, candidate) {
            self.render.raise(handle);
            self.render.settle(handle, home);
        }
        if let Some(handle) = handle_at(&self.registry, session.origin) {
            self.render.raise(handle);
        }
        self.render.swap_marker(Some(home));
    }

    fn write_slot(&mut self, slot: Slot) {
        let Some(record) = self.registry.get(slot) else {
            return;
        };
        match self.provider.as_mut() {
            Some(provider) => provider.set_slot(&record.payload, slot),
            None => {
                // Registry state is already committed; the stored slot
                // will be rewritten on the next provider interaction.
                #[cfg(feature = "tracing")]
                tracing::error!(slot = slot.get(), "grid.write_without_provider");
            }
        }
    }

    // ── Edit session ────────────────────────────────────────────────────

    /// Close the edit session after the host edited the payload: the
    /// cell's view is refreshed through the provider, the cell returns to
    /// its slot, and `on_drag_end` fires.
    pub fn commit_edit(&mut self) -> Result<(), GridError> {
        if let Some(slot) = self.editing {
            if self.registry.contains(slot) {
                if self.provider.is_none() {
                    // Session stays open; the host can retry.
                    return Err(GridError::ProviderMissing);
                }
                if let (Some(record), Some(provider)) =
                    (self.registry.get_mut(slot), self.provider.as_mut())
                {
                    let existing = record.handle.take();
                    record.handle = provider.view(existing, &record.payload);
                }
                self.restore_cell(slot);
            } else {
                #[cfg(feature = "tracing")]
                tracing::error!(slot = slot.get(), "grid.edit_lost_record");
            }
            self.editing = None;
        }
        self.notify_drag_end();
        Ok(())
    }

    /// Close the edit session by deleting the cell. Fires `on_reorder`
    /// then `on_drag_end`.
    pub fn commit_delete(&mut self) {
        if let Some(slot) = self.editing.take() {
            self.delete_cell(slot);
        }
        self.notify_drag_end();
    }

    /// Close the edit session with the cell unchanged, returning it to
    /// its slot. Fires `on_drag_end`.
    pub fn cancel_edit(&mut self) {
        if let Some(slot) = self.editing.take() {
            self.restore_cell(slot);
        }
        self.notify_drag_end();
    }

    fn restore_cell(&mut self, slot: Slot) {
        let origin = self.layout.origin_of(slot);
        if let Some(handle) = handle_at(&self.registry, slot) {
            self.render.restore(handle, origin);
        }
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Rebuild the board from a saved snapshot.
    ///
    /// Every saved slot is written back through the provider, views are
    /// re-requested, and duplicate slots (from a corrupt snapshot) are
    /// reassigned with the same rules as bulk load. The edit session is
    /// re-armed only if its record survived the rebuild. Soft-overflow
    /// slots restore as saved; they are not laid out until the grid
    /// grows.
    pub fn restore_state(
        &mut self,
        state: crate::persist::GridPersistState<T>,
    ) -> Result<BulkLoadReport, GridError> {
        if self.provider.is_none() {
            return Err(GridError::ProviderMissing);
        }
        self.press = None;
        self.drag = None;
        self.editing = None;
        self.registry.clear();

        let mut report = BulkLoadReport::default();
        let mut altered = false;
        let Some(provider) = self.provider.as_mut() else {
            return Err(GridError::ProviderMissing);
        };
        for (raw, payload) in state.cells {
            let mut slot = Slot::new(raw);
            if self.registry.contains(slot) {
                match self.registry.find_min_vacant(&self.layout) {
                    Some(alt) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(from = raw, to = alt.get(), "grid.restore_reassigned");
                        slot = alt;
                        report.reassigned += 1;
                        altered = true;
                    }
                    None => {
                        #[cfg(feature = "tracing")]
                        tracing::error!(slot = raw, "grid.restore_dropped");
                        report.dropped += 1;
                        continue;
                    }
                }
            }
            provider.set_slot(&payload, slot);
            let Some(handle) = provider.view(None, &payload) else {
                report.skipped += 1;
                continue;
            };
            if self.layout.in_bounds(slot) {
                self.render.place(&handle, self.layout.cell_rect(slot));
            }
            self.registry.insert(CellRecord {
                slot,
                payload,
                handle: Some(handle),
            });
            report.loaded += 1;
        }
        self.editing = state
            .editing_slot
            .map(Slot::new)
            .filter(|slot| self.registry.contains(*slot));
        if altered {
            self.notify_reorder();
        }
        Ok(report)
    }

    // ── Notifications ───────────────────────────────────────────────────

    fn notify_drag_start(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_drag_start();
        }
    }

    fn notify_drag_end(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_drag_end();
        }
    }

    fn notify_reorder(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_reorder();
        }
    }
}

impl<T: Clone, H> GridView<T, H> {
    /// Snapshot cell placement and the open edit session.
    #[must_use]
    pub fn save_state(&self) -> crate::persist::GridPersistState<T> {
        let mut cells: Vec<(u32, T)> = self
            .registry
            .iter()
            .map(|record| (record.slot.get(), record.payload.clone()))
            .collect();
        cells.sort_by_key(|(slot, _)| *slot);
        crate::persist::GridPersistState {
            cells,
            editing_slot: self.editing.map(Slot::get),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BulkLoadReport, GridView};
    use crate::error::GridError;
    use crate::provider::{DataProvider, GridListener, HeadlessRender};
    use cubby_core::{GridSpec, PointerEvent, PointerId, Slot};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use std::time::Duration;
    use web_time::Instant;

    /// Items are small integers; the stored slot map is shared so tests
    /// can observe provider writes.
    struct TestProvider {
        items: Vec<u32>,
        slots: Rc<RefCell<HashMap<u32, u32>>>,
        viewless: Vec<u32>,
    }

    impl TestProvider {
        fn new(placed: &[(u32, u32)]) -> Self {
            Self {
                items: placed.iter().map(|(item, _)| *item).collect(),
                slots: Rc::new(RefCell::new(placed.iter().copied().collect())),
                viewless: Vec::new(),
            }
        }
    }

    impl DataProvider for TestProvider {
        type Item = u32;
        type Handle = u32;

        fn items(&mut self) -> Vec<u32> {
            self.items.clone()
        }

        fn slot(&self, item: &u32) -> Option<Slot> {
            self.slots.borrow().get(item).copied().map(Slot::new)
        }

        fn set_slot(&mut self, item: &u32, slot: Slot) {
            self.slots.borrow_mut().insert(*item, slot.get());
        }

        fn view(&mut self, existing: Option<u32>, item: &u32) -> Option<u32> {
            if self.viewless.contains(item) {
                None
            } else {
                Some(existing.unwrap_or(*item))
            }
        }
    }

    #[derive(Clone, Default)]
    struct Events(Rc<RefCell<Vec<String>>>);

    impl Events {
        fn take(&self) -> Vec<String> {
            self.0.borrow_mut().drain(..).collect()
        }

        fn count(&self, name: &str) -> usize {
            self.0.borrow().iter().filter(|e| *e == name).count()
        }
    }

    struct TestListener(Events);

    impl GridListener<u32> for TestListener {
        fn on_drag_start(&mut self) {
            self.0 .0.borrow_mut().push("drag_start".into());
        }
        fn on_drag_end(&mut self) {
            self.0 .0.borrow_mut().push("drag_end".into());
        }
        fn on_edit_object(&mut self, item: &u32) {
            self.0 .0.borrow_mut().push(format!("edit:{item}"));
        }
        fn on_reorder(&mut self) {
            self.0 .0.borrow_mut().push("reorder".into());
        }
    }

    /// A grid resized to a 3x3 visible matrix.
    fn grid() -> (GridView<u32, u32>, Events) {
        let mut view = GridView::new(GridSpec::default(), Box::new(HeadlessRender));
        let events = Events::default();
        view.set_listener(Box::new(TestListener(events.clone())));
        view.resize(260.0, 300.0);
        assert_eq!(view.layout().capacity(), 9);
        (view, events)
    }

    #[test]
    fn bulk_load_places_items_at_stored_slots() {
        let (mut view, events) = grid();
        let report = view.set_data_provider(Box::new(TestProvider::new(&[(10, 0), (11, 4)])));
        assert_eq!(
            report,
            BulkLoadReport {
                loaded: 2,
                ..BulkLoadReport::default()
            }
        );
        assert_eq!(view.payload_at(Slot::new(0)), Some(&10));
        assert_eq!(view.payload_at(Slot::new(4)), Some(&11));
        assert!(events.take().is_empty());
    }

    #[test]
    fn bulk_load_reassigns_duplicate_slot_and_reports_once() {
        let (mut view, events) = grid();
        let provider = TestProvider::new(&[(10, 0), (11, 0)]);
        let slots = Rc::clone(&provider.slots);
        let report = view.set_data_provider(Box::new(provider));

        assert_eq!(report.loaded, 2);
        assert_eq!(report.reassigned, 1);
        assert_eq!(view.payload_at(Slot::new(0)), Some(&10));
        assert_eq!(view.payload_at(Slot::new(1)), Some(&11));
        assert_eq!(slots.borrow()[&11], 1);
        assert_eq!(events.take(), vec!["reorder".to_string()]);
    }

    #[test]
    fn bulk_load_drops_collisions_on_a_full_grid() {
        let (mut view, events) = grid();
        let mut placed: Vec<(u32, u32)> = (0..9).map(|i| (i + 100, i)).collect();
        placed.push((999, 3));
        let report = view.set_data_provider(Box::new(TestProvider::new(&placed)));

        assert_eq!(report.loaded, 9);
        assert_eq!(report.dropped, 1);
        assert!(view.is_full());
        // One reorder notification would imply the dropped item altered
        // the board; it must not.
        assert_eq!(events.count("reorder"), 0);
    }

    #[test]
    fn bulk_load_filters_viewless_and_unplaced_items() {
        let (mut view, _) = grid();
        let mut provider = TestProvider::new(&[(10, 0), (11, 1)]);
        provider.items.push(12); // no stored slot
        provider.viewless.push(11);
        let report = view.set_data_provider(Box::new(provider));

        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn add_object_requires_a_provider() {
        let (mut view, _) = grid();
        assert_eq!(view.add_object(42), Err(GridError::ProviderMissing));
    }

    #[test]
    fn add_object_takes_smallest_vacant_slot() {
        let (mut view, events) = grid();
        let provider = TestProvider::new(&[(10, 0), (11, 2)]);
        let slots = Rc::clone(&provider.slots);
        view.set_data_provider(Box::new(provider));

        assert_eq!(view.add_object(12), Ok(Slot::new(1)));
        assert_eq!(slots.borrow()[&12], 1);
        assert_eq!(events.count("reorder"), 1);
    }

    #[test]
    fn add_object_overflows_softly_when_full() {
        let (mut view, _) = grid();
        let placed: Vec<(u32, u32)> = (0..9).map(|i| (i + 100, i)).collect();
        view.set_data_provider(Box::new(TestProvider::new(&placed)));
        assert!(view.is_full());

        let slot = view.add_object(200).unwrap();
        assert_eq!(slot, Slot::new(9));
        assert!(!view.layout().in_bounds(slot));
        assert_eq!(view.payload_at(slot), Some(&200));
    }

    #[test]
    fn remove_object_fires_reorder() {
        let (mut view, events) = grid();
        view.set_data_provider(Box::new(TestProvider::new(&[(10, 0)])));
        events.take();

        assert!(view.remove_object(Slot::new(0)));
        assert!(!view.remove_object(Slot::new(0)));
        assert_eq!(events.count("reorder"), 1);
        assert!(view.is_empty());
    }

    #[test]
    fn click_fires_when_press_lifts_before_threshold() {
        let (mut view, _) = grid();
        view.set_data_provider(Box::new(TestProvider::new(&[(10, 0)])));
        let clicks: Rc<RefCell<Vec<(u32, u32)>>> = Rc::default();
        let sink = Rc::clone(&clicks);
        view.set_on_cell_click(Box::new(move |slot, item| {
            sink.borrow_mut().push((slot.get(), *item));
        }));

        let p = view.layout().origin_of(Slot::new(0)).offset(2.0, 2.0);
        let id = PointerId::new(1);
        view.handle_pointer(&PointerEvent::down(id, p.x, p.y));
        view.handle_pointer(&PointerEvent::up(id, p.x, p.y));

        assert_eq!(clicks.borrow().as_slice(), &[(0, 10)]);
        assert!(!view.is_dragging());
    }

    #[test]
    fn strayed_press_neither_clicks_nor_drags() {
        let (mut view, _) = grid();
        view.set_data_provider(Box::new(TestProvider::new(&[(10, 0)])));
        let clicks: Rc<RefCell<Vec<u32>>> = Rc::default();
        let sink = Rc::clone(&clicks);
        view.set_on_cell_click(Box::new(move |slot, _| sink.borrow_mut().push(slot.get())));

        let p = view.layout().origin_of(Slot::new(0)).offset(2.0, 2.0);
        let id = PointerId::new(1);
        view.handle_pointer(&PointerEvent::down(id, p.x, p.y));
        view.handle_pointer(&PointerEvent::moved(id, p.x + 30.0, p.y));
        view.tick(Instant::now() + Duration::from_secs(1));
        view.handle_pointer(&PointerEvent::up(id, p.x + 30.0, p.y));

        assert!(clicks.borrow().is_empty());
        assert!(!view.is_dragging());
    }

    #[test]
    fn long_press_needs_editable() {
        let (mut view, events) = grid();
        view.set_data_provider(Box::new(TestProvider::new(&[(10, 0)])));
        view.set_editable(false);

        let p = view.layout().origin_of(Slot::new(0)).offset(2.0, 2.0);
        view.handle_pointer(&PointerEvent::down(PointerId::new(1), p.x, p.y));
        view.tick(Instant::now() + Duration::from_secs(1));

        assert!(!view.is_dragging());
        assert_eq!(events.count("drag_start"), 0);
    }

    #[test]
    fn disabling_editable_cancels_a_drag() {
        let (mut view, events) = grid();
        view.set_data_provider(Box::new(TestProvider::new(&[(10, 0)])));

        let p = view.layout().origin_of(Slot::new(0)).offset(2.0, 2.0);
        view.handle_pointer(&PointerEvent::down(PointerId::new(1), p.x, p.y));
        view.tick(Instant::now() + Duration::from_secs(1));
        assert!(view.is_dragging());

        view.set_editable(false);
        assert!(!view.is_dragging());
        assert_eq!(events.count("drag_end"), 1);
        // Cell stayed put.
        assert_eq!(view.payload_at(Slot::new(0)), Some(&10));
    }

    #[test]
    fn cancel_drag_without_a_drag_is_a_no_op() {
        let (mut view, events) = grid();
        view.cancel_drag();
        view.cancel_drag();
        assert!(events.take().is_empty());
    }
}
