//! Shared test doubles: a map-backed provider, a recording listener, and
//! a recording render host. Items and render handles are both small
//! integers so assertions stay readable.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use cubby_grid::{
    DataProvider, GridListener, GridSpec, GridView, Instant, Point, PointerEvent, PointerId, Rect,
    RenderHost, Slot,
};

/// Provider over a shared `item -> stored slot` map. Tests keep a clone
/// of `slots` to observe write-backs.
pub struct MapProvider {
    pub items: Vec<u32>,
    pub slots: Rc<RefCell<HashMap<u32, u32>>>,
    pub viewless: Vec<u32>,
    /// `(existing_handle, item)` pairs for every `view` call.
    pub view_calls: Rc<RefCell<Vec<(Option<u32>, u32)>>>,
}

impl MapProvider {
    pub fn new(placed: &[(u32, u32)]) -> Self {
        Self {
            items: placed.iter().map(|(item, _)| *item).collect(),
            slots: Rc::new(RefCell::new(placed.iter().copied().collect())),
            viewless: Vec::new(),
            view_calls: Rc::default(),
        }
    }

    pub fn empty() -> Self {
        Self::new(&[])
    }
}

impl DataProvider for MapProvider {
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
        self.view_calls.borrow_mut().push((existing, *item));
        if self.viewless.contains(item) {
            None
        } else {
            Some(existing.unwrap_or(*item))
        }
    }
}

/// Notification log shared between the listener double and the test.
#[derive(Clone, Default)]
pub struct Events(pub Rc<RefCell<Vec<String>>>);

impl Events {
    pub fn take(&self) -> Vec<String> {
        self.0.borrow_mut().drain(..).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == name).count()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

pub struct RecordingListener(pub Events);

impl GridListener<u32> for RecordingListener {
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

/// Visual effects observed by the render host.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Place(u32, Rect),
    Lift(u32),
    DragTo(u32, Point),
    Settle(u32, Point),
    Remove(u32),
    Restore(u32, Point),
    DropMarker(Option<Point>),
    SwapMarker(Option<Point>),
    DropAreaActive(bool),
    Raise(u32),
}

#[derive(Clone, Default)]
pub struct EffectLog(pub Rc<RefCell<Vec<Effect>>>);

impl EffectLog {
    pub fn take(&self) -> Vec<Effect> {
        self.0.borrow_mut().drain(..).collect()
    }
}

pub struct RecordingRender(pub EffectLog);

impl RenderHost<u32> for RecordingRender {
    fn place(&mut self, handle: &u32, rect: Rect) {
        self.0 .0.borrow_mut().push(Effect::Place(*handle, rect));
    }

    fn lift(&mut self, handle: &u32, _origin: Point) {
        self.0 .0.borrow_mut().push(Effect::Lift(*handle));
    }

    fn drag_to(&mut self, handle: &u32, origin: Point) {
        self.0 .0.borrow_mut().push(Effect::DragTo(*handle, origin));
    }

    fn settle(&mut self, handle: &u32, origin: Point) {
        self.0 .0.borrow_mut().push(Effect::Settle(*handle, origin));
    }

    fn remove(&mut self, handle: u32) {
        self.0 .0.borrow_mut().push(Effect::Remove(handle));
    }

    fn restore(&mut self, handle: &u32, origin: Point) {
        self.0 .0.borrow_mut().push(Effect::Restore(*handle, origin));
    }

    fn drop_marker(&mut self, at: Option<Point>) {
        self.0 .0.borrow_mut().push(Effect::DropMarker(at));
    }

    fn swap_marker(&mut self, at: Option<Point>) {
        self.0 .0.borrow_mut().push(Effect::SwapMarker(at));
    }

    fn drop_area_active(&mut self, active: bool) {
        self.0 .0.borrow_mut().push(Effect::DropAreaActive(active));
    }

    fn raise(&mut self, handle: &u32) {
        self.0 .0.borrow_mut().push(Effect::Raise(*handle));
    }
}

/// A 3x3 grid with a drop area above it, wired to a recording listener
/// and render host.
pub fn grid_with_drop_area() -> (GridView<u32, u32>, Events, EffectLog) {
    let spec = GridSpec::default().top_space(100.0);
    let effects = EffectLog::default();
    let mut view = GridView::new(spec, Box::new(RecordingRender(effects.clone())));
    let events = Events::default();
    view.set_listener(Box::new(RecordingListener(events.clone())));
    view.resize(260.0, 400.0);
    assert_eq!(view.layout().capacity(), 9);
    assert!(!view.layout().drop_area().is_empty());
    (view, events, effects)
}

/// A point just inside the given slot's cell.
pub fn point_in(view: &GridView<u32, u32>, slot: Slot) -> Point {
    view.layout().origin_of(slot).offset(2.0, 2.0)
}

/// A point inside the drop area.
pub fn point_in_drop_area(view: &GridView<u32, u32>) -> Point {
    let area = view.layout().drop_area();
    Point::new(area.x + area.width / 2.0, area.y + area.height / 2.0)
}

/// Press a cell and hold it past the long-press threshold.
pub fn long_press(view: &mut GridView<u32, u32>, id: u64, slot: Slot) {
    let p = point_in(view, slot);
    view.handle_pointer(&PointerEvent::down(PointerId::new(id), p.x, p.y));
    view.tick(Instant::now() + Duration::from_secs(1));
    assert!(view.is_dragging(), "long press should start a drag");
}

/// Move the active pointer to `p` and release it there.
pub fn drag_release(view: &mut GridView<u32, u32>, id: u64, p: Point) {
    let id = PointerId::new(id);
    view.handle_pointer(&PointerEvent::moved(id, p.x, p.y));
    view.handle_pointer(&PointerEvent::up(id, p.x, p.y));
}
