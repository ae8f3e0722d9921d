//! Leptos DragDrop Utilities
//!
//! List-to-list drag-and-drop for Leptos using mouse events.
//! Uses movement threshold to distinguish click from drag.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: i32 = 5;

/// The item picked up: its id, the list it lives in and its index there
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragSource {
    pub item_id: String,
    pub list_id: String,
    pub index: usize,
}

/// A position inside a list where an item can land.
///
/// `index` counts the items rendered before the slot, the dragged one included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropSlot {
    pub list_id: String,
    pub index: usize,
}

/// Outcome of a finished drag
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropResult {
    pub source: DragSource,
    /// None when released outside every slot
    pub destination: Option<DropSlot>,
}

impl DropResult {
    /// Index the item ends up at in the destination list once it has been
    /// taken out of its source list
    pub fn destination_index(&self) -> Option<usize> {
        let dest = self.destination.as_ref()?;
        if dest.list_id == self.source.list_id && dest.index > self.source.index {
            Some(dest.index - 1)
        } else {
            Some(dest.index)
        }
    }

    /// Dropped nowhere, or somewhere that leaves the item where it was
    pub fn is_noop(&self) -> bool {
        match (&self.destination, self.destination_index()) {
            (Some(dest), Some(index)) => dest.list_id == self.source.list_id && index == self.source.index,
            _ => true,
        }
    }
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub dragging: RwSignal<Option<DragSource>>,
    pub drop_target: RwSignal<Option<DropSlot>>,
    pub drag_just_ended: RwSignal<bool>,
    /// Pending item (mousedown but not yet dragging)
    pub pending: RwSignal<Option<DragSource>>,
    /// Start position for movement detection
    pub start: RwSignal<(i32, i32)>,
}

pub fn create_dnd_signals() -> DndSignals {
    DndSignals {
        dragging: RwSignal::new(None),
        drop_target: RwSignal::new(None),
        drag_just_ended: RwSignal::new(false),
        pending: RwSignal::new(None),
        start: RwSignal::new((0, 0)),
    }
}

impl DndSignals {
    pub fn is_dragging_item(&self, item_id: &str) -> bool {
        self.dragging
            .with(|d| d.as_ref().is_some_and(|s| s.item_id == item_id))
    }

    pub fn is_active_slot(&self, slot: &DropSlot) -> bool {
        self.drop_target.with(|t| t.as_ref() == Some(slot))
    }
}

fn exceeds_threshold(start: (i32, i32), current: (i32, i32)) -> bool {
    let dx = (current.0 - start.0).abs();
    let dy = (current.1 - start.1).abs();
    dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging.try_set(None);
    dnd.drop_target.try_set(None);
    dnd.pending.try_set(None);
    dnd.drag_just_ended.try_set(true);

    // Swallow the click that follows mouseup
    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended;
        let cb = Closure::<dyn FnMut()>::new(move || {
            clear.try_set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable items
/// Records pending drag with start position
pub fn make_on_mousedown(dnd: DndSignals, source: DragSource) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlSelectElement>().is_some() { return; }
        }
        dnd.pending.set(Some(source.clone()));
        dnd.start.set((ev.client_x(), ev.client_y()));
    }
}

/// Create mouseenter handler for a drop slot
pub fn make_on_slot_mouseenter(dnd: DndSignals, slot: DropSlot) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging.with_untracked(|d| d.is_some()) {
            dnd.drop_target.set(Some(slot.clone()));
        }
    }
}

/// Create mouseleave handler
pub fn make_on_mouseleave(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging.with_untracked(|d| d.is_some()) {
            dnd.drop_target.set(None);
        }
    }
}

/// Document listeners bound for one drag surface.
///
/// Dropping the value unbinds them, so hold it for as long as the
/// owning view is mounted.
pub struct DndListeners {
    document: web_sys::Document,
    on_mousemove: Closure<dyn FnMut(web_sys::MouseEvent)>,
    on_mouseup: Closure<dyn FnMut(web_sys::MouseEvent)>,
}

impl Drop for DndListeners {
    fn drop(&mut self) {
        let _ = self
            .document
            .remove_event_listener_with_callback("mousemove", self.on_mousemove.as_ref().unchecked_ref());
        let _ = self
            .document
            .remove_event_listener_with_callback("mouseup", self.on_mouseup.as_ref().unchecked_ref());
    }
}

/// Bind global mousemove/mouseup handlers for drag start and drop detection.
///
/// `on_drop` fires for every real drag (not plain clicks), including drops
/// outside any slot, which arrive with `destination: None`.
pub fn bind_global_listeners<F>(dnd: DndSignals, on_drop: F) -> Option<DndListeners>
where
    F: Fn(DropResult) + 'static,
{
    let document = web_sys::window()?.document()?;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let Some(pending) = dnd.pending.try_get_untracked().flatten() else { return };
        if dnd.dragging.with_untracked(|d| d.is_some()) {
            return;
        }
        let start = dnd.start.get_untracked();
        if exceeds_threshold(start, (ev.client_x(), ev.client_y())) {
            dnd.dragging.set(Some(pending));
        }
    });

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let Some(dragging) = dnd.dragging.try_get_untracked() else { return };
        let destination = dnd.drop_target.get_untracked();
        end_drag(&dnd);
        // Click event fires naturally when nothing was dragged
        if let Some(source) = dragging {
            on_drop(DropResult { source, destination });
        }
    });

    let _ = document.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    let _ = document.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());

    Some(DndListeners { document, on_mousemove, on_mouseup })
}
