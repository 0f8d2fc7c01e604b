use std::fmt;

use hitscene_engine::coords::Ray;
use hitscene_engine::input::{MouseEventKind, PointerEvent};

/// What a mouse handler learns about the hit besides the raw event.
#[derive(Debug)]
pub struct MouseEventInfo<'a, O> {
    /// Scene-space ray under the pointer, as computed by the camera layer.
    pub ray: Ray,
    pub object: &'a O,
    pub object_index: usize,
    /// Present only for instanced draw calls. `Some(0)` is the first instance.
    pub instance_index: Option<u32>,
}

/// Boxed mouse handler.
pub type MouseHandler<O> = Box<dyn FnMut(&PointerEvent, &MouseEventInfo<'_, O>)>;

/// Per-event-kind handler table of one drawable.
pub struct MouseHandlers<O> {
    slots: [Option<MouseHandler<O>>; MouseEventKind::ALL.len()],
}

impl<O> MouseHandlers<O> {
    pub fn new() -> Self {
        Self { slots: [const { None }; MouseEventKind::ALL.len()] }
    }

    /// Installs `f` for `kind`, replacing any previous handler.
    pub fn set(&mut self, kind: MouseEventKind, f: impl FnMut(&PointerEvent, &MouseEventInfo<'_, O>) + 'static) {
        self.slots[kind.index()] = Some(Box::new(f));
    }

    pub fn remove(&mut self, kind: MouseEventKind) -> Option<MouseHandler<O>> {
        self.slots[kind.index()].take()
    }

    #[inline]
    pub fn contains(&self, kind: MouseEventKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    #[inline]
    pub fn get_mut(&mut self, kind: MouseEventKind) -> Option<&mut MouseHandler<O>> {
        self.slots[kind.index()].as_mut()
    }

    /// Whether any supported event has a handler.
    pub fn any(&self) -> bool {
        MouseEventKind::ALL.iter().any(|&k| self.contains(k))
    }

    /// Kinds that currently have a handler, in `MouseEventKind::ALL` order.
    pub fn kinds(&self) -> impl Iterator<Item = MouseEventKind> + '_ {
        MouseEventKind::ALL.into_iter().filter(|&k| self.contains(k))
    }
}

impl<O> Default for MouseHandlers<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> fmt::Debug for MouseHandlers<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}
