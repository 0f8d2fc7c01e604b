use std::fmt;

use crate::coords::Vec2;

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
///
/// This is stored as booleans rather than bitflags to keep it explicit and stable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// The fixed set of pointer events a drawable can subscribe to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseEventKind {
    Click,
    MouseUp,
    MouseMove,
    MouseDown,
    DoubleClick,
}

impl MouseEventKind {
    /// Every supported kind, in a stable order.
    pub const ALL: [MouseEventKind; 5] = [
        MouseEventKind::Click,
        MouseEventKind::MouseUp,
        MouseEventKind::MouseMove,
        MouseEventKind::MouseDown,
        MouseEventKind::DoubleClick,
    ];

    /// Handler-style name, used in diagnostics only.
    pub const fn handler_name(self) -> &'static str {
        match self {
            MouseEventKind::Click => "onClick",
            MouseEventKind::MouseUp => "onMouseUp",
            MouseEventKind::MouseMove => "onMouseMove",
            MouseEventKind::MouseDown => "onMouseDown",
            MouseEventKind::DoubleClick => "onDoubleClick",
        }
    }

    /// Dense index into `ALL`, for table-backed handler storage.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            MouseEventKind::Click => 0,
            MouseEventKind::MouseUp => 1,
            MouseEventKind::MouseMove => 2,
            MouseEventKind::MouseDown => 3,
            MouseEventKind::DoubleClick => 4,
        }
    }
}

impl fmt::Display for MouseEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.handler_name())
    }
}

/// Pointer event as delivered to mouse handlers.
///
/// `pos` is in logical pixels. `button` is `None` for moves.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: MouseEventKind,
    pub button: Option<MouseButton>,
    pub pos: Vec2,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    #[inline]
    pub fn new(kind: MouseEventKind, pos: Vec2) -> Self {
        Self { kind, button: None, pos, modifiers: Modifiers::default() }
    }

    #[inline]
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    #[inline]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Platform-agnostic raw pointer input.
///
/// Platform adapters translate window system events into these; the
/// [`ClickSynthesizer`](super::ClickSynthesizer) turns them into [`PointerEvent`]s.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RawPointerInput {
    Moved { pos: Vec2 },
    Button { button: MouseButton, state: MouseButtonState },
    ModifiersChanged(Modifiers),
    /// Pointer left the window surface.
    Left,
}
