//! Pointer input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Platform adapters under [`platform`] translate window events into
//! [`RawPointerInput`]; [`ClickSynthesizer`] turns those into the
//! [`PointerEvent`]s mouse handlers receive.

mod click;
pub mod platform;
mod types;

pub use click::{ClickConfig, ClickSynthesizer};
pub use types::{
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseEventKind,
    PointerEvent,
    RawPointerInput,
};
