use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::ModifiersState;

use crate::coords::Vec2;
use crate::input::{Modifiers, MouseButton, MouseButtonState, RawPointerInput};

/// Translates a winit `WindowEvent` into raw pointer input.
///
/// `scale_factor` is the window's current scale factor; positions are
/// converted to logical pixels. Returns `None` for events the pointer layer
/// does not consume (keyboard, resize, ...).
pub fn translate_window_event(scale_factor: f64, event: &WindowEvent) -> Option<RawPointerInput> {
    match event {
        WindowEvent::ModifiersChanged(m) => {
            // winit 0.30: ModifiersChanged carries a wrapper with `.state()`.
            let ms: ModifiersState = m.state();
            Some(RawPointerInput::ModifiersChanged(map_modifiers(ms)))
        }

        WindowEvent::CursorLeft { .. } => Some(RawPointerInput::Left),

        WindowEvent::CursorMoved { position, .. } => Some(RawPointerInput::Moved {
            pos: to_logical(scale_factor, *position),
        }),

        WindowEvent::MouseInput { state, button, .. } => {
            let state = match state {
                ElementState::Pressed => MouseButtonState::Pressed,
                ElementState::Released => MouseButtonState::Released,
            };
            Some(RawPointerInput::Button { button: map_mouse_button(*button), state })
        }

        _ => None,
    }
}

fn to_logical(scale_factor: f64, pos: PhysicalPosition<f64>) -> Vec2 {
    let logical = pos.to_logical::<f64>(scale_factor);
    Vec2::new(logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

#[cfg(test)]
mod tests {
    use winit::event::DeviceId;

    use super::*;

    fn device() -> DeviceId {
        // SAFETY: the dummy id is only compared, never passed back to winit.
        unsafe { DeviceId::dummy() }
    }

    #[test]
    fn cursor_moved_is_scaled_to_logical_pixels() {
        let ev = WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(200.0, 100.0),
        };
        assert_eq!(
            translate_window_event(2.0, &ev),
            Some(RawPointerInput::Moved { pos: Vec2::new(100.0, 50.0) })
        );
    }

    #[test]
    fn mouse_input_maps_button_and_state() {
        let ev = WindowEvent::MouseInput {
            device_id: device(),
            state: ElementState::Released,
            button: WinitMouseButton::Right,
        };
        assert_eq!(
            translate_window_event(1.0, &ev),
            Some(RawPointerInput::Button {
                button: MouseButton::Right,
                state: MouseButtonState::Released,
            })
        );
    }

    #[test]
    fn cursor_left_clears_pointer() {
        let ev = WindowEvent::CursorLeft { device_id: device() };
        assert_eq!(translate_window_event(1.0, &ev), Some(RawPointerInput::Left));
    }

    #[test]
    fn unrelated_events_are_ignored() {
        assert_eq!(translate_window_event(1.0, &WindowEvent::Focused(true)), None);
    }
}
