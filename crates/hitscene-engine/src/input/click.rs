use std::time::{Duration, Instant};

use crate::coords::Vec2;

use super::types::{
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseEventKind,
    PointerEvent,
    RawPointerInput,
};

/// Thresholds for click and double-click synthesis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClickConfig {
    /// Maximum pointer travel between press and release, in logical pixels,
    /// for the pair to still count as a click.
    pub max_click_distance: f32,
    /// Maximum time between two clicks for the second to also fire a double-click.
    pub double_click_interval: Duration,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            max_click_distance: 4.0,
            double_click_interval: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct Press {
    button: MouseButton,
    pos: Vec2,
}

#[derive(Debug, Copy, Clone)]
struct LastClick {
    button: MouseButton,
    pos: Vec2,
    at: Instant,
}

/// Turns raw pointer input into the pointer events mouse handlers subscribe to.
///
/// Per raw input:
/// - move: `MouseMove`
/// - press: `MouseDown`
/// - release: `MouseUp`, then `Click` when it ends a press of the same button
///   without travelling further than `max_click_distance`, then `DoubleClick`
///   when that click follows a previous one within `double_click_interval`
#[derive(Debug)]
pub struct ClickSynthesizer {
    config: ClickConfig,
    pointer_pos: Option<Vec2>,
    modifiers: Modifiers,
    press: Option<Press>,
    last_click: Option<LastClick>,
}

impl ClickSynthesizer {
    pub fn new(config: ClickConfig) -> Self {
        Self {
            config,
            pointer_pos: None,
            modifiers: Modifiers::default(),
            press: None,
            last_click: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &ClickConfig {
        &self.config
    }

    /// Last known pointer position, `None` while the pointer is outside the surface.
    #[inline]
    pub fn pointer_pos(&self) -> Option<Vec2> {
        self.pointer_pos
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Applies one raw input observed at `now` and appends the resulting events to `out`.
    pub fn apply(&mut self, input: RawPointerInput, now: Instant, out: &mut Vec<PointerEvent>) {
        match input {
            RawPointerInput::ModifiersChanged(m) => {
                self.modifiers = m;
            }

            RawPointerInput::Left => {
                self.pointer_pos = None;
                // A release outside the surface is never observed; drop the press
                // so it cannot pair with an unrelated release later.
                self.press = None;
            }

            RawPointerInput::Moved { pos } => {
                self.pointer_pos = Some(pos);
                out.push(self.event(MouseEventKind::MouseMove, pos, None));
            }

            RawPointerInput::Button { button, state } => {
                let pos = self.pointer_pos.unwrap_or(Vec2::zero());
                match state {
                    MouseButtonState::Pressed => {
                        self.press = Some(Press { button, pos });
                        out.push(self.event(MouseEventKind::MouseDown, pos, Some(button)));
                    }
                    MouseButtonState::Released => {
                        out.push(self.event(MouseEventKind::MouseUp, pos, Some(button)));
                        self.release(button, pos, now, out);
                    }
                }
            }
        }
    }

    fn release(&mut self, button: MouseButton, pos: Vec2, now: Instant, out: &mut Vec<PointerEvent>) {
        let Some(press) = self.press.take() else {
            return;
        };
        if press.button != button || press.pos.distance(pos) > self.config.max_click_distance {
            return;
        }

        out.push(self.event(MouseEventKind::Click, pos, Some(button)));

        let is_double = self.last_click.is_some_and(|last| {
            last.button == button
                && now.saturating_duration_since(last.at) <= self.config.double_click_interval
                && last.pos.distance(pos) <= self.config.max_click_distance
        });

        if is_double {
            out.push(self.event(MouseEventKind::DoubleClick, pos, Some(button)));
            // A third click starts a new sequence rather than chaining.
            self.last_click = None;
        } else {
            self.last_click = Some(LastClick { button, pos, at: now });
        }
    }

    fn event(&self, kind: MouseEventKind, pos: Vec2, button: Option<MouseButton>) -> PointerEvent {
        let event = PointerEvent::new(kind, pos).with_modifiers(self.modifiers);
        match button {
            Some(button) => event.with_button(button),
            None => event,
        }
    }
}

impl Default for ClickSynthesizer {
    fn default() -> Self {
        Self::new(ClickConfig::default())
    }
}
