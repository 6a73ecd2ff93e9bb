use std::collections::HashSet;

use super::types::{InputEvent, Key, MouseButton};

/// Per-frame input transitions.
///
/// [`InputState`](super::InputState) holds what is currently down; this holds
/// what changed since the previous frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,
    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Where each button went down this frame (logical pixels).
    pub press_positions: Vec<(MouseButton, f32, f32)>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.press_positions.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    #[inline]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Positions of presses of `button` this frame, in arrival order.
    pub fn presses(&self, button: MouseButton) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.press_positions
            .iter()
            .filter(move |(b, _, _)| *b == button)
            .map(|(_, x, y)| (*x, *y))
    }
}
