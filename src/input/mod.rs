//! Latched input state
//!
//! Event handlers only record what happened here. The frame loop reads the
//! latched state once per tick and is the only place that moves anything.

use std::collections::HashSet;

/// Pressed keys (lowercase identifiers) and the pending drag gesture.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<String>,
    drag: DragState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct DragState {
    active: bool,
    last: (f32, f32),
    pending: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches a key press. Returns `true` when the key was not already down.
    pub fn key_down(&mut self, key: &str) -> bool {
        self.pressed.insert(key.to_lowercase())
    }

    pub fn key_up(&mut self, key: &str) {
        self.pressed.remove(&key.to_lowercase());
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.drag.active = true;
        self.drag.last = (x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.drag.active {
            return;
        }
        self.drag.pending.0 += x - self.drag.last.0;
        self.drag.pending.1 += y - self.drag.last.1;
        self.drag.last = (x, y);
    }

    pub fn pointer_up(&mut self) {
        self.drag.active = false;
    }

    /// Drag movement accumulated since the last call, in pixels.
    pub fn take_drag_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.drag.pending)
    }

    /// Forgets everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.pressed.clear();
        self.drag = DragState::default();
    }
}
