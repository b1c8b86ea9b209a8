use std::collections::HashSet;

use crate::collection::CycleDirection;

// ---------------------------------------------------------------------------
// Raw input accumulated between ticks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Up,
    Down,
    Left,
    Right,
}

impl MoveKey {
    pub const ALL: [MoveKey; 4] = [MoveKey::Up, MoveKey::Down, MoveKey::Left, MoveKey::Right];

    /// Unit pan direction. A key moves the viewport, so the image travels the
    /// opposite way: Up pans the image down (+y), Left pans it right (+x).
    pub fn pan_direction(self) -> (f32, f32) {
        match self {
            MoveKey::Up => (0.0, 1.0),
            MoveKey::Down => (0.0, -1.0),
            MoveKey::Left => (1.0, 0.0),
            MoveKey::Right => (-1.0, 0.0),
        }
    }
}

/// Pointer, wheel, and key state written by the event source and consumed
/// once per tick. Both sides run on the event-loop thread.
#[derive(Debug, Default)]
pub struct InputState {
    dragging: bool,
    drag_anchor: (f32, f32),
    pointer: (f32, f32),
    wheel_accum: i32,
    keys_down: HashSet<MoveKey>,
    pending_cycles: Vec<CycleDirection>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.pointer = (x, y);
        self.drag_anchor = (x, y);
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
        self.dragging = false;
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
    }

    pub fn wheel(&mut self, delta: i32) {
        self.wheel_accum = self.wheel_accum.saturating_add(delta);
    }

    pub fn set_key(&mut self, key: MoveKey, down: bool) {
        if down {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    pub fn is_key_down(&self, key: MoveKey) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn keys_down(&self) -> impl Iterator<Item = MoveKey> + '_ {
        MoveKey::ALL.into_iter().filter(|k| self.is_key_down(*k))
    }

    pub fn request_cycle(&mut self, direction: CycleDirection) {
        self.pending_cycles.push(direction);
    }

    /// Wheel delta since the last call.
    pub fn take_wheel(&mut self) -> i32 {
        std::mem::take(&mut self.wheel_accum)
    }

    /// Pointer travel since the last call while dragging. Re-anchors at the
    /// current pointer so each tick pans only by its own increment.
    pub fn take_drag_delta(&mut self) -> Option<(f32, f32)> {
        if !self.dragging {
            return None;
        }
        let delta = (
            self.pointer.0 - self.drag_anchor.0,
            self.pointer.1 - self.drag_anchor.1,
        );
        self.drag_anchor = self.pointer;
        Some(delta)
    }

    pub fn take_cycles(&mut self) -> Vec<CycleDirection> {
        std::mem::take(&mut self.pending_cycles)
    }
}
