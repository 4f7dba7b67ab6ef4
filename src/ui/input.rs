//! Input state for scene interaction

use macroquad::prelude::*;

/// Mouse and modifier state for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    /// Movement since the previous frame
    pub dx: f32,
    pub dy: f32,
    pub left_down: bool,
    pub right_down: bool,
    pub left_pressed: bool, // Just pressed this frame
    pub shift: bool,
}

impl MouseState {
    /// Sample macroquad's input, deriving deltas and edges from last frame
    pub fn poll(prev: &MouseState) -> Self {
        let (x, y) = mouse_position();
        let left_down = is_mouse_button_down(MouseButton::Left);
        Self {
            x,
            y,
            dx: x - prev.x,
            dy: y - prev.y,
            left_down,
            right_down: is_mouse_button_down(MouseButton::Right),
            left_pressed: left_down && !prev.left_down,
            shift: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
        }
    }

    pub fn has_moved(&self) -> bool {
        self.dx != 0.0 || self.dy != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_moved() {
        let still = MouseState { x: 10.0, y: 10.0, ..Default::default() };
        assert!(!still.has_moved());
        let moved = MouseState { dy: -1.0, ..still };
        assert!(moved.has_moved());
    }
}
