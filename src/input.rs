//! Mouse input tracking.
//!
//! Thin abstraction over raw window events: tracks the cursor in both pixel
//! and normalized device coordinates, per-frame button transitions, and
//! scroll. The sketch reads the NDC position to drive pointer projection and
//! the held/drag state to drive the orbit camera.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Left, // Default for other buttons
        }
    }
}

/// Mouse state assembled from window events.
#[derive(Debug, Default)]
pub struct Input {
    held: HashSet<MouseButton>,
    pressed: HashSet<MouseButton>,
    released: HashSet<MouseButton>,

    position: Vec2,
    ndc: Vec2,
    delta: Vec2,
    last_position: Vec2,

    scroll_delta: f32,

    // Window size for NDC calculation
    window_size: (u32, u32),
}

impl Input {
    /// Create a new input tracker.
    pub fn new() -> Self {
        Self {
            window_size: (800, 600),
            ..Default::default()
        }
    }

    /// Check if a button was pressed this frame.
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&button)
    }

    /// Check if a button is currently held down.
    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.held.contains(&button)
    }

    /// Check if a button was released this frame.
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.released.contains(&button)
    }

    /// Cursor position in screen pixels.
    pub fn mouse_position(&self) -> Vec2 {
        self.position
    }

    /// Cursor position in normalized device coordinates (-1 to 1).
    ///
    /// Origin at window center; x increases rightward, y increases upward.
    pub fn mouse_ndc(&self) -> Vec2 {
        self.ndc
    }

    /// Cursor movement since the last event, in pixels.
    pub fn mouse_delta(&self) -> Vec2 {
        self.delta
    }

    /// Scroll wheel delta this frame. Positive is up/forward.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Take the pending cursor movement, zeroing it. Each event's delta is
    /// handed out once; later calls return zero until the next cursor move.
    pub fn take_mouse_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.delta)
    }

    /// Take the pending scroll amount, zeroing it.
    pub fn take_scroll_delta(&mut self) -> f32 {
        std::mem::take(&mut self.scroll_delta)
    }

    /// Called at the start of each frame to clear per-frame state.
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    /// Update window size for NDC calculations.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let btn = MouseButton::from(*button);
                match state {
                    ElementState::Pressed => {
                        self.pressed.insert(btn);
                        self.held.insert(btn);
                    }
                    ElementState::Released => {
                        self.held.remove(&btn);
                        self.released.insert(btn);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = Vec2::new(position.x as f32, position.y as f32);
                self.delta = new_pos - self.last_position;
                self.last_position = new_pos;
                self.position = new_pos;

                let (w, h) = self.window_size;
                if w > 0 && h > 0 {
                    self.ndc = Vec2::new(
                        (position.x as f32 / w as f32) * 2.0 - 1.0,
                        1.0 - (position.y as f32 / h as f32) * 2.0, // Y flipped
                    );
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => *y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }

            _ => {}
        }
    }
}
