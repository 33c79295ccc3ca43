//! # Input Protocol
//!
//! This module defines the input state that the host application passes to the Canvas every frame.
//! It includes pointer position, buttons, wheel ticks and the toolbar controls triggered this frame.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// State of mouse buttons.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct MouseButtons {
    /// Left mouse button is pressed.
    pub left: bool,
    /// Right mouse button is pressed.
    pub right: bool,
    /// Middle mouse button is pressed.
    pub middle: bool,
}

/// View controls a host exposes as buttons or shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    ZoomIn,
    ZoomOut,
    /// Zoom 1, no pan, no rotation.
    ResetView,
    FlipHorizontal,
    FlipVertical,
    RotateClockwise,
    RotateCounterClockwise,
    ToggleGrid,
    ToggleSquareGrid,
}

/// The input state for a single frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputState {
    /// Current position of the pointer in Screen Space (pixels).
    pub mouse_pos: DVec2,
    /// State of mouse buttons.
    pub mouse_buttons: MouseButtons,
    /// Wheel ticks this frame (positive = zoom in).
    pub scroll_delta: f64,
    /// Controls activated *this frame*, applied in order.
    pub controls: Vec<Control>,
    /// Size of the canvas viewport in Screen Space (pixels).
    pub screen_size: DVec2,
    /// If true, the canvas ignores presses (but still tracks the pointer).
    /// Used when the press landed on host UI drawn over the canvas.
    pub event_consumed_by_content: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            mouse_pos: DVec2::ZERO,
            mouse_buttons: MouseButtons::default(),
            scroll_delta: 0.0,
            controls: Vec::new(),
            screen_size: DVec2::new(800.0, 600.0),
            event_consumed_by_content: false,
        }
    }
}
