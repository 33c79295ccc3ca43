//! # Viewport System
//!
//! This module holds the view state (pan, zoom, flips, rotation, grid) and
//! composes it into the transforms applied on top of the coordinate mapping.
//!
//! Two layers receive different stacks:
//! - the **background** (grid) gets pan and zoom only, so grid lines stay aligned;
//! - the **shapes** (figure) get pan, zoom, rotation and flips.
//!
//! Text in the shape layer is wrapped in a local counter-transform that undoes
//! the rotation and flips around the text anchor, so labels stay upright.

use bitflags::bitflags;
use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::math::wrap_degrees;

bitflags! {
    /// Boolean toggles of the view.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ViewFlags: u8 {
        /// Mirror the figure horizontally.
        const FLIP_X = 1 << 0;
        /// Mirror the figure vertically.
        const FLIP_Y = 1 << 1;
        /// Draw the background grid.
        const SHOW_GRID = 1 << 2;
        /// Use the square-grid coordinate mapping.
        const SQUARE_GRID = 1 << 3;
    }
}

// Manual Serialize/Deserialize implementation for bitflags to be friendly
impl Serialize for ViewFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for ViewFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

/// Represents the current camera state.
///
/// A plain value owned by the host (or by [`Canvas`](crate::Canvas)); it only
/// changes through the setters below, and every change is followed by one render.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Screen-space translation in pixels.
    pub pan: DVec2,
    /// Scale factor about the canvas center. 1.0 = 100%.
    pub zoom: f64,
    /// Rotation of the figure in degrees, in `[0, 360)`, clockwise on screen.
    pub rotation: f64,
    pub flags: ViewFlags,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            pan: DVec2::ZERO,
            zoom: 1.0,
            rotation: 0.0,
            flags: ViewFlags::SHOW_GRID,
        }
    }
}

impl ViewState {
    pub fn show_grid(&self) -> bool {
        self.flags.contains(ViewFlags::SHOW_GRID)
    }

    pub fn square_grid(&self) -> bool {
        self.flags.contains(ViewFlags::SQUARE_GRID)
    }

    /// Adds `delta` to the zoom, clamped to the configured limits.
    pub fn zoom_by(&mut self, delta: f64, config: &CanvasConfig) {
        self.set_zoom(self.zoom + delta, config);
    }

    pub fn set_zoom(&mut self, zoom: f64, config: &CanvasConfig) {
        self.zoom = zoom.clamp(config.min_zoom, config.max_zoom);
    }

    pub fn pan_by(&mut self, delta: DVec2) {
        self.pan += delta;
    }

    /// Rotates by `degrees`, wrapping into `[0, 360)`.
    pub fn rotate_by(&mut self, degrees: f64) {
        self.rotation = wrap_degrees(self.rotation + degrees);
    }

    pub fn toggle(&mut self, flag: ViewFlags) {
        self.flags.toggle(flag);
    }

    /// Restores zoom, pan and rotation. Flips and grid settings are kept.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = DVec2::ZERO;
        self.rotation = 0.0;
    }

    fn flip_scale(&self) -> DVec2 {
        DVec2::new(
            if self.flags.contains(ViewFlags::FLIP_X) { -1.0 } else { 1.0 },
            if self.flags.contains(ViewFlags::FLIP_Y) { -1.0 } else { 1.0 },
        )
    }
}

/// The composed transform stack for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Pan and zoom about the canvas center.
    pub background: DAffine2,
    /// `background` followed by rotation and flips about the canvas center.
    pub shapes: DAffine2,
    rotation: f64,
    flip: DVec2,
}

impl ViewTransform {
    pub fn new(view: &ViewState, viewport: DVec2) -> Self {
        let center = viewport * 0.5;
        let rotation = view.rotation.to_radians();
        let flip = view.flip_scale();

        let background = DAffine2::from_translation(view.pan)
            * DAffine2::from_translation(center)
            * DAffine2::from_scale(DVec2::splat(view.zoom))
            * DAffine2::from_translation(-center);

        let shapes = background
            * DAffine2::from_translation(center)
            * DAffine2::from_angle(rotation)
            * DAffine2::from_scale(flip)
            * DAffine2::from_translation(-center);

        Self {
            background,
            shapes,
            rotation,
            flip,
        }
    }

    /// Local transform for a text node anchored at `anchor` (shape-layer space)
    /// that cancels the layer's rotation and flips around the anchor.
    pub fn text_counter(&self, anchor: DVec2) -> DAffine2 {
        DAffine2::from_translation(anchor)
            * DAffine2::from_scale(self.flip)
            * DAffine2::from_angle(-self.rotation)
            * DAffine2::from_translation(-anchor)
    }

    /// Where a shape-layer point ends up on screen.
    pub fn canvas_to_screen(&self, canvas: DVec2) -> DVec2 {
        self.shapes.transform_point2(canvas)
    }

    /// Inverse of [`Self::canvas_to_screen`]: pointer position to shape-layer space.
    pub fn screen_to_canvas(&self, screen: DVec2) -> DVec2 {
        self.shapes.inverse().transform_point2(screen)
    }

    /// Inverse of the background stack.
    pub fn screen_to_background(&self, screen: DVec2) -> DVec2 {
        self.background.inverse().transform_point2(screen)
    }
}
