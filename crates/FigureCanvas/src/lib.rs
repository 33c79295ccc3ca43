//! # FigureCanvas
//!
//! `figure_canvas` is a headless layout-and-rendering engine for geometry
//! figures: labeled points, segments, angles, circles, arcs, sectors and
//! parametric curves. It owns the mathematics, the view state and the
//! interaction logic, while delegating rasterization to the host application.
//!
//! ## Core Architecture
//! - **Model (`src/model.rs`)**: The typed scene, referenced by point label.
//! - **Scale (`src/scale.rs`)**: Maps data space (y up) onto canvas pixels (y down).
//! - **View (`src/view.rs`)**: Pan, zoom, flips and rotation, composed into layer transforms.
//! - **Render (`src/render.rs`)**: Outputs a list of `DrawCommand`s for the host to render.
//! - **Painter (`src/painter.rs`)**: Walks a scene in a fixed z-order and emits the display list.

pub mod annotation;
pub mod bounds;
pub mod config;
pub mod edit;
pub mod error;
pub mod input;
pub mod interaction;
pub mod math;
pub mod model;
pub mod painter;
pub mod persistence;
pub mod render;
pub mod sampler;
pub mod scale;
pub mod view;

use glam::DVec2;
use input::InputState;
use model::Scene;
use render::RenderList;
use scale::CoordinateMapper;
use view::{ViewState, ViewTransform};

// Re-exports for convenience
pub use config::CanvasConfig;
pub use edit::SceneEdit;
pub use error::{ConfigError, SceneError};
pub use interaction::{InteractionMode, LogicEvent};
pub use painter::render;

/// The main entry point for the library.
///
/// The `Canvas` struct holds the transient state of the viewer (view, viewport
/// size, interaction state) and configuration. The scene itself stays with the
/// host: it is passed in on every update and replaced only through
/// [`LogicEvent::SceneReplaced`].
pub struct Canvas {
    /// Configuration settings.
    pub config: CanvasConfig,
    /// Pan, zoom, rotation, flips and grid toggles.
    pub view: ViewState,
    /// Canvas size in pixels, taken from the latest input.
    pub viewport_size: DVec2,
    /// Current interaction mode.
    pub interaction_mode: InteractionMode,
}

impl Canvas {
    /// Creates a new Canvas instance with the given configuration.
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            view: ViewState::default(),
            viewport_size: DVec2::new(800.0, 600.0), // Replaced by the first input
            interaction_mode: InteractionMode::Idle,
        }
    }

    /// The coordinate mapping `scene` is drawn with at the current viewport and grid mode.
    pub fn mapper(&self, scene: &Scene) -> CoordinateMapper {
        CoordinateMapper::for_scene(scene, self.view.square_grid(), self.viewport_size, &self.config)
    }

    /// The current view transform stack.
    pub fn view_transform(&self) -> ViewTransform {
        ViewTransform::new(&self.view, self.viewport_size)
    }

    /// The core update loop.
    ///
    /// This function should be called every frame (or on event). It processes the
    /// input against `scene` and returns the display list for the frame together
    /// with the events the host must act on. When a drag replaces the scene, the
    /// returned list already shows the replacement.
    pub fn update(&mut self, input: &InputState, scene: &Scene) -> (RenderList, Vec<LogicEvent>) {
        let mut logic_events = Vec::new();
        if input.screen_size.x > 0.0 && input.screen_size.y > 0.0 {
            self.viewport_size = input.screen_size;
        }

        // 1. Handle Interactions (Pan, Zoom, Controls, Drag)
        interaction::handle_interactions(
            &mut self.interaction_mode,
            &mut self.view,
            &self.config,
            input,
            scene,
            self.viewport_size,
            &mut logic_events,
        );

        // 2. Render
        let current = logic_events
            .iter()
            .rev()
            .find_map(|event| match event {
                LogicEvent::SceneReplaced(next) => Some(next),
                _ => None,
            })
            .unwrap_or(scene);
        let draw_list = painter::Painter::draw_scene(
            current,
            &self.view,
            self.viewport_size,
            &self.config,
            self.interaction_mode.active_point(),
        );

        (draw_list, logic_events)
    }
}
