use glam::DVec2;

use crate::config::CanvasConfig;
use crate::edit::SceneEdit;
use crate::input::{Control, InputState};
use crate::model::Scene;
use crate::scale::CoordinateMapper;
use crate::view::{ViewFlags, ViewState, ViewTransform};

/// Events emitted by the Canvas logic to the host application.
#[derive(Clone, Debug, PartialEq)]
pub enum LogicEvent {
    /// A drag produced a new scene. The host stores it and passes it back next frame.
    SceneReplaced(Scene),
    /// Pan, zoom, rotation, flips or grid settings changed.
    ViewChanged(ViewState),
    /// A point was picked up for dragging.
    PointGrabbed { index: usize },
    /// The dragged point was let go.
    PointReleased { index: usize },
    /// The visual state has changed, requiring a repaint.
    /// This is useful for power efficiency (e.g., only render when dirty).
    RepaintNeeded,
}

/// Which button holds a pan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanButton {
    Left,
    Middle,
}

/// The current state of user interaction.
#[derive(Clone, Debug)]
pub enum InteractionMode {
    /// No active interaction.
    Idle,
    /// User is panning the canvas (drag on empty space, or middle drag anywhere).
    Panning {
        /// Mouse position at start of drag (Screen Space).
        start_drag: DVec2,
        /// Pan at start of drag.
        initial_pan: DVec2,
        button: PanButton,
    },
    /// User is moving a point.
    DraggingPoint {
        /// Index of the point in `Scene::points`.
        index: usize,
        /// Mapping of the frame the drag started in. Moving the point changes
        /// the scene bounds, so the live mapping would shift under the pointer.
        mapper: CoordinateMapper,
    },
}

impl InteractionMode {
    /// Index of the point being dragged, if any.
    pub fn active_point(&self) -> Option<usize> {
        match self {
            InteractionMode::DraggingPoint { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Handles user interactions and updates the view state.
///
/// This function acts as the central state machine for the Canvas. It processes
/// input events based on the current `InteractionMode` and transitions between states.
/// The scene is never modified in place: a drag emits `LogicEvent::SceneReplaced`.
///
/// # Arguments
/// * `mode` - The current interaction mode (will be mutated on state transitions).
/// * `view` - The view state, mutated by controls, zooming and panning.
/// * `config` - Zoom limits, steps and hit radius.
/// * `input` - The input state for the current frame.
/// * `scene` - The scene shown in the current frame.
/// * `viewport` - Canvas size in pixels.
/// * `events` - A buffer to push `LogicEvent`s into.
pub fn handle_interactions(
    mode: &mut InteractionMode,
    view: &mut ViewState,
    config: &CanvasConfig,
    input: &InputState,
    scene: &Scene,
    viewport: DVec2,
    events: &mut Vec<LogicEvent>,
) {
    let before = *view;

    // Zooming via wheel, about the canvas center.
    if input.scroll_delta != 0.0 {
        view.zoom_by(input.scroll_delta * config.wheel_zoom_step, config);
    }

    for control in &input.controls {
        apply_control(view, config, *control);
    }

    let next_mode = match mode {
        InteractionMode::Idle => handle_idle(view, config, input, scene, viewport, events),
        InteractionMode::Panning {
            start_drag,
            initial_pan,
            button,
        } => handle_panning(view, input, *start_drag, *initial_pan, *button),
        InteractionMode::DraggingPoint { index, mapper } => {
            handle_dragging_point(view, input, scene, viewport, *index, mapper, events)
        }
    };

    if let Some(new_mode) = next_mode {
        tracing::debug!(from = ?mode, to = ?new_mode, "Interaction mode changed");
        *mode = new_mode;
    }

    if *view != before {
        events.push(LogicEvent::ViewChanged(*view));
        events.push(LogicEvent::RepaintNeeded);
    }
}

fn apply_control(view: &mut ViewState, config: &CanvasConfig, control: Control) {
    match control {
        Control::ZoomIn => view.zoom_by(config.button_zoom_step, config),
        Control::ZoomOut => view.zoom_by(-config.button_zoom_step, config),
        Control::ResetView => view.reset(),
        Control::FlipHorizontal => view.toggle(ViewFlags::FLIP_X),
        Control::FlipVertical => view.toggle(ViewFlags::FLIP_Y),
        Control::RotateClockwise => view.rotate_by(config.rotation_step),
        Control::RotateCounterClockwise => view.rotate_by(-config.rotation_step),
        Control::ToggleGrid => view.toggle(ViewFlags::SHOW_GRID),
        Control::ToggleSquareGrid => view.toggle(ViewFlags::SQUARE_GRID),
    }
}

/// Front-most visible point whose marker lies within `hit_radius` of `pointer`.
///
/// Points are drawn in order, so the last one is on top.
pub fn hit_test_point(
    scene: &Scene,
    mapper: &CoordinateMapper,
    transform: &ViewTransform,
    pointer: DVec2,
    hit_radius: f64,
) -> Option<usize> {
    scene
        .points
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, point)| point.visible)
        .find(|(_, point)| {
            let screen = transform.canvas_to_screen(mapper.to_screen(point.position()));
            screen.distance(pointer) <= hit_radius
        })
        .map(|(i, _)| i)
}

/// Handles the `Idle` state interactions.
///
/// This checks for inputs to transition into:
/// - `DraggingPoint` (left press on a visible point)
/// - `Panning` (left press on empty space, or middle press anywhere)
fn handle_idle(
    view: &ViewState,
    config: &CanvasConfig,
    input: &InputState,
    scene: &Scene,
    viewport: DVec2,
    events: &mut Vec<LogicEvent>,
) -> Option<InteractionMode> {
    if input.event_consumed_by_content {
        return None;
    }

    if input.mouse_buttons.middle {
        return Some(InteractionMode::Panning {
            start_drag: input.mouse_pos,
            initial_pan: view.pan,
            button: PanButton::Middle,
        });
    }

    if !input.mouse_buttons.left {
        return None;
    }

    let mapper = CoordinateMapper::for_scene(scene, view.square_grid(), viewport, config);
    let transform = ViewTransform::new(view, viewport);
    match hit_test_point(scene, &mapper, &transform, input.mouse_pos, config.hit_radius) {
        Some(index) => {
            events.push(LogicEvent::PointGrabbed { index });
            events.push(LogicEvent::RepaintNeeded);
            Some(InteractionMode::DraggingPoint { index, mapper })
        }
        None => Some(InteractionMode::Panning {
            start_drag: input.mouse_pos,
            initial_pan: view.pan,
            button: PanButton::Left,
        }),
    }
}

/// Handles the `Panning` state interactions.
///
/// Updates the view's pan offset based on mouse delta.
/// Returns to `Idle` when the button that started the pan is released.
fn handle_panning(
    view: &mut ViewState,
    input: &InputState,
    start_drag: DVec2,
    initial_pan: DVec2,
    button: PanButton,
) -> Option<InteractionMode> {
    let held = match button {
        PanButton::Left => input.mouse_buttons.left,
        PanButton::Middle => input.mouse_buttons.middle,
    };
    if !held {
        return Some(InteractionMode::Idle);
    }
    view.pan = initial_pan + (input.mouse_pos - start_drag);
    None
}

/// Handles the `DraggingPoint` state interactions.
///
/// Moves the point under the pointer through the mapping captured at drag
/// start and emits the replacement scene. Returns to `Idle` on release.
fn handle_dragging_point(
    view: &ViewState,
    input: &InputState,
    scene: &Scene,
    viewport: DVec2,
    index: usize,
    mapper: &CoordinateMapper,
    events: &mut Vec<LogicEvent>,
) -> Option<InteractionMode> {
    if !input.mouse_buttons.left {
        events.push(LogicEvent::PointReleased { index });
        events.push(LogicEvent::RepaintNeeded);
        return Some(InteractionMode::Idle);
    }

    let canvas = ViewTransform::new(view, viewport).screen_to_canvas(input.mouse_pos);
    let target = mapper.to_data(canvas);
    if scene.points.get(index).map(|p| p.position()) == Some(target) {
        return None;
    }

    match scene.apply(SceneEdit::MovePoint {
        index,
        x: target.x,
        y: target.y,
    }) {
        Ok(next) => {
            events.push(LogicEvent::SceneReplaced(next));
            events.push(LogicEvent::RepaintNeeded);
            None
        }
        Err(err) => {
            // The host swapped the scene out from under the drag.
            tracing::warn!(index, error = %err, "Dropping point drag");
            Some(InteractionMode::Idle)
        }
    }
}
