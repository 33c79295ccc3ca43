//! # Rendering System
//!
//! This module acts as the "Instruction Set Architecture" for the host.
//! Instead of drawing directly, the Canvas outputs a display list of `DrawCommand`s.
//! The host application (SVG, egui, a GPU backend, ...) interprets these commands.
//!
//! Coordinates are in **canvas space** (pixels, y down) of the layer the command
//! belongs to. Each [`Layer`] carries the affine transform the host applies to
//! all of its commands, the way an SVG `<g transform>` group does.

use glam::{DAffine2, DVec2, Vec4};
use serde::{Deserialize, Serialize};

/// One element of a path, mirroring the SVG path commands the engine needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    MoveTo(DVec2),
    LineTo(DVec2),
    /// Quadratic Bezier through `control` to `to`.
    QuadTo { control: DVec2, to: DVec2 },
    /// SVG elliptical arc to `to`. `sweep` is the SVG sweep-flag (true = clockwise on screen).
    ArcTo {
        radii: DVec2,
        large_arc: bool,
        sweep: bool,
        to: DVec2,
    },
    Close,
}

/// Horizontal alignment of a text node relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// A single drawing primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// A straight line segment.
    Line {
        start: DVec2,
        end: DVec2,
        color: Vec4,
        width: f64,
        /// Dash pattern (on, off) in pixels; `None` for a solid stroke.
        dash: Option<[f64; 2]>,
    },
    /// An open polyline, used for sampled curves.
    Polyline {
        points: Vec<DVec2>,
        color: Vec4,
        width: f64,
    },
    /// An axis-aligned ellipse; a circle when both radii match.
    Ellipse {
        center: DVec2,
        radii: DVec2,
        fill: Option<Vec4>,
        stroke: Option<Vec4>,
        width: f64,
    },
    /// A general path.
    Path {
        segments: Vec<PathSegment>,
        fill: Option<Vec4>,
        stroke: Option<Vec4>,
        width: f64,
        dash: Option<[f64; 2]>,
    },
    /// Text to be rendered.
    Text {
        /// Anchor position in layer space.
        pos: DVec2,
        text: String,
        color: Vec4,
        /// Font size in pixels (approximate).
        size: f64,
        anchor: TextAnchor,
        /// Local transform applied around the text before the layer transform.
        transform: DAffine2,
    },
}

/// What a primitive depicts. Lets hosts style, hit-test or count by meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Grid,
    GridAxis,
    Axis,
    AxisLabel,
    Curve,
    Segment,
    LengthArc,
    LengthLabel,
    AngleArc,
    RightAngle,
    AngleLabel,
    Circle,
    Arc,
    Sector,
    SectorEdge,
    Radius,
    RadiusLabel,
    PointMarker,
    PointLabel,
}

/// A primitive tagged with its role.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawItem {
    pub role: Role,
    pub command: DrawCommand,
}

/// Commands sharing one transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub transform: DAffine2,
    /// Painter's order: later items draw over earlier ones.
    pub items: Vec<DrawItem>,
}

impl Layer {
    pub fn new(transform: DAffine2) -> Self {
        Self {
            transform,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, role: Role, command: DrawCommand) {
        self.items.push(DrawItem { role, command });
    }

    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &DrawCommand> {
        self.items
            .iter()
            .filter(move |item| item.role == role)
            .map(|item| &item.command)
    }
}

/// The display list for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderList {
    pub size: DVec2,
    pub background_color: Vec4,
    /// Grid layer: pan and zoom only.
    pub background: Layer,
    /// Figure layer: full view transform stack.
    pub shapes: Layer,
}

impl RenderList {
    /// Number of primitives with `role` across both layers.
    pub fn count(&self, role: Role) -> usize {
        self.background.with_role(role).count() + self.shapes.with_role(role).count()
    }

    /// Text of every text node with `role`, in draw order.
    pub fn texts(&self, role: Role) -> Vec<&str> {
        self.background
            .with_role(role)
            .chain(self.shapes.with_role(role))
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}
