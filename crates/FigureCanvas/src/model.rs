//! # Scene Model
//!
//! This module defines the typed description of a figure: points, segments,
//! angles, circles and curves. Field names follow the camelCase wire schema
//! produced upstream.
//!
//! Entities reference points by label. A reference that does not resolve is
//! not an error; the painter skips the entity that carries it.
//!
//! Circles arrive with optional arc fields. They are resolved once, at
//! deserialization, into an explicit [`CircleKind`] so the renderer switches on
//! a tag instead of probing field presence every frame.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_true() -> bool {
    true
}

/// A labeled point. The label is its identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub label: String,
    /// Hidden points are not drawn and cannot be dragged, but still resolve as references.
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl Point {
    pub fn new(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            label: label.into(),
            visible: true,
        }
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

/// A segment between two labeled points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub start: String,
    pub end: String,
    /// Display length. Independent of the distance between the referenced points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default)]
    pub show_length: bool,
    #[serde(default)]
    pub show_length_arc: bool,
}

impl Line {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            length: None,
            show_length: false,
            show_length_arc: false,
        }
    }

    pub fn references(&self, label: &str) -> bool {
        self.start == label || self.end == label
    }
}

/// An angle at `vertex` from ray `vertex -> start` towards ray `vertex -> end`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Angle {
    pub vertex: String,
    pub start: String,
    pub end: String,
    /// Authoritative measure in degrees.
    pub value: f64,
    #[serde(default)]
    pub show_value: bool,
    /// Display-only offset in degrees applied to where the marker is drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl Angle {
    pub fn references(&self, label: &str) -> bool {
        self.vertex == label || self.start == label || self.end == label
    }
}

/// Which part of a circle is drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum CircleKind {
    /// The whole circumference.
    Full,
    /// Arc between two numeric angles, in degrees counter-clockwise from +x.
    AngleArc { start_angle: f64, end_angle: f64 },
    /// Arc between two anchor points, re-evaluated from their live coordinates.
    PointArc {
        start_point: String,
        end_point: String,
    },
}

/// A circle, arc or sector around a labeled center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "CircleRecord", into = "CircleRecord")]
pub struct Circle {
    pub center: String,
    pub radius: f64,
    pub show_radius: bool,
    /// Draw the radius annotation bowed instead of straight.
    pub show_radius_arc: bool,
    /// Draw the arc stroke of an arc kind.
    pub show_arc: bool,
    /// Close an arc kind into a filled sector.
    pub fill_arc: bool,
    pub kind: CircleKind,
}

impl Circle {
    pub fn full(center: impl Into<String>, radius: f64) -> Self {
        Self {
            center: center.into(),
            radius,
            show_radius: false,
            show_radius_arc: false,
            show_arc: true,
            fill_arc: false,
            kind: CircleKind::Full,
        }
    }

    pub fn references(&self, label: &str) -> bool {
        if self.center == label {
            return true;
        }
        match &self.kind {
            CircleKind::PointArc {
                start_point,
                end_point,
            } => start_point == label || end_point == label,
            _ => false,
        }
    }
}

/// The wire shape of a [`Circle`], with arc bounds as optional fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CircleRecord {
    center: String,
    radius: f64,
    #[serde(default)]
    show_radius: bool,
    #[serde(default)]
    show_radius_arc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_angle: Option<f64>,
    #[serde(default = "default_true")]
    show_arc: bool,
    #[serde(default)]
    fill_arc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_point: Option<String>,
}

impl From<CircleRecord> for Circle {
    fn from(record: CircleRecord) -> Self {
        // Anchor points win over numeric angles.
        let kind = match (record.start_point, record.end_point) {
            (Some(start_point), Some(end_point)) => CircleKind::PointArc {
                start_point,
                end_point,
            },
            _ => match (record.start_angle, record.end_angle) {
                (Some(start_angle), Some(end_angle)) => CircleKind::AngleArc {
                    start_angle,
                    end_angle,
                },
                _ => CircleKind::Full,
            },
        };
        Self {
            center: record.center,
            radius: record.radius,
            show_radius: record.show_radius,
            show_radius_arc: record.show_radius_arc,
            show_arc: record.show_arc,
            fill_arc: record.fill_arc,
            kind,
        }
    }
}

impl From<Circle> for CircleRecord {
    fn from(circle: Circle) -> Self {
        let (start_angle, end_angle, start_point, end_point) = match circle.kind {
            CircleKind::Full => (None, None, None, None),
            CircleKind::AngleArc {
                start_angle,
                end_angle,
            } => (Some(start_angle), Some(end_angle), None, None),
            CircleKind::PointArc {
                start_point,
                end_point,
            } => (None, None, Some(start_point), Some(end_point)),
        };
        Self {
            center: circle.center,
            radius: circle.radius,
            show_radius: circle.show_radius,
            show_radius_arc: circle.show_radius_arc,
            start_angle,
            end_angle,
            show_arc: circle.show_arc,
            fill_arc: circle.fill_arc,
            start_point,
            end_point,
        }
    }
}

/// Function family of a [`Curve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    Linear,
    Quadratic,
    Logarithm,
    Exponential,
}

/// Closed interval of x values a curve is sampled over.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct XRange {
    pub min: f64,
    pub max: f64,
}

fn default_sample_count() -> usize {
    100
}

/// A stateless function description, resampled on every render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curve {
    #[serde(rename = "type")]
    pub curve_type: CurveType,
    /// Base for `logarithm` and `exponential`. Defaults to e.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
    /// Leading coefficient. Defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coefficient: Option<f64>,
    pub x_range: XRange,
    /// Sample count.
    #[serde(default = "default_sample_count")]
    pub points: usize,
}

impl Curve {
    pub fn new(curve_type: CurveType, min: f64, max: f64) -> Self {
        Self {
            curve_type,
            base: None,
            coefficient: None,
            x_range: XRange { min, max },
            points: default_sample_count(),
        }
    }

    pub fn base_or_default(&self) -> f64 {
        self.base.unwrap_or(std::f64::consts::E)
    }

    pub fn coefficient_or_default(&self) -> f64 {
        self.coefficient.unwrap_or(1.0)
    }
}

/// The entire figure at one moment.
///
/// A scene is never edited in place: every edit path produces a new value
/// (see [`Scene::apply`](crate::edit)) that the host hands back for the next render.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub points: Vec<Point>,
    pub lines: Vec<Line>,
    pub angles: Vec<Angle>,
    pub circles: Vec<Circle>,
    pub curves: Vec<Curve>,
}

impl Scene {
    /// Builds the label index used to resolve references.
    ///
    /// When labels collide the first point wins.
    pub fn point_index(&self) -> HashMap<&str, &Point> {
        let mut index = HashMap::with_capacity(self.points.len());
        for point in &self.points {
            index.entry(point.label.as_str()).or_insert(point);
        }
        index
    }

    /// The triangle a host shows before any generated scene arrives.
    pub fn default_template() -> Self {
        let side = |start: &str, end: &str| Line {
            show_length: true,
            ..Line::new(start, end)
        };
        Self {
            points: vec![
                Point::new("A", 0.0, 0.0),
                Point::new("B", 4.0, 0.0),
                Point::new("C", 0.0, 3.0),
            ],
            lines: vec![side("A", "B"), side("B", "C"), side("C", "A")],
            angles: vec![Angle {
                vertex: "A".to_string(),
                start: "B".to_string(),
                end: "C".to_string(),
                value: 90.0,
                show_value: false,
                rotation: None,
            }],
            circles: Vec::new(),
            curves: Vec::new(),
        }
    }
}
