//! # Geometric Annotations
//!
//! Derived geometry that is not stored in the scene: angle markers, circular
//! arcs and sectors, radius and length annotations.
//!
//! Angles and arcs are reasoned about in data space (y up, counter-clockwise
//! positive) and only converted to canvas space when a path is built. The
//! y-axis inversion of the mapper turns a data-space counter-clockwise sweep
//! into a screen-space one with SVG sweep-flag 0.

use glam::DVec2;
use std::f64::consts::{PI, TAU};

use crate::config::CanvasConfig;
use crate::math::{self, LENGTH_EPSILON};
use crate::render::PathSegment;
use crate::scale::CoordinateMapper;

/// Rotational direction in data space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    CounterClockwise,
    Clockwise,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::CounterClockwise => 1.0,
            Direction::Clockwise => -1.0,
        }
    }

    /// SVG sweep-flag once the y-axis has been inverted onto the screen.
    pub fn svg_sweep(self) -> bool {
        self == Direction::Clockwise
    }
}

/// The displayed extent of an [`Angle`](crate::model::Angle), in data-space radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleSweep {
    pub start: f64,
    pub end: f64,
    pub direction: Direction,
}

impl AngleSweep {
    pub fn mid(&self) -> f64 {
        (self.start + self.end) * 0.5
    }

    /// Absolute swept angle in radians.
    pub fn extent(&self) -> f64 {
        (self.end - self.start).abs()
    }
}

/// Derives where an angle marker is drawn.
///
/// The start ray is `vertex -> start`. The marker sweeps by the authoritative
/// `value_deg` in whichever direction the raw rays diverge (the sign of
/// `atan2(v2) - atan2(v1)` normalized to `(-PI, PI]`), not by the measure
/// implied by the coordinates. `rotation_deg` shifts both ends.
///
/// Returns `None` when the start ray has no direction.
pub fn angle_sweep(
    vertex: DVec2,
    start: DVec2,
    end: DVec2,
    value_deg: f64,
    rotation_deg: f64,
) -> Option<AngleSweep> {
    let v1 = start - vertex;
    let v2 = end - vertex;
    math::direction(v1)?;

    let a1 = v1.y.atan2(v1.x);
    let raw = match math::direction(v2) {
        Some(_) => math::normalize_angle(v2.y.atan2(v2.x) - a1),
        None => 0.0,
    };
    let direction = if raw >= 0.0 {
        Direction::CounterClockwise
    } else {
        Direction::Clockwise
    };

    let value = value_deg.clamp(0.0, 360.0).to_radians();
    let start_angle = a1 + rotation_deg.to_radians();
    Some(AngleSweep {
        start: start_angle,
        end: start_angle + direction.sign() * value,
        direction,
    })
}

/// Whether `value_deg` is close enough to 90 to draw the right-angle glyph.
pub fn is_right_angle(value_deg: f64, tolerance_deg: f64) -> bool {
    (value_deg - 90.0).abs() <= tolerance_deg
}

/// A ready-to-draw angle marker in canvas space.
#[derive(Clone, Debug, PartialEq)]
pub enum AngleMarker {
    /// Open polyline of the square glyph: leg, corner, leg.
    RightAngle { points: [DVec2; 3] },
    /// Circular arc plus the anchor of its degree label.
    Arc {
        segments: Vec<PathSegment>,
        label_pos: DVec2,
    },
}

/// Builds the marker for an angle at `vertex` (all positions in data space).
pub fn angle_marker(
    mapper: &CoordinateMapper,
    vertex: DVec2,
    start: DVec2,
    end: DVec2,
    value_deg: f64,
    rotation_deg: f64,
    config: &CanvasConfig,
) -> Option<AngleMarker> {
    let sweep = angle_sweep(vertex, start, end, value_deg, rotation_deg)?;
    let origin = mapper.to_screen(vertex);
    let screen_dir = |angle: f64| mapper.direction_to_screen(math::unit_at(angle));

    if is_right_angle(value_deg, config.right_angle_tolerance_deg) {
        let rotation = rotation_deg.to_radians();
        let leg = |v: DVec2| math::direction(v).map(|d| DVec2::from_angle(rotation).rotate(d));
        let u1 = leg(start - vertex).and_then(|d| mapper.direction_to_screen(d))?;
        // A vertex-coincident end point falls back to the derived end ray.
        let u2 = leg(end - vertex)
            .and_then(|d| mapper.direction_to_screen(d))
            .or_else(|| screen_dir(sweep.end))?;
        let s = config.right_angle_size;
        return Some(AngleMarker::RightAngle {
            points: [origin + u1 * s, origin + (u1 + u2) * s, origin + u2 * s],
        });
    }

    if sweep.extent() < LENGTH_EPSILON {
        return None;
    }

    let r = config.angle_arc_radius;
    let p1 = origin + screen_dir(sweep.start)? * r;
    let p2 = origin + screen_dir(sweep.end)? * r;
    let label_pos = origin + screen_dir(sweep.mid())? * (r + config.angle_label_offset);
    Some(AngleMarker::Arc {
        segments: vec![
            PathSegment::MoveTo(p1),
            PathSegment::ArcTo {
                radii: DVec2::splat(r),
                large_arc: sweep.extent() > PI,
                sweep: sweep.direction.svg_sweep(),
                to: p2,
            },
        ],
        label_pos,
    })
}

/// An arc of a circle in data space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcGeometry {
    pub center: DVec2,
    /// Effective radius used for the path.
    pub radius: f64,
    /// First endpoint.
    pub start: DVec2,
    /// Second endpoint.
    pub end: DVec2,
    /// Angle of `start` in radians.
    pub start_angle: f64,
    /// Signed sweep in radians, positive counter-clockwise.
    pub sweep: f64,
}

impl ArcGeometry {
    pub fn direction(&self) -> Direction {
        if self.sweep >= 0.0 {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        }
    }

    pub fn large_arc(&self) -> bool {
        self.sweep.abs() > PI
    }

    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.sweep * 0.5
    }
}

/// Signed sweep from `v1` to `v2`, positive counter-clockwise.
///
/// The direction is the sign of `cross(v1, v2)`, so the arc never takes the
/// long way round. `None` when both vectors point along the same ray.
fn sweep_between(v1: DVec2, v2: DVec2) -> Option<f64> {
    let a1 = v1.y.atan2(v1.x);
    let a2 = v2.y.atan2(v2.x);
    let sweep = if math::cross(v1, v2) >= 0.0 {
        (a2 - a1).rem_euclid(TAU)
    } else {
        -(a1 - a2).rem_euclid(TAU)
    };
    (sweep.abs() >= LENGTH_EPSILON).then_some(sweep)
}

/// Arc between two anchor points, recomputed from their live coordinates.
///
/// The path runs between the true anchor coordinates with the average of the
/// two anchor distances as its radius. The direction follows the sign of the
/// cross product of the center-to-anchor vectors, positive meaning
/// counter-clockwise. Returns `None` if an anchor coincides with the center
/// or both anchors lie on the same ray.
pub fn point_arc(center: DVec2, start: DVec2, end: DVec2) -> Option<ArcGeometry> {
    let v1 = start - center;
    let v2 = end - center;
    let r1 = v1.length();
    let r2 = v2.length();
    if r1 < LENGTH_EPSILON || r2 < LENGTH_EPSILON {
        return None;
    }

    Some(ArcGeometry {
        center,
        radius: (r1 + r2) * 0.5,
        start,
        end,
        start_angle: v1.y.atan2(v1.x),
        sweep: sweep_between(v1, v2)?,
    })
}

/// Arc between the points of the circle at `start_deg` and `end_deg`.
///
/// Built like [`point_arc`] from the two angle-derived endpoints, so
/// `90 -> 0` is the clockwise quarter through the first quadrant.
/// Returns `None` for a non-positive radius or coinciding endpoints.
pub fn angle_arc(center: DVec2, radius: f64, start_deg: f64, end_deg: f64) -> Option<ArcGeometry> {
    if !(radius > LENGTH_EPSILON) {
        return None;
    }
    let a1 = start_deg.to_radians();
    let u1 = math::unit_at(a1);
    let u2 = math::unit_at(end_deg.to_radians());
    Some(ArcGeometry {
        center,
        radius,
        start: center + u1 * radius,
        end: center + u2 * radius,
        start_angle: a1,
        sweep: sweep_between(u1, u2)?,
    })
}

/// SVG path of an arc in canvas space, closed through the center when `sector`.
pub fn arc_path(arc: &ArcGeometry, mapper: &CoordinateMapper, sector: bool) -> Vec<PathSegment> {
    let p1 = mapper.to_screen(arc.start);
    let p2 = mapper.to_screen(arc.end);
    let to_end = PathSegment::ArcTo {
        radii: mapper.radii_to_screen(arc.radius),
        large_arc: arc.large_arc(),
        sweep: arc.direction().svg_sweep(),
        to: p2,
    };
    if sector {
        vec![
            PathSegment::MoveTo(mapper.to_screen(arc.center)),
            PathSegment::LineTo(p1),
            to_end,
            PathSegment::Close,
        ]
    } else {
        vec![PathSegment::MoveTo(p1), to_end]
    }
}

/// A dashed measurement stroke with its label anchor, in canvas space.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasureAnnotation {
    /// Dashed stroke, absent when only a label is drawn.
    pub segments: Option<Vec<PathSegment>>,
    pub label_pos: DVec2,
}

/// Radius annotation from `center` towards `angle` (data space), straight or bowed.
///
/// The bowed form is a quadratic Bezier whose control point sits off the
/// radius midpoint by `arc_bow_fraction` of the radius length; its label sits
/// on the curve midpoint. A degenerate radius yields `None`.
pub fn radius_annotation(
    mapper: &CoordinateMapper,
    center: DVec2,
    radius: f64,
    angle: f64,
    bowed: bool,
    config: &CanvasConfig,
) -> Option<MeasureAnnotation> {
    let c = mapper.to_screen(center);
    let e = mapper.to_screen(center + math::unit_at(angle) * radius);
    let normal = math::segment_normal(c, e)?;
    let mid = (c + e) * 0.5;

    if bowed {
        let control = mid + normal * (c.distance(e) * config.arc_bow_fraction);
        Some(MeasureAnnotation {
            segments: Some(vec![
                PathSegment::MoveTo(c),
                PathSegment::QuadTo { control, to: e },
            ]),
            label_pos: math::quadratic_point(c, control, e, 0.5),
        })
    } else {
        Some(MeasureAnnotation {
            segments: Some(vec![PathSegment::MoveTo(c), PathSegment::LineTo(e)]),
            label_pos: mid,
        })
    }
}

/// Length annotation of the canvas-space segment `start -> end`.
///
/// Straight: label at the midpoint pushed out along the normal by
/// `length_label_offset` pixels. Bowed: a dashed quadratic Bezier bulging
/// along the normal by `arc_bow_fraction` of the segment length, label at the
/// control point. A zero-length segment keeps its label on the midpoint and
/// draws no arc.
pub fn length_annotation(start: DVec2, end: DVec2, bowed: bool, config: &CanvasConfig) -> MeasureAnnotation {
    let mid = (start + end) * 0.5;
    let Some(normal) = math::segment_normal(start, end) else {
        return MeasureAnnotation {
            segments: None,
            label_pos: mid,
        };
    };

    if bowed {
        let control = mid + normal * (start.distance(end) * config.arc_bow_fraction);
        MeasureAnnotation {
            segments: Some(vec![
                PathSegment::MoveTo(start),
                PathSegment::QuadTo { control, to: end },
            ]),
            label_pos: control,
        }
    } else {
        MeasureAnnotation {
            segments: None,
            label_pos: mid + normal * config.length_label_offset,
        }
    }
}
