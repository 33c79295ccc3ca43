use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Lengths below this are treated as zero when used as a denominator.
pub const LENGTH_EPSILON: f64 = 1e-9;

/// Axis-aligned rectangle in data space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    pub fn from_point(p: DVec2) -> Self {
        Self { min: p, max: p }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Grows the rectangle to include `p`.
    pub fn include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn expand(&self, amount: DVec2) -> Self {
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }
}

/// z-component of the 2-D cross product. Positive when `b` lies counter-clockwise of `a`.
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Normalizes an angle in radians into `(-PI, PI]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Wraps a value in degrees into `[0, 360)`.
pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit vector at `angle` radians, counter-clockwise from +x.
pub fn unit_at(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

/// Unit vector of `v`, or `None` when `v` is too short to have a direction.
pub fn direction(v: DVec2) -> Option<DVec2> {
    let len = v.length();
    if len < LENGTH_EPSILON || !len.is_finite() {
        None
    } else {
        Some(v / len)
    }
}

/// Left-hand unit normal of the segment `start -> end`, or `None` for a zero-length segment.
pub fn segment_normal(start: DVec2, end: DVec2) -> Option<DVec2> {
    direction(end - start).map(|d| d.perp())
}

/// Point on the quadratic Bezier `p0, c, p1` at parameter `t`.
pub fn quadratic_point(p0: DVec2, c: DVec2, p1: DVec2, t: f64) -> DVec2 {
    let u = 1.0 - t;
    p0 * (u * u) + c * (2.0 * u * t) + p1 * (t * t)
}

/// Formats a measurement for a label: at most two decimals, trailing zeros trimmed.
pub fn format_measure(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" { "0".to_string() } else { text.to_string() }
}
