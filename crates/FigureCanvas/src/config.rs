//! # Configuration
//!
//! This module defines the configuration struct for the Canvas.

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration parameters for the Canvas.
///
/// These settings allow the host application to tune layout, annotation
/// placement and the feel of the canvas interactions. Every field has a
/// default, so a partial JSON document is a valid override.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Inset in pixels between the canvas edge and the mapped domain. Default: 40.0.
    pub padding: f64,
    /// Fraction of each axis span added on both sides of the data bounds. Default: 0.2.
    pub domain_padding: f64,
    /// Smallest data span an axis may have before padding. Default: 2.0.
    pub min_domain_span: f64,
    /// Half-width of the extent used when the scene is empty. Default: 10.0.
    pub empty_extent: f64,
    /// Smallest shared span in square-grid mode. Default: 10.0.
    pub grid_min_span: f64,
    /// Lower zoom limit. Default: 0.5.
    pub min_zoom: f64,
    /// Upper zoom limit. Default: 3.0.
    pub max_zoom: f64,
    /// Zoom change per scroll tick. Default: 0.1.
    pub wheel_zoom_step: f64,
    /// Zoom change per zoom button press. Default: 0.2.
    pub button_zoom_step: f64,
    /// Rotation change per rotate control, in degrees. Default: 15.0.
    pub rotation_step: f64,
    /// Screen distance in pixels within which a press grabs a point. Default: 10.0.
    pub hit_radius: f64,
    /// Radius of the drawn point marker in pixels. Default: 4.0.
    pub point_radius: f64,
    /// Pixel radius of generic angle arcs. Default: 24.0.
    pub angle_arc_radius: f64,
    /// Extra pixels between an angle arc and its degree label. Default: 14.0.
    pub angle_label_offset: f64,
    /// Leg length in pixels of the right-angle glyph. Default: 12.0.
    pub right_angle_size: f64,
    /// Degrees within which an angle value counts as a right angle. Default: 0.05.
    pub right_angle_tolerance_deg: f64,
    /// Perpendicular pixel offset of straight length labels. Default: 14.0.
    pub length_label_offset: f64,
    /// Bulge of bowed annotations as a fraction of the annotated length. Default: 0.15.
    pub arc_bow_fraction: f64,
    /// Upper bound on grid lines per axis before the step is coarsened. Default: 40.
    pub max_grid_lines: usize,
    /// Visual styling configuration.
    pub style: CanvasStyle,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            domain_padding: 0.2,
            min_domain_span: 2.0,
            empty_extent: 10.0,
            grid_min_span: 10.0,
            min_zoom: 0.5,
            max_zoom: 3.0,
            wheel_zoom_step: 0.1,
            button_zoom_step: 0.2,
            rotation_step: 15.0,
            hit_radius: 10.0,
            point_radius: 4.0,
            angle_arc_radius: 24.0,
            angle_label_offset: 14.0,
            right_angle_size: 12.0,
            right_angle_tolerance_deg: 0.05,
            length_label_offset: 14.0,
            arc_bow_fraction: 0.15,
            max_grid_lines: 40,
            style: CanvasStyle::default(),
        }
    }
}

impl CanvasConfig {
    /// Loads a configuration from JSON, filling absent fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make the mapping or the zoom clamp singular.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::OutOfRange {
                field: "min_zoom",
                expected: "positive and not above max_zoom",
            });
        }
        if !(self.min_domain_span > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "min_domain_span",
                expected: "positive",
            });
        }
        if !(self.grid_min_span > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "grid_min_span",
                expected: "positive",
            });
        }
        if self.padding < 0.0 || self.domain_padding < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "padding",
                expected: "non-negative",
            });
        }
        Ok(())
    }
}

/// Visual styling configuration for the Canvas.
///
/// Colors are RGBA in `0.0 - 1.0`, stored as `glam::Vec4`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasStyle {
    /// Background color of the canvas.
    pub background_color: Vec4,
    /// Color of the grid lines.
    pub grid_color: Vec4,
    /// Color of the grid lines through the origin.
    pub grid_axis_color: Vec4,
    /// Color of the coordinate axes drawn under curves.
    pub axis_color: Vec4,
    /// Stroke color of curves.
    pub curve_color: Vec4,
    /// Stroke color of segments.
    pub line_color: Vec4,
    /// Stroke color of angle markers.
    pub angle_color: Vec4,
    /// Stroke color of circles and arcs.
    pub circle_color: Vec4,
    /// Fill color of sectors.
    pub sector_fill: Vec4,
    /// Color of dashed annotations (length arcs, radius lines).
    pub annotation_color: Vec4,
    /// Fill color of point markers.
    pub point_color: Vec4,
    /// Color of all text.
    pub text_color: Vec4,
    /// Stroke width of figure geometry in pixels.
    pub stroke_width: f64,
    /// Stroke width of the grid in pixels.
    pub grid_width: f64,
    /// Dash pattern (on, off) of dashed annotations in pixels.
    pub dash: [f64; 2],
    /// Font size of point labels in pixels.
    pub label_size: f64,
    /// Font size of measurement labels in pixels.
    pub annotation_size: f64,
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self {
            background_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            grid_color: Vec4::new(0.9, 0.9, 0.9, 1.0),
            grid_axis_color: Vec4::new(0.7, 0.7, 0.7, 1.0),
            axis_color: Vec4::new(0.4, 0.4, 0.4, 1.0),
            curve_color: Vec4::new(0.2, 0.4, 0.9, 1.0),
            line_color: Vec4::new(0.1, 0.1, 0.1, 1.0),
            angle_color: Vec4::new(0.85, 0.3, 0.2, 1.0),
            circle_color: Vec4::new(0.1, 0.5, 0.3, 1.0),
            sector_fill: Vec4::new(0.1, 0.5, 0.3, 0.2),
            annotation_color: Vec4::new(0.45, 0.45, 0.45, 1.0),
            point_color: Vec4::new(0.1, 0.1, 0.1, 1.0),
            text_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            stroke_width: 2.0,
            grid_width: 1.0,
            dash: [4.0, 4.0],
            label_size: 14.0,
            annotation_size: 12.0,
        }
    }
}
