//! # Coordinate Mapper
//!
//! Maps data space (y grows upward) onto canvas space (y grows downward) and
//! back. The canvas space is the untransformed drawing surface; the pan, zoom,
//! rotation and flips of [`crate::view`] are applied on top of it.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::bounds;
use crate::config::CanvasConfig;
use crate::math::{LENGTH_EPSILON, Rect};
use crate::model::Scene;

/// Affine map from a domain interval onto a range interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    /// Builds a scale. A zero-width domain is widened around its midpoint.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (d0, d1) = domain;
        let domain = if (d1 - d0).abs() < LENGTH_EPSILON {
            let mid = (d0 + d1) * 0.5;
            (mid - 0.5, mid + 0.5)
        } else {
            domain
        };
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (r1 - r0).abs() < LENGTH_EPSILON {
            return (d0 + d1) * 0.5;
        }
        d0 + (value - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Signed pixels per data unit.
    pub fn factor(&self) -> f64 {
        (self.range.1 - self.range.0) / (self.domain.1 - self.domain.0)
    }
}

/// Forward and inverse mapping between data and canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapper {
    pub x: LinearScale,
    pub y: LinearScale,
}

impl CoordinateMapper {
    /// Maps `bounds` onto `[padding, size - padding]` on each axis independently.
    pub fn new(bounds: Rect, viewport: DVec2, config: &CanvasConfig) -> Self {
        let p = config.padding;
        Self {
            x: LinearScale::new((bounds.min.x, bounds.max.x), (p, viewport.x - p)),
            y: LinearScale::new((bounds.min.y, bounds.max.y), (viewport.y - p, p)),
        }
    }

    /// Square-grid mapping: one data unit has the same pixel length on both
    /// axes and the data origin sits at the center of the canvas.
    ///
    /// The shared span is `max(width, height, grid_min_span)` of `bounds`,
    /// widened if needed so that the farthest coordinate from the origin still
    /// fits, then stretched along the longer canvas axis by the aspect ratio.
    pub fn square(bounds: Rect, viewport: DVec2, config: &CanvasConfig) -> Self {
        let p = config.padding;
        let inner = (viewport - DVec2::splat(2.0 * p)).max(DVec2::splat(1.0));

        let reach = bounds.min.abs().max(bounds.max.abs()).max_element();
        let span = bounds
            .width()
            .max(bounds.height())
            .max(config.grid_min_span)
            .max(2.0 * reach);

        let (x_span, y_span) = if inner.x >= inner.y {
            (span * inner.x / inner.y, span)
        } else {
            (span, span * inner.y / inner.x)
        };

        Self {
            x: LinearScale::new((-x_span * 0.5, x_span * 0.5), (p, viewport.x - p)),
            y: LinearScale::new((-y_span * 0.5, y_span * 0.5), (viewport.y - p, p)),
        }
    }

    /// The mapping a frame of `scene` uses: padded scene bounds, square or not.
    pub fn for_scene(scene: &Scene, square: bool, viewport: DVec2, config: &CanvasConfig) -> Self {
        let bounds = bounds::padded_bounds(scene, config);
        if square {
            Self::square(bounds, viewport, config)
        } else {
            Self::new(bounds, viewport, config)
        }
    }

    pub fn to_screen(&self, data: DVec2) -> DVec2 {
        DVec2::new(self.x.apply(data.x), self.y.apply(data.y))
    }

    pub fn to_data(&self, screen: DVec2) -> DVec2 {
        DVec2::new(self.x.invert(screen.x), self.y.invert(screen.y))
    }

    /// Canvas-space unit direction of the data-space direction `v`.
    pub fn direction_to_screen(&self, v: DVec2) -> Option<DVec2> {
        crate::math::direction(DVec2::new(v.x * self.x.factor(), v.y * self.y.factor()))
    }

    /// Pixel radii of a data-space circle of radius `r`.
    pub fn radii_to_screen(&self, r: f64) -> DVec2 {
        DVec2::new((r * self.x.factor()).abs(), (r * self.y.factor()).abs())
    }

    /// Data-space rectangle covered by the canvas-space rectangle `[a, b]`.
    pub fn data_rect(&self, a: DVec2, b: DVec2) -> Rect {
        let p = self.to_data(a);
        let q = self.to_data(b);
        Rect::new(p.min(q), p.max(q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::new(DVec2::new(x0, y0), DVec2::new(x1, y1))
    }

    #[test]
    fn linear_roundtrip() {
        let config = CanvasConfig::default();
        let mapper = CoordinateMapper::new(bounds(-3.0, -1.0, 7.0, 12.0), DVec2::new(640.0, 480.0), &config);
        for p in [DVec2::new(0.0, 0.0), DVec2::new(-2.5, 11.0), DVec2::new(6.9, -0.3)] {
            let back = mapper.to_data(mapper.to_screen(p));
            assert!((back - p).length() < 1e-9);
        }
    }

    #[test]
    fn y_axis_is_inverted() {
        let config = CanvasConfig::default();
        let mapper = CoordinateMapper::new(bounds(0.0, 0.0, 10.0, 10.0), DVec2::new(500.0, 500.0), &config);
        assert_eq!(mapper.to_screen(DVec2::new(0.0, 0.0)), DVec2::new(40.0, 460.0));
        assert_eq!(mapper.to_screen(DVec2::new(10.0, 10.0)), DVec2::new(460.0, 40.0));
    }

    #[test]
    fn square_mode_has_equal_units() {
        let config = CanvasConfig::default();
        let cases = [
            (bounds(0.0, 0.0, 5.0, 4.0), DVec2::new(600.0, 600.0)),
            (bounds(-30.0, -1.0, 2.0, 1.0), DVec2::new(800.0, 450.0)),
            (bounds(3.0, 3.0, 3.0, 3.0), DVec2::new(300.0, 900.0)),
        ];
        for (b, viewport) in cases {
            let mapper = CoordinateMapper::square(b, viewport, &config);
            let origin = mapper.to_screen(DVec2::ZERO);
            let ux = (mapper.to_screen(DVec2::X).x - origin.x).abs();
            let uy = (mapper.to_screen(DVec2::Y).y - origin.y).abs();
            assert!((ux - uy).abs() < 1e-9, "{ux} != {uy}");
            assert!((origin - viewport * 0.5).length() < 1e-9);
        }
    }

    #[test]
    fn square_mode_keeps_far_points_on_canvas() {
        let config = CanvasConfig::default();
        let viewport = DVec2::new(600.0, 600.0);
        let mapper = CoordinateMapper::square(bounds(20.0, 20.0, 24.0, 24.0), viewport, &config);
        let p = mapper.to_screen(DVec2::new(24.0, 24.0));
        assert!(p.x <= viewport.x && p.y >= 0.0);
    }

    #[test]
    fn degenerate_domain_does_not_divide_by_zero() {
        let scale = LinearScale::new((2.0, 2.0), (0.0, 100.0));
        assert!(scale.apply(2.0).is_finite());
        assert_eq!(scale.apply(2.0), 50.0);
    }
}
