//! # Bounds Calculator
//!
//! Computes the padded data extent the coordinate mapper maps onto the canvas.

use glam::DVec2;

use crate::config::CanvasConfig;
use crate::math::Rect;
use crate::model::Scene;
use crate::sampler;

/// Raw union of everything a scene can draw, before padding.
///
/// Hidden points are included: they still anchor geometry. Returns `None`
/// when the scene contributes no coordinates at all.
pub fn scene_extent(scene: &Scene) -> Option<Rect> {
    let mut extent: Option<Rect> = None;
    let mut include = |p: DVec2| {
        if !p.is_finite() {
            return;
        }
        match extent.as_mut() {
            Some(rect) => rect.include(p),
            None => extent = Some(Rect::from_point(p)),
        }
    };

    for point in &scene.points {
        include(point.position());
    }

    let index = scene.point_index();
    for circle in &scene.circles {
        if let Some(center) = index.get(circle.center.as_str()) {
            let r = DVec2::splat(circle.radius.abs());
            include(center.position() - r);
            include(center.position() + r);
        }
    }

    for curve in &scene.curves {
        let mut y_range: Option<(f64, f64)> = None;
        for sample in sampler::sample(curve) {
            y_range = Some(match y_range {
                Some((lo, hi)) => (lo.min(sample.y), hi.max(sample.y)),
                None => (sample.y, sample.y),
            });
        }
        // A curve with no valid sample contributes nothing.
        if let Some((lo, hi)) = y_range {
            include(DVec2::new(curve.x_range.min, lo));
            include(DVec2::new(curve.x_range.max, hi));
        }
    }

    extent
}

/// Padded extent handed to the coordinate mapper.
///
/// Falls back to `±empty_extent` for an empty scene, floors each axis to
/// `min_domain_span` and then grows both sides by `domain_padding` of the span.
pub fn padded_bounds(scene: &Scene, config: &CanvasConfig) -> Rect {
    let extent = scene_extent(scene).unwrap_or_else(|| {
        Rect::new(
            DVec2::splat(-config.empty_extent),
            DVec2::splat(config.empty_extent),
        )
    });

    let center = extent.center();
    let span = DVec2::new(extent.width(), extent.height()).max(DVec2::splat(config.min_domain_span));
    let floored = Rect::new(center - span * 0.5, center + span * 0.5);
    floored.expand(span * config.domain_padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Circle, Curve, CurveType, Point};

    #[test]
    fn empty_scene_uses_default_extent() {
        let config = CanvasConfig::default();
        let bounds = padded_bounds(&Scene::default(), &config);
        assert!((bounds.min.x + 14.0).abs() < 1e-9);
        assert!((bounds.max.y - 14.0).abs() < 1e-9);
    }

    #[test]
    fn circles_and_hidden_points_extend_the_box() {
        let scene = Scene {
            points: vec![
                Point::new("O", 0.0, 0.0),
                Point {
                    visible: false,
                    ..Point::new("H", -6.0, 1.0)
                },
            ],
            circles: vec![Circle::full("O", 3.0)],
            ..Default::default()
        };
        let extent = scene_extent(&scene).unwrap();
        assert_eq!(extent.min, DVec2::new(-6.0, -3.0));
        assert_eq!(extent.max, DVec2::new(3.0, 3.0));
    }

    #[test]
    fn curve_contributes_sampled_y_range() {
        let scene = Scene {
            curves: vec![Curve {
                points: 5,
                ..Curve::new(CurveType::Quadratic, -2.0, 2.0)
            }],
            ..Default::default()
        };
        let extent = scene_extent(&scene).unwrap();
        assert_eq!(extent.min, DVec2::new(-2.0, 0.0));
        assert_eq!(extent.max, DVec2::new(2.0, 4.0));
    }

    #[test]
    fn single_point_is_floored_to_minimum_span() {
        let config = CanvasConfig::default();
        let scene = Scene {
            points: vec![Point::new("P", 3.0, 3.0)],
            ..Default::default()
        };
        let bounds = padded_bounds(&scene, &config);
        assert!(bounds.width() > 0.0 && bounds.height() > 0.0);
        assert!((bounds.center() - DVec2::splat(3.0)).length() < 1e-9);
        assert!((bounds.width() - 2.8).abs() < 1e-9);
    }
}
