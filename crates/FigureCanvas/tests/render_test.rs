use figure_canvas::{
    CanvasConfig,
    annotation::{self, Direction},
    model::{Angle, Circle, CircleKind, Curve, CurveType, Point, Scene},
    render,
    render::{DrawCommand, PathSegment, RenderList, Role},
    sampler,
    view::{ViewFlags, ViewState},
};
use glam::DVec2;
use std::f64::consts::FRAC_PI_2;

const VIEWPORT: DVec2 = DVec2::new(640.0, 480.0);

fn plain_view() -> ViewState {
    ViewState {
        flags: ViewFlags::empty(),
        ..Default::default()
    }
}

fn quarter(value: f64) -> Scene {
    Scene {
        points: vec![
            Point::new("O", 0.0, 0.0),
            Point::new("P", 1.0, 0.0),
            Point::new("Q", 0.0, 1.0),
        ],
        angles: vec![Angle {
            vertex: "O".into(),
            start: "P".into(),
            end: "Q".into(),
            value,
            show_value: true,
            rotation: None,
        }],
        ..Default::default()
    }
}

/// `(large_arc, sweep)` of the first arc command drawn with `role`.
fn arc_flags(list: &RenderList, role: Role) -> (bool, bool) {
    list.shapes
        .with_role(role)
        .find_map(|command| match command {
            DrawCommand::Path { segments, .. } => segments.iter().find_map(|segment| match segment {
                PathSegment::ArcTo { large_arc, sweep, .. } => Some((*large_arc, *sweep)),
                _ => None,
            }),
            _ => None,
        })
        .expect("arc path drawn")
}

#[test]
fn test_angle_sweep_is_counter_clockwise() {
    let sweep = annotation::angle_sweep(DVec2::ZERO, DVec2::X, DVec2::Y, 90.0, 0.0).unwrap();
    assert_eq!(sweep.direction, Direction::CounterClockwise);
    assert!((sweep.end - sweep.start - FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn test_right_angle_threshold() {
    let config = CanvasConfig::default();
    for (value, glyph) in [(90.0, true), (90.04, true), (89.96, true), (89.9, false), (90.1, false)] {
        let list = render(&quarter(value), &plain_view(), VIEWPORT, &config);
        let expected = usize::from(glyph);
        assert_eq!(list.count(Role::RightAngle), expected, "value {value}");
        assert_eq!(list.count(Role::AngleArc), 1 - expected, "value {value}");
        // Right angles carry no degree label.
        assert_eq!(list.texts(Role::AngleLabel).len(), 1 - expected, "value {value}");
    }
}

#[test]
fn test_generic_angle_arc_runs_counter_clockwise() {
    let list = render(&quarter(60.0), &plain_view(), VIEWPORT, &CanvasConfig::default());
    assert_eq!(arc_flags(&list, Role::AngleArc), (false, false));
    assert_eq!(list.texts(Role::AngleLabel), vec!["60°"]);
}

#[test]
fn test_point_arc_direction_follows_anchor_order() {
    let mut scene = Scene {
        points: vec![
            Point::new("O", 0.0, 0.0),
            Point::new("P", 3.0, 0.0),
            Point::new("Q", 0.0, 3.0),
        ],
        circles: vec![Circle {
            kind: CircleKind::PointArc {
                start_point: "P".into(),
                end_point: "Q".into(),
            },
            ..Circle::full("O", 3.0)
        }],
        ..Default::default()
    };
    let config = CanvasConfig::default();

    let list = render(&scene, &plain_view(), VIEWPORT, &config);
    assert_eq!(list.count(Role::Arc), 1);
    assert_eq!(arc_flags(&list, Role::Arc), (false, false));

    scene.circles[0].kind = CircleKind::PointArc {
        start_point: "Q".into(),
        end_point: "P".into(),
    };
    let list = render(&scene, &plain_view(), VIEWPORT, &config);
    assert_eq!(arc_flags(&list, Role::Arc), (false, true));
}

#[test]
fn test_point_arc_follows_live_anchor() {
    let scene = Scene {
        points: vec![
            Point::new("O", 0.0, 0.0),
            Point::new("P", 2.0, 0.0),
            Point::new("Q", -1.0, -1.0),
        ],
        circles: vec![Circle {
            kind: CircleKind::PointArc {
                start_point: "P".into(),
                end_point: "Q".into(),
            },
            ..Circle::full("O", 2.0)
        }],
        ..Default::default()
    };
    let list = render(&scene, &plain_view(), VIEWPORT, &CanvasConfig::default());
    let end = list
        .shapes
        .with_role(Role::Arc)
        .find_map(|command| match command {
            DrawCommand::Path { segments, .. } => match segments.last() {
                Some(PathSegment::ArcTo { to, .. }) => Some(*to),
                _ => None,
            },
            _ => None,
        })
        .expect("arc drawn");

    // The arc ends on the anchor itself, not on the stated radius.
    let canvas_q = list
        .shapes
        .with_role(Role::PointMarker)
        .nth(2)
        .and_then(|command| match command {
            DrawCommand::Ellipse { center, .. } => Some(*center),
            _ => None,
        })
        .expect("marker drawn");
    assert!((end - canvas_q).length() < 1e-9);
}

#[test]
fn test_numeric_arc_wraps_through_zero() {
    let scene = Scene {
        points: vec![Point::new("O", 0.0, 0.0)],
        circles: vec![Circle {
            show_radius: true,
            show_radius_arc: true,
            kind: CircleKind::AngleArc {
                start_angle: 300.0,
                end_angle: 30.0,
            },
            ..Circle::full("O", 2.0)
        }],
        ..Default::default()
    };
    let list = render(&scene, &plain_view(), VIEWPORT, &CanvasConfig::default());
    assert_eq!(arc_flags(&list, Role::Arc), (false, false));
    assert_eq!(list.count(Role::Radius), 1);
    assert_eq!(list.texts(Role::RadiusLabel), vec!["2"]);
}

#[test]
fn test_numeric_arc_runs_clockwise_when_end_precedes_start() {
    let scene = Scene {
        points: vec![Point::new("O", 0.0, 0.0)],
        circles: vec![Circle {
            kind: CircleKind::AngleArc {
                start_angle: 90.0,
                end_angle: 0.0,
            },
            ..Circle::full("O", 2.0)
        }],
        ..Default::default()
    };
    let list = render(&scene, &plain_view(), VIEWPORT, &CanvasConfig::default());
    // Small arc, clockwise on screen after the y-axis flip.
    assert_eq!(arc_flags(&list, Role::Arc), (false, true));
}

#[test]
fn test_quadratic_sampling_is_deterministic() {
    let curve = Curve {
        coefficient: Some(2.0),
        points: 3,
        ..Curve::new(CurveType::Quadratic, 0.0, 2.0)
    };
    let samples: Vec<DVec2> = sampler::sample(&curve).collect();
    assert_eq!(samples.len(), 3);
    for (sample, (x, y)) in samples.iter().zip([(0.0, 0.0), (1.0, 2.0), (2.0, 8.0)]) {
        assert!((sample.x - x).abs() < 1e-12);
        assert!((sample.y - y).abs() < 1e-12);
    }
}

#[test]
fn test_logarithm_gap_is_dropped() {
    let scene = Scene {
        curves: vec![Curve {
            base: Some(10.0),
            points: 61,
            ..Curve::new(CurveType::Logarithm, -1.0, 5.0)
        }],
        ..Default::default()
    };
    let list = render(&scene, &plain_view(), VIEWPORT, &CanvasConfig::default());
    assert_eq!(list.count(Role::Curve), 1);
    assert_eq!(list.count(Role::Axis), 2);
    for command in list.shapes.with_role(Role::Curve) {
        match command {
            DrawCommand::Polyline { points, .. } => {
                assert!(points.len() >= 49);
                assert!(points.iter().all(|p| p.is_finite()));
            }
            other => panic!("Expected a polyline, got {other:?}"),
        }
    }
}

#[test]
fn test_square_grid_draws_round_circles() {
    let scene = Scene {
        points: vec![Point::new("O", 1.0, 2.0), Point::new("F", 9.0, 2.5)],
        circles: vec![Circle::full("O", 1.5)],
        ..Default::default()
    };
    let view = ViewState {
        flags: ViewFlags::SQUARE_GRID | ViewFlags::SHOW_GRID,
        ..Default::default()
    };
    let list = render(&scene, &view, VIEWPORT, &CanvasConfig::default());
    match list.shapes.with_role(Role::Circle).next() {
        Some(DrawCommand::Ellipse { radii, .. }) => assert!((radii.x - radii.y).abs() < 1e-9),
        other => panic!("Expected a circle, got {other:?}"),
    }
}

#[test]
fn test_labels_stay_upright() {
    let mut view = plain_view();
    view.toggle(ViewFlags::FLIP_X);
    view.rotate_by(-75.0);
    view.set_zoom(2.0, &CanvasConfig::default());

    let list = render(&Scene::default_template(), &view, VIEWPORT, &CanvasConfig::default());
    let mut texts = 0;
    for item in &list.shapes.items {
        if let DrawCommand::Text { transform, .. } = &item.command {
            let combined = list.shapes.transform * *transform;
            assert!((combined.matrix2.x_axis - DVec2::new(2.0, 0.0)).length() < 1e-9);
            assert!((combined.matrix2.y_axis - DVec2::new(0.0, 2.0)).length() < 1e-9);
            texts += 1;
        }
    }
    assert!(texts >= 6);
}

#[test]
fn test_grid_ignores_rotation_and_flip() {
    let mut view = ViewState::default();
    view.toggle(ViewFlags::FLIP_Y);
    view.rotate_by(45.0);
    let list = render(&Scene::default_template(), &view, VIEWPORT, &CanvasConfig::default());
    assert_eq!(list.background.transform, glam::DAffine2::IDENTITY);
    assert_ne!(list.shapes.transform, glam::DAffine2::IDENTITY);
}
