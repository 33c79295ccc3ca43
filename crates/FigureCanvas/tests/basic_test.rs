use figure_canvas::{
    Canvas, CanvasConfig,
    input::InputState,
    model::{Angle, Circle, Line, Point, Scene},
    render::{DrawCommand, Role},
};

fn triangle() -> Scene {
    let side = |start: &str, end: &str| Line {
        length: Some(5.0),
        show_length: true,
        ..Line::new(start, end)
    };
    Scene {
        points: vec![
            Point::new("A", 0.0, 0.0),
            Point::new("B", 5.0, 0.0),
            Point::new("C", 2.5, 4.0),
        ],
        lines: vec![side("A", "B"), side("B", "C"), side("C", "A")],
        ..Default::default()
    }
}

#[test]
fn test_triangle_scenario() {
    let mut canvas = Canvas::new(CanvasConfig::default());
    let (draw_list, events) = canvas.update(&InputState::default(), &triangle());

    assert!(events.is_empty());
    assert_eq!(draw_list.count(Role::Segment), 3);
    assert_eq!(draw_list.texts(Role::LengthLabel), vec!["5", "5", "5"]);
    assert_eq!(draw_list.count(Role::PointMarker), 3);
    assert_eq!(draw_list.texts(Role::PointLabel), vec!["A", "B", "C"]);

    for role in [
        Role::AngleArc,
        Role::RightAngle,
        Role::AngleLabel,
        Role::Circle,
        Role::Arc,
        Role::Sector,
        Role::Curve,
        Role::Axis,
    ] {
        assert_eq!(draw_list.count(role), 0, "unexpected {role:?}");
    }
}

#[test]
fn test_segments_land_on_mapped_points() {
    let mut canvas = Canvas::new(CanvasConfig::default());
    let scene = triangle();
    let (draw_list, _) = canvas.update(&InputState::default(), &scene);
    let mapper = canvas.mapper(&scene);

    let first = draw_list
        .shapes
        .with_role(Role::Segment)
        .next()
        .expect("segment drawn");
    match first {
        DrawCommand::Line { start, end, .. } => {
            assert_eq!(*start, mapper.to_screen(scene.points[0].position()));
            assert_eq!(*end, mapper.to_screen(scene.points[1].position()));
        }
        other => panic!("Expected a line, got {other:?}"),
    }
}

#[test]
fn test_unresolved_reference_is_skipped() {
    let mut scene = triangle();
    scene.lines.push(Line::new("A", "Z"));
    scene.angles.push(Angle {
        vertex: "Q".into(),
        start: "A".into(),
        end: "B".into(),
        value: 40.0,
        show_value: true,
        rotation: None,
    });
    scene.circles.push(Circle::full("Nowhere", 2.0));

    let mut canvas = Canvas::new(CanvasConfig::default());
    let (draw_list, _) = canvas.update(&InputState::default(), &scene);

    assert_eq!(draw_list.count(Role::Segment), 3);
    assert_eq!(draw_list.count(Role::AngleArc), 0);
    assert_eq!(draw_list.count(Role::Circle), 0);
    assert_eq!(draw_list.count(Role::PointMarker), 3);
}

#[test]
fn test_hidden_point_is_not_drawn_but_still_anchors() {
    let mut scene = triangle();
    scene.points[2].visible = false;

    let mut canvas = Canvas::new(CanvasConfig::default());
    let (draw_list, _) = canvas.update(&InputState::default(), &scene);

    assert_eq!(draw_list.count(Role::PointMarker), 2);
    assert_eq!(draw_list.texts(Role::PointLabel), vec!["A", "B"]);
    assert_eq!(draw_list.count(Role::Segment), 3);
}

#[test]
fn test_empty_scene_still_renders_grid() {
    let mut canvas = Canvas::new(CanvasConfig::default());
    let (draw_list, _) = canvas.update(&InputState::default(), &Scene::default());

    assert!(draw_list.shapes.items.is_empty());
    assert!(draw_list.count(Role::Grid) > 0);
    assert_eq!(draw_list.count(Role::GridAxis), 2);
}

#[test]
fn test_degenerate_geometry_never_produces_nan() {
    let scene = Scene {
        points: vec![Point::new("A", 1.0, 1.0), Point::new("B", 1.0, 1.0)],
        lines: vec![Line {
            show_length: true,
            show_length_arc: true,
            ..Line::new("A", "B")
        }],
        angles: vec![Angle {
            vertex: "A".into(),
            start: "B".into(),
            end: "B".into(),
            value: 30.0,
            show_value: true,
            rotation: None,
        }],
        circles: vec![Circle {
            show_radius: true,
            ..Circle::full("A", 0.0)
        }],
        ..Default::default()
    };

    let mut canvas = Canvas::new(CanvasConfig::default());
    let (draw_list, _) = canvas.update(&InputState::default(), &scene);

    assert_eq!(draw_list.texts(Role::LengthLabel), vec!["0"]);
    assert_eq!(draw_list.count(Role::LengthArc), 0);
    assert_eq!(draw_list.count(Role::Circle), 0);
    for item in draw_list.background.items.iter().chain(&draw_list.shapes.items) {
        let finite = match &item.command {
            DrawCommand::Line { start, end, .. } => start.is_finite() && end.is_finite(),
            DrawCommand::Ellipse { center, radii, .. } => center.is_finite() && radii.is_finite(),
            DrawCommand::Text { pos, .. } => pos.is_finite(),
            DrawCommand::Polyline { points, .. } => points.iter().all(|p| p.is_finite()),
            DrawCommand::Path { .. } => true,
        };
        assert!(finite, "non-finite {:?}", item.role);
    }
}
