use glam::{DVec2, Vec4};
use std::collections::HashMap;

use crate::annotation::{self, AngleMarker, ArcGeometry};
use crate::config::{CanvasConfig, CanvasStyle};
use crate::math::{self, Rect};
use crate::model::{Circle, CircleKind, Point, Scene};
use crate::render::{DrawCommand, Layer, PathSegment, RenderList, Role, TextAnchor};
use crate::sampler;
use crate::scale::CoordinateMapper;
use crate::view::{ViewState, ViewTransform};

/// Everything a frame needs while walking the scene.
struct Frame<'a> {
    mapper: CoordinateMapper,
    transform: ViewTransform,
    config: &'a CanvasConfig,
    style: &'a CanvasStyle,
}

impl Frame<'_> {
    fn text(&self, layer: &mut Layer, role: Role, pos: DVec2, text: String, size: f64, anchor: TextAnchor) {
        layer.push(
            role,
            DrawCommand::Text {
                pos,
                text,
                color: self.style.text_color,
                size,
                anchor,
                transform: self.transform.text_counter(pos),
            },
        );
    }

    fn dashed_path(&self, layer: &mut Layer, role: Role, segments: Vec<PathSegment>) {
        layer.push(
            role,
            DrawCommand::Path {
                segments,
                fill: None,
                stroke: Some(self.style.annotation_color),
                width: self.style.grid_width,
                dash: Some(self.style.dash),
            },
        );
    }
}

/// High-level renderer for figures.
///
/// The `Painter` converts a [`Scene`] and a [`ViewState`] into a [`RenderList`].
/// It handles:
/// - the background grid (pan and zoom only)
/// - axes and sampled curves
/// - segments with their length labels or length arcs
/// - angle markers, circles, arcs and sectors with their annotations
/// - point markers and labels, drawn last so they stay on top
///
/// Rendering is a pure function of its inputs; nothing is cached between frames.
pub struct Painter;

impl Painter {
    /// Generates the display list for one frame.
    ///
    /// # Arguments
    /// * `scene` - The figure to draw.
    /// * `view` - Pan, zoom, rotation, flips and grid toggles.
    /// * `viewport` - Canvas size in pixels.
    /// * `config` - Layout constants and style.
    /// * `active_point` - Index of a point being dragged, drawn highlighted.
    pub fn draw_scene(
        scene: &Scene,
        view: &ViewState,
        viewport: DVec2,
        config: &CanvasConfig,
        active_point: Option<usize>,
    ) -> RenderList {
        let frame = Frame {
            mapper: CoordinateMapper::for_scene(scene, view.square_grid(), viewport, config),
            transform: ViewTransform::new(view, viewport),
            config,
            style: &config.style,
        };

        let mut background = Layer::new(frame.transform.background);
        if view.show_grid() {
            Self::draw_grid(&frame, viewport, &mut background);
        }

        // Painter's order: later items draw over earlier ones.
        let mut shapes = Layer::new(frame.transform.shapes);
        let index = scene.point_index();
        if !scene.curves.is_empty() {
            Self::draw_axes(&frame, &mut shapes);
        }
        Self::draw_curves(&frame, scene, &mut shapes);
        Self::draw_lines(&frame, scene, &index, &mut shapes);
        Self::draw_angles(&frame, scene, &index, &mut shapes);
        Self::draw_circles(&frame, scene, &index, &mut shapes);
        Self::draw_points(&frame, scene, active_point, &mut shapes);

        tracing::trace!(
            background = background.items.len(),
            shapes = shapes.items.len(),
            "Rendered frame"
        );

        RenderList {
            size: viewport,
            background_color: frame.style.background_color,
            background,
            shapes,
        }
    }

    /// Renders the unit grid under the visible area.
    ///
    /// The visible data rectangle is found by pushing the canvas corners back
    /// through the background transform and the mapper. The step grows in
    /// 1-2-5 increments when unit spacing would exceed `max_grid_lines`.
    fn draw_grid(frame: &Frame, viewport: DVec2, layer: &mut Layer) {
        let a = frame.transform.screen_to_background(DVec2::ZERO);
        let b = frame.transform.screen_to_background(viewport);
        let visible = frame.mapper.data_rect(a.min(b), a.max(b));
        let style = frame.style;

        let step_x = grid_step(visible.width(), frame.config.max_grid_lines);
        let step_y = grid_step(visible.height(), frame.config.max_grid_lines);
        let step = step_x.max(step_y);

        let mut push_line = |from: DVec2, to: DVec2, is_axis: bool| {
            let (role, color) = if is_axis {
                (Role::GridAxis, style.grid_axis_color)
            } else {
                (Role::Grid, style.grid_color)
            };
            layer.push(
                role,
                DrawCommand::Line {
                    start: frame.mapper.to_screen(from),
                    end: frame.mapper.to_screen(to),
                    color,
                    width: style.grid_width,
                    dash: None,
                },
            );
        };

        // Vertical lines
        for x in grid_values(visible.min.x, visible.max.x, step) {
            push_line(
                DVec2::new(x, visible.min.y),
                DVec2::new(x, visible.max.y),
                x == 0.0,
            );
        }

        // Horizontal lines
        for y in grid_values(visible.min.y, visible.max.y, step) {
            push_line(
                DVec2::new(visible.min.x, y),
                DVec2::new(visible.max.x, y),
                y == 0.0,
            );
        }
    }

    /// Coordinate axes through the data origin, spanning the mapped domain.
    fn draw_axes(frame: &Frame, layer: &mut Layer) {
        let domain = Rect::new(
            DVec2::new(frame.mapper.x.domain.0, frame.mapper.y.domain.0),
            DVec2::new(frame.mapper.x.domain.1, frame.mapper.y.domain.1),
        );
        let style = frame.style;
        let axes = [
            (DVec2::new(domain.min.x, 0.0), DVec2::new(domain.max.x, 0.0), "x"),
            (DVec2::new(0.0, domain.min.y), DVec2::new(0.0, domain.max.y), "y"),
        ];
        for (from, to, label) in axes {
            let end = frame.mapper.to_screen(to);
            layer.push(
                Role::Axis,
                DrawCommand::Line {
                    start: frame.mapper.to_screen(from),
                    end,
                    color: style.axis_color,
                    width: style.stroke_width * 0.75,
                    dash: None,
                },
            );
            frame.text(
                layer,
                Role::AxisLabel,
                end + DVec2::new(6.0, -6.0),
                label.to_string(),
                style.label_size,
                TextAnchor::Start,
            );
        }
    }

    /// One polyline per run of valid samples, so gaps stay open.
    fn draw_curves(frame: &Frame, scene: &Scene, layer: &mut Layer) {
        for curve in &scene.curves {
            for run in sampler::sample(curve).runs() {
                if run.len() < 2 {
                    continue;
                }
                layer.push(
                    Role::Curve,
                    DrawCommand::Polyline {
                        points: run.into_iter().map(|p| frame.mapper.to_screen(p)).collect(),
                        color: frame.style.curve_color,
                        width: frame.style.stroke_width,
                    },
                );
            }
        }
    }

    fn draw_lines(frame: &Frame, scene: &Scene, index: &HashMap<&str, &Point>, layer: &mut Layer) {
        let style = frame.style;
        for line in &scene.lines {
            let (Some(start), Some(end)) = (index.get(line.start.as_str()), index.get(line.end.as_str())) else {
                tracing::debug!(start = %line.start, end = %line.end, "Skipping segment with unresolved endpoint");
                continue;
            };
            let s = frame.mapper.to_screen(start.position());
            let e = frame.mapper.to_screen(end.position());
            layer.push(
                Role::Segment,
                DrawCommand::Line {
                    start: s,
                    end: e,
                    color: style.line_color,
                    width: style.stroke_width,
                    dash: None,
                },
            );

            if !(line.show_length || line.show_length_arc) {
                continue;
            }
            // The stored length wins over the measured distance.
            let length = line
                .length
                .unwrap_or_else(|| start.position().distance(end.position()));
            let measure = annotation::length_annotation(s, e, line.show_length_arc, frame.config);
            if let Some(segments) = measure.segments {
                frame.dashed_path(layer, Role::LengthArc, segments);
            }
            frame.text(
                layer,
                Role::LengthLabel,
                measure.label_pos,
                math::format_measure(length),
                style.annotation_size,
                TextAnchor::Middle,
            );
        }
    }

    fn draw_angles(frame: &Frame, scene: &Scene, index: &HashMap<&str, &Point>, layer: &mut Layer) {
        let style = frame.style;
        for angle in &scene.angles {
            let resolved = (
                index.get(angle.vertex.as_str()),
                index.get(angle.start.as_str()),
                index.get(angle.end.as_str()),
            );
            let (Some(vertex), Some(start), Some(end)) = resolved else {
                tracing::debug!(vertex = %angle.vertex, "Skipping angle with unresolved point");
                continue;
            };

            let marker = annotation::angle_marker(
                &frame.mapper,
                vertex.position(),
                start.position(),
                end.position(),
                angle.value,
                angle.rotation.unwrap_or(0.0),
                frame.config,
            );
            match marker {
                Some(AngleMarker::RightAngle { points }) => {
                    layer.push(
                        Role::RightAngle,
                        DrawCommand::Path {
                            segments: vec![
                                PathSegment::MoveTo(points[0]),
                                PathSegment::LineTo(points[1]),
                                PathSegment::LineTo(points[2]),
                            ],
                            fill: None,
                            stroke: Some(style.angle_color),
                            width: style.stroke_width * 0.75,
                            dash: None,
                        },
                    );
                }
                Some(AngleMarker::Arc { segments, label_pos }) => {
                    layer.push(
                        Role::AngleArc,
                        DrawCommand::Path {
                            segments,
                            fill: None,
                            stroke: Some(style.angle_color),
                            width: style.stroke_width * 0.75,
                            dash: None,
                        },
                    );
                    if angle.show_value {
                        frame.text(
                            layer,
                            Role::AngleLabel,
                            label_pos,
                            format!("{}°", math::format_measure(angle.value)),
                            style.annotation_size,
                            TextAnchor::Middle,
                        );
                    }
                }
                None => {
                    tracing::debug!(vertex = %angle.vertex, "Skipping degenerate angle");
                }
            }
        }
    }

    fn draw_circles(frame: &Frame, scene: &Scene, index: &HashMap<&str, &Point>, layer: &mut Layer) {
        for circle in &scene.circles {
            let Some(center) = index.get(circle.center.as_str()) else {
                tracing::debug!(center = %circle.center, "Skipping circle with unresolved center");
                continue;
            };
            let center = center.position();
            let valid_radius = circle.radius.is_finite() && circle.radius > 0.0;

            // Anchored arcs derive their radius from the anchors.
            let arc = match &circle.kind {
                CircleKind::Full | CircleKind::AngleArc { .. } if !valid_radius => {
                    tracing::debug!(center = %circle.center, radius = circle.radius, "Skipping circle with invalid radius");
                    continue;
                }
                CircleKind::Full => None,
                CircleKind::AngleArc {
                    start_angle,
                    end_angle,
                } => {
                    if (end_angle - start_angle).abs() >= 360.0 {
                        None
                    } else {
                        match annotation::angle_arc(center, circle.radius, *start_angle, *end_angle) {
                            Some(arc) => Some(arc),
                            None => {
                                tracing::debug!(center = %circle.center, "Skipping empty arc");
                                continue;
                            }
                        }
                    }
                }
                CircleKind::PointArc {
                    start_point,
                    end_point,
                } => {
                    let (Some(a), Some(b)) = (index.get(start_point.as_str()), index.get(end_point.as_str())) else {
                        tracing::debug!(start = %start_point, end = %end_point, "Skipping arc with unresolved anchor");
                        continue;
                    };
                    match annotation::point_arc(center, a.position(), b.position()) {
                        Some(arc) => Some(arc),
                        None => {
                            tracing::debug!(center = %circle.center, "Skipping degenerate arc");
                            continue;
                        }
                    }
                }
            };

            let radius_angle = match &arc {
                Some(arc) => {
                    Self::draw_arc(frame, circle, arc, layer);
                    arc.mid_angle()
                }
                None => {
                    layer.push(
                        Role::Circle,
                        DrawCommand::Ellipse {
                            center: frame.mapper.to_screen(center),
                            radii: frame.mapper.radii_to_screen(circle.radius),
                            fill: None,
                            stroke: Some(frame.style.circle_color),
                            width: frame.style.stroke_width,
                        },
                    );
                    0.0
                }
            };

            if circle.show_radius {
                let radius = arc.map_or(circle.radius, |arc| arc.radius);
                // The stated radius labels the circle unless it is unusable.
                let label = if valid_radius { circle.radius } else { radius };
                Self::draw_radius(frame, center, radius, label, circle, radius_angle, layer);
            }
        }
    }

    fn draw_arc(frame: &Frame, circle: &Circle, arc: &ArcGeometry, layer: &mut Layer) {
        let style = frame.style;
        if circle.fill_arc {
            layer.push(
                Role::Sector,
                DrawCommand::Path {
                    segments: annotation::arc_path(arc, &frame.mapper, true),
                    fill: Some(style.sector_fill),
                    stroke: None,
                    width: 0.0,
                    dash: None,
                },
            );
            let c = frame.mapper.to_screen(arc.center);
            for end in [arc.start, arc.end] {
                layer.push(
                    Role::SectorEdge,
                    DrawCommand::Line {
                        start: c,
                        end: frame.mapper.to_screen(end),
                        color: style.circle_color,
                        width: style.stroke_width * 0.5,
                        dash: None,
                    },
                );
            }
        }
        if circle.show_arc {
            layer.push(
                Role::Arc,
                DrawCommand::Path {
                    segments: annotation::arc_path(arc, &frame.mapper, false),
                    fill: None,
                    stroke: Some(style.circle_color),
                    width: style.stroke_width,
                    dash: None,
                },
            );
        }
    }

    fn draw_radius(
        frame: &Frame,
        center: DVec2,
        radius: f64,
        label: f64,
        circle: &Circle,
        angle: f64,
        layer: &mut Layer,
    ) {
        let Some(measure) = annotation::radius_annotation(
            &frame.mapper,
            center,
            radius,
            angle,
            circle.show_radius_arc,
            frame.config,
        ) else {
            return;
        };
        if let Some(segments) = measure.segments {
            frame.dashed_path(layer, Role::Radius, segments);
        }
        frame.text(
            layer,
            Role::RadiusLabel,
            measure.label_pos,
            math::format_measure(label),
            frame.style.annotation_size,
            TextAnchor::Middle,
        );
    }

    fn draw_points(frame: &Frame, scene: &Scene, active_point: Option<usize>, layer: &mut Layer) {
        let style = frame.style;
        for (i, point) in scene.points.iter().enumerate() {
            if !point.visible {
                continue;
            }
            let pos = frame.mapper.to_screen(point.position());
            let (radius, fill) = if active_point == Some(i) {
                (frame.config.point_radius * 1.5, highlight(style.point_color))
            } else {
                (frame.config.point_radius, style.point_color)
            };
            layer.push(
                Role::PointMarker,
                DrawCommand::Ellipse {
                    center: pos,
                    radii: DVec2::splat(radius),
                    fill: Some(fill),
                    stroke: None,
                    width: 0.0,
                },
            );
            frame.text(
                layer,
                Role::PointLabel,
                pos + DVec2::new(radius + 4.0, -(radius + 4.0)),
                point.label.clone(),
                style.label_size,
                TextAnchor::Start,
            );
        }
    }
}

/// Renders `scene` with no point highlighted.
pub fn render(scene: &Scene, view: &ViewState, viewport: DVec2, config: &CanvasConfig) -> RenderList {
    Painter::draw_scene(scene, view, viewport, config, None)
}

fn highlight(color: Vec4) -> Vec4 {
    (color * 1.3).min(Vec4::ONE).with_w(color.w)
}

/// Smallest 1-2-5 step, at least one unit, that keeps `span` under `max_lines` lines.
fn grid_step(span: f64, max_lines: usize) -> f64 {
    let raw = span / max_lines.max(1) as f64;
    if !raw.is_finite() || raw <= 1.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10.0 * magnitude)
}

/// Multiples of `step` inside `[min, max]`, computed by index to avoid drift.
fn grid_values(min: f64, max: f64, step: f64) -> impl Iterator<Item = f64> {
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(move |i| i as f64 * step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Angle, Curve, CurveType, Line};
    use crate::view::ViewFlags;

    const VIEWPORT: DVec2 = DVec2::new(600.0, 600.0);

    fn no_grid() -> ViewState {
        ViewState {
            flags: ViewFlags::empty(),
            ..Default::default()
        }
    }

    #[test]
    fn grid_step_follows_one_two_five() {
        assert_eq!(grid_step(12.0, 40), 1.0);
        assert_eq!(grid_step(60.0, 40), 2.0);
        assert_eq!(grid_step(150.0, 40), 5.0);
        assert_eq!(grid_step(390.0, 40), 10.0);
    }

    #[test]
    fn grid_values_include_both_ends() {
        let values: Vec<f64> = grid_values(-2.0, 2.0, 1.0).collect();
        assert_eq!(values, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn grid_lives_in_background_layer() {
        let scene = Scene::default_template();
        let with_grid = render(&scene, &ViewState::default(), VIEWPORT, &CanvasConfig::default());
        assert!(with_grid.count(Role::Grid) > 0);
        assert_eq!(with_grid.count(Role::GridAxis), 2);
        assert!(with_grid.shapes.with_role(Role::Grid).next().is_none());

        let without = render(&scene, &no_grid(), VIEWPORT, &CanvasConfig::default());
        assert!(without.background.items.is_empty());
    }

    #[test]
    fn axes_only_with_curves() {
        let config = CanvasConfig::default();
        let mut scene = Scene::default_template();
        assert_eq!(render(&scene, &no_grid(), VIEWPORT, &config).count(Role::Axis), 0);

        scene.curves.push(Curve::new(CurveType::Linear, -3.0, 3.0));
        let list = render(&scene, &no_grid(), VIEWPORT, &config);
        assert_eq!(list.count(Role::Axis), 2);
        assert_eq!(list.texts(Role::AxisLabel), vec!["x", "y"]);
        assert_eq!(list.count(Role::Curve), 1);
    }

    #[test]
    fn z_order_puts_points_last() {
        let list = render(&Scene::default_template(), &no_grid(), VIEWPORT, &CanvasConfig::default());
        let roles: Vec<Role> = list.shapes.items.iter().map(|item| item.role).collect();
        let first_point = roles.iter().position(|r| *r == Role::PointMarker).unwrap();
        let last_segment = roles.iter().rposition(|r| *r == Role::Segment).unwrap();
        let right_angle = roles.iter().position(|r| *r == Role::RightAngle).unwrap();
        assert!(last_segment < right_angle);
        assert!(right_angle < first_point);
    }

    #[test]
    fn stored_length_wins_over_distance() {
        let scene = Scene {
            points: vec![Point::new("A", 0.0, 0.0), Point::new("B", 3.0, 4.0)],
            lines: vec![
                Line {
                    show_length: true,
                    ..Line::new("A", "B")
                },
                Line {
                    length: Some(7.25),
                    show_length_arc: true,
                    ..Line::new("A", "B")
                },
            ],
            ..Default::default()
        };
        let list = render(&scene, &no_grid(), VIEWPORT, &CanvasConfig::default());
        assert_eq!(list.texts(Role::LengthLabel), vec!["5", "7.25"]);
        assert_eq!(list.count(Role::LengthArc), 1);
    }

    #[test]
    fn angle_label_only_when_requested() {
        let mut scene = Scene {
            points: vec![
                Point::new("O", 0.0, 0.0),
                Point::new("P", 4.0, 0.0),
                Point::new("Q", 2.0, 3.0),
            ],
            angles: vec![Angle {
                vertex: "O".into(),
                start: "P".into(),
                end: "Q".into(),
                value: 56.31,
                show_value: false,
                rotation: None,
            }],
            ..Default::default()
        };
        let config = CanvasConfig::default();
        let list = render(&scene, &no_grid(), VIEWPORT, &config);
        assert_eq!(list.count(Role::AngleArc), 1);
        assert!(list.texts(Role::AngleLabel).is_empty());

        scene.angles[0].show_value = true;
        let list = render(&scene, &no_grid(), VIEWPORT, &config);
        assert_eq!(list.texts(Role::AngleLabel), vec!["56.31°"]);
    }

    #[test]
    fn full_turn_angle_arc_draws_a_circle() {
        let scene = Scene {
            points: vec![Point::new("O", 0.0, 0.0)],
            circles: vec![Circle {
                kind: CircleKind::AngleArc {
                    start_angle: 0.0,
                    end_angle: 360.0,
                },
                ..Circle::full("O", 2.0)
            }],
            ..Default::default()
        };
        let list = render(&scene, &no_grid(), VIEWPORT, &CanvasConfig::default());
        assert_eq!(list.count(Role::Circle), 1);
        assert_eq!(list.count(Role::Arc), 0);
    }

    #[test]
    fn sector_draws_fill_edges_and_arc() {
        let scene = Scene {
            points: vec![Point::new("O", 0.0, 0.0)],
            circles: vec![Circle {
                fill_arc: true,
                show_radius: true,
                kind: CircleKind::AngleArc {
                    start_angle: 0.0,
                    end_angle: 120.0,
                },
                ..Circle::full("O", 2.0)
            }],
            ..Default::default()
        };
        let list = render(&scene, &no_grid(), VIEWPORT, &CanvasConfig::default());
        assert_eq!(list.count(Role::Sector), 1);
        assert_eq!(list.count(Role::SectorEdge), 2);
        assert_eq!(list.count(Role::Arc), 1);
        assert_eq!(list.count(Role::Circle), 0);
        assert_eq!(list.texts(Role::RadiusLabel), vec!["2"]);
    }

    #[test]
    fn anchored_arc_ignores_stated_radius() {
        let scene = Scene {
            points: vec![
                Point::new("O", 0.0, 0.0),
                Point::new("P", 3.0, 0.0),
                Point::new("Q", 0.0, 3.0),
            ],
            circles: vec![Circle {
                show_radius: true,
                kind: CircleKind::PointArc {
                    start_point: "P".into(),
                    end_point: "Q".into(),
                },
                ..Circle::full("O", 0.0)
            }],
            ..Default::default()
        };
        let list = render(&scene, &no_grid(), VIEWPORT, &CanvasConfig::default());
        assert_eq!(list.count(Role::Arc), 1);
        assert_eq!(list.texts(Role::RadiusLabel), vec!["3"]);

        let mut full = scene.clone();
        full.circles[0].kind = CircleKind::Full;
        let list = render(&full, &no_grid(), VIEWPORT, &CanvasConfig::default());
        assert_eq!(list.count(Role::Circle), 0);
    }

    #[test]
    fn texts_carry_counter_transform() {
        let mut view = no_grid();
        view.rotate_by(45.0);
        let list = render(&Scene::default_template(), &view, VIEWPORT, &CanvasConfig::default());
        let t = ViewTransform::new(&view, VIEWPORT);
        for item in &list.shapes.items {
            if let DrawCommand::Text { pos, transform, .. } = &item.command {
                assert_eq!(*transform, t.text_counter(*pos));
            }
        }
    }

    #[test]
    fn active_point_is_enlarged() {
        let config = CanvasConfig::default();
        let list = Painter::draw_scene(&Scene::default_template(), &no_grid(), VIEWPORT, &config, Some(1));
        let radii: Vec<f64> = list
            .shapes
            .with_role(Role::PointMarker)
            .filter_map(|command| match command {
                DrawCommand::Ellipse { radii, .. } => Some(radii.x),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![4.0, 6.0, 4.0]);
    }
}
