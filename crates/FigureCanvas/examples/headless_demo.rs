use anyhow::Context;
use figure_canvas::input::{Control, InputState, MouseButtons};
use figure_canvas::model::Scene;
use figure_canvas::persistence::parse_scene;
use figure_canvas::render::Role;
use figure_canvas::{Canvas, CanvasConfig, LogicEvent};
use glam::DVec2;

const SCENE: &str = r#"{
    "points": [
        {"x": 0, "y": 0, "label": "A"},
        {"x": 6, "y": 0, "label": "B"},
        {"x": 2, "y": 4, "label": "C"}
    ],
    "lines": [
        {"start": "A", "end": "B", "showLength": true},
        {"start": "B", "end": "C", "showLengthArc": true},
        {"start": "C", "end": "A", "showLength": true}
    ],
    "angles": [
        {"vertex": "A", "start": "B", "end": "C", "value": 63.43, "showValue": true}
    ],
    "circles": [
        {"center": "A", "radius": 2, "startPoint": "B", "endPoint": "C", "fillArc": true, "showRadius": true}
    ],
    "curves": [
        {"type": "quadratic", "coefficient": 0.25, "xRange": {"min": -4, "max": 4}}
    ]
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== FigureCanvas Headless Demo ===");

    let screen_size = DVec2::new(960.0, 720.0);
    let mut canvas = Canvas::new(CanvasConfig::default());
    let mut scene: Scene = parse_scene(SCENE).context("demo scene should parse")?;
    println!(
        "Loaded scene: {} points, {} lines, {} angles, {} circles, {} curves",
        scene.points.len(),
        scene.lines.len(),
        scene.angles.len(),
        scene.circles.len(),
        scene.curves.len()
    );

    // Frame 0: settle the viewport, then find where C is drawn.
    let idle = InputState {
        screen_size,
        ..Default::default()
    };
    canvas.update(&idle, &scene);
    let grab = canvas
        .view_transform()
        .canvas_to_screen(canvas.mapper(&scene).to_screen(scene.points[2].position()));

    // Frames 1-4: drag C to the right, then release and rotate the view.
    let frames = [
        (grab, true, vec![]),
        (grab + DVec2::new(40.0, 10.0), true, vec![]),
        (grab + DVec2::new(80.0, 20.0), true, vec![]),
        (grab + DVec2::new(80.0, 20.0), false, vec![Control::RotateClockwise, Control::ZoomIn]),
    ];

    let mut last = None;
    for (frame, (mouse_pos, left, controls)) in frames.into_iter().enumerate() {
        let input = InputState {
            mouse_pos,
            mouse_buttons: MouseButtons {
                left,
                ..Default::default()
            },
            controls,
            screen_size,
            ..Default::default()
        };
        let (draw_list, events) = canvas.update(&input, &scene);
        println!("\n--- Frame {} ---", frame + 1);
        for event in events {
            match event {
                LogicEvent::SceneReplaced(next) => {
                    let c = &next.points[2];
                    println!("  C moved to ({:.2}, {:.2})", c.x, c.y);
                    scene = next;
                }
                other => println!("  Event: {other:?}"),
            }
        }
        last = Some(draw_list);
    }

    let draw_list = last.context("no frame rendered")?;
    println!("\n--- Display list ---");
    for role in [Role::Grid, Role::Segment, Role::AngleArc, Role::Sector, Role::Arc, Role::Curve, Role::PointMarker] {
        println!("  {role:?}: {}", draw_list.count(role));
    }
    println!("  Point labels: {:?}", draw_list.texts(Role::PointLabel));

    if let Some(path) = std::env::args().nth(1) {
        let json = serde_json::to_string_pretty(&draw_list)?;
        std::fs::write(&path, &json).with_context(|| format!("writing {path}"))?;
        println!("\nWrote {} bytes of display list JSON to {path}", json.len());
    }

    println!("\nDemo Complete.");
    Ok(())
}
