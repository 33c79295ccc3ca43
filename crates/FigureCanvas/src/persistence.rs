//! # Scene JSON boundary
//!
//! The only wire contract of the crate: the scene JSON produced upstream.
//! Ingest is all-or-nothing. A producer error payload or a missing top-level
//! array is a hard error; nothing partial is rendered.

use serde_json::Value;

use crate::error::SceneError;
use crate::model::Scene;

/// Top-level arrays every scene payload must carry.
pub const REQUIRED_ARRAYS: [&str; 5] = ["points", "lines", "angles", "circles", "curves"];

/// Parses a scene payload from JSON text.
pub fn parse_scene(json: &str) -> Result<Scene, SceneError> {
    let value: Value = serde_json::from_str(json)?;
    scene_from_value(value)
}

/// Validates and converts an already-parsed payload.
pub fn scene_from_value(value: Value) -> Result<Scene, SceneError> {
    let Some(object) = value.as_object() else {
        return Err(SceneError::NotAnObject);
    };

    if let Some(message) = object.get("error").and_then(Value::as_str) {
        tracing::warn!(error = %message, "Scene producer returned an error payload");
        return Err(SceneError::Producer(message.to_string()));
    }

    for name in REQUIRED_ARRAYS {
        if !object.get(name).is_some_and(Value::is_array) {
            tracing::warn!(field = name, "Rejecting scene without required array");
            return Err(SceneError::MissingArray(name));
        }
    }

    let scene: Scene = serde_json::from_value(value)?;
    warn_on_duplicate_labels(&scene);
    tracing::info!(
        points = scene.points.len(),
        lines = scene.lines.len(),
        angles = scene.angles.len(),
        circles = scene.circles.len(),
        curves = scene.curves.len(),
        "Ingested scene"
    );
    Ok(scene)
}

/// Serializes a scene back into the wire format.
pub fn scene_to_json(scene: &Scene) -> Result<String, SceneError> {
    Ok(serde_json::to_string_pretty(scene)?)
}

fn warn_on_duplicate_labels(scene: &Scene) {
    let index = scene.point_index();
    if index.len() != scene.points.len() {
        tracing::warn!(
            points = scene.points.len(),
            unique_labels = index.len(),
            "Scene has duplicate point labels; references resolve to the first"
        );
    }
}
