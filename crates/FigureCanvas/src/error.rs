//! # Errors
//!
//! Hard failures only. Per-entity problems (a line naming a missing point, a
//! zero-length segment, a logarithm sample at `x <= 0`) never surface here:
//! the painter skips them and keeps drawing.

use thiserror::Error;

/// Errors raised while ingesting or editing a [`Scene`](crate::model::Scene).
#[derive(Debug, Error)]
pub enum SceneError {
    /// The upstream producer answered with an `{ "error": ... }` payload.
    #[error("scene producer reported an error: {0}")]
    Producer(String),
    /// A required top-level array is absent or is not an array.
    #[error("scene is missing required array `{0}`")]
    MissingArray(&'static str),
    /// The payload is not a JSON object at all.
    #[error("scene payload must be a JSON object")]
    NotAnObject,
    /// Any other structural mismatch against the wire schema.
    #[error("malformed scene: {0}")]
    Json(#[from] serde_json::Error),
    /// An edit addressed an entity index that does not exist.
    #[error("no {kind} at index {index}")]
    EntityNotFound { kind: &'static str, index: usize },
    /// An edit would introduce a second point with the same label.
    #[error("a point labeled `{0}` already exists")]
    DuplicateLabel(String),
}

/// Errors raised while loading a [`CanvasConfig`](crate::config::CanvasConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid canvas config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid canvas config: {field} must be {expected}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
    },
}
