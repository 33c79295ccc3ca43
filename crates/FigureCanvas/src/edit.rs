//! # Scene Edits
//!
//! Every change the host makes to a figure is expressed as a [`SceneEdit`] and
//! applied with [`Scene::apply`], which returns a replacement scene. The input
//! scene is left untouched, so several UI controls can hold the same snapshot
//! while a drag is in flight.

use crate::error::SceneError;
use crate::model::{Angle, Circle, CircleKind, Curve, Line, Point, Scene};

/// A single edit to a [`Scene`].
#[derive(Clone, Debug, PartialEq)]
pub enum SceneEdit {
    MovePoint { index: usize, x: f64, y: f64 },
    /// Renames a point and every reference to it.
    RenamePoint { index: usize, label: String },
    SetPointVisible { index: usize, visible: bool },
    AddPoint(Point),
    /// Removes a point together with the lines, angles and circles that reference it.
    RemovePoint { index: usize },
    AddLine(Line),
    RemoveLine { index: usize },
    SetLineLength { index: usize, length: Option<f64> },
    ToggleLineLength { index: usize },
    ToggleLineLengthArc { index: usize },
    AddAngle(Angle),
    RemoveAngle { index: usize },
    SetAngleValue { index: usize, value: f64 },
    ToggleAngleValue { index: usize },
    AddCircle(Circle),
    RemoveCircle { index: usize },
    ToggleCircleRadius { index: usize },
    ToggleCircleFill { index: usize },
    AddCurve(Curve),
    RemoveCurve { index: usize },
}

fn entity_mut<'a, T>(items: &'a mut [T], kind: &'static str, index: usize) -> Result<&'a mut T, SceneError> {
    items
        .get_mut(index)
        .ok_or(SceneError::EntityNotFound { kind, index })
}

fn remove_entity<T>(items: &mut Vec<T>, kind: &'static str, index: usize) -> Result<T, SceneError> {
    if index < items.len() {
        Ok(items.remove(index))
    } else {
        Err(SceneError::EntityNotFound { kind, index })
    }
}

fn rename(reference: &mut String, from: &str, to: &str) {
    if reference == from {
        *reference = to.to_string();
    }
}

impl Scene {
    /// Returns a new scene with `edit` applied.
    pub fn apply(&self, edit: SceneEdit) -> Result<Scene, SceneError> {
        let mut next = self.clone();
        match edit {
            SceneEdit::MovePoint { index, x, y } => {
                let point = entity_mut(&mut next.points, "point", index)?;
                point.x = x;
                point.y = y;
            }
            SceneEdit::RenamePoint { index, label } => {
                let old = entity_mut(&mut next.points, "point", index)?.label.clone();
                if old != label && next.points.iter().any(|p| p.label == label) {
                    return Err(SceneError::DuplicateLabel(label));
                }
                next.points[index].label = label.clone();
                next.rename_references(&old, &label);
            }
            SceneEdit::SetPointVisible { index, visible } => {
                entity_mut(&mut next.points, "point", index)?.visible = visible;
            }
            SceneEdit::AddPoint(point) => {
                if next.points.iter().any(|p| p.label == point.label) {
                    return Err(SceneError::DuplicateLabel(point.label));
                }
                next.points.push(point);
            }
            SceneEdit::RemovePoint { index } => {
                let removed = remove_entity(&mut next.points, "point", index)?;
                let label = removed.label.as_str();
                next.lines.retain(|l| !l.references(label));
                next.angles.retain(|a| !a.references(label));
                next.circles.retain(|c| !c.references(label));
            }
            SceneEdit::AddLine(line) => next.lines.push(line),
            SceneEdit::RemoveLine { index } => {
                remove_entity(&mut next.lines, "line", index)?;
            }
            SceneEdit::SetLineLength { index, length } => {
                entity_mut(&mut next.lines, "line", index)?.length = length;
            }
            SceneEdit::ToggleLineLength { index } => {
                let line = entity_mut(&mut next.lines, "line", index)?;
                line.show_length = !line.show_length;
            }
            SceneEdit::ToggleLineLengthArc { index } => {
                let line = entity_mut(&mut next.lines, "line", index)?;
                line.show_length_arc = !line.show_length_arc;
            }
            SceneEdit::AddAngle(angle) => next.angles.push(angle),
            SceneEdit::RemoveAngle { index } => {
                remove_entity(&mut next.angles, "angle", index)?;
            }
            SceneEdit::SetAngleValue { index, value } => {
                entity_mut(&mut next.angles, "angle", index)?.value = value;
            }
            SceneEdit::ToggleAngleValue { index } => {
                let angle = entity_mut(&mut next.angles, "angle", index)?;
                angle.show_value = !angle.show_value;
            }
            SceneEdit::AddCircle(circle) => next.circles.push(circle),
            SceneEdit::RemoveCircle { index } => {
                remove_entity(&mut next.circles, "circle", index)?;
            }
            SceneEdit::ToggleCircleRadius { index } => {
                let circle = entity_mut(&mut next.circles, "circle", index)?;
                circle.show_radius = !circle.show_radius;
            }
            SceneEdit::ToggleCircleFill { index } => {
                let circle = entity_mut(&mut next.circles, "circle", index)?;
                circle.fill_arc = !circle.fill_arc;
            }
            SceneEdit::AddCurve(curve) => next.curves.push(curve),
            SceneEdit::RemoveCurve { index } => {
                remove_entity(&mut next.curves, "curve", index)?;
            }
        }
        Ok(next)
    }

    fn rename_references(&mut self, from: &str, to: &str) {
        for line in &mut self.lines {
            rename(&mut line.start, from, to);
            rename(&mut line.end, from, to);
        }
        for angle in &mut self.angles {
            rename(&mut angle.vertex, from, to);
            rename(&mut angle.start, from, to);
            rename(&mut angle.end, from, to);
        }
        for circle in &mut self.circles {
            rename(&mut circle.center, from, to);
            if let CircleKind::PointArc {
                start_point,
                end_point,
            } = &mut circle.kind
            {
                rename(start_point, from, to);
                rename(end_point, from, to);
            }
        }
    }
}
