//! Element model: drawable board elements and their ordering key.
//!
//! An [`Element`] carries an opaque id (the sole merge key), a closed
//! per-kind [`Shape`], position, presentation attributes, and a `z_index`
//! paint-order key. Kind is fixed at creation; everything else is mutable
//! through [`ElementPatch`], which applies only the fields that exist for the
//! element's kind and silently ignores the rest.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a board element.
pub type ElementId = Uuid;

/// A point in board coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The kind of a board element. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    /// Freeform pen stroke through a flat `[x0, y0, x1, y1, ...]` point list.
    FreehandPath,
    /// Straight segment between the first and last point in the list.
    Line,
    /// Line with an arrowhead at the final point.
    Arrow,
    /// Axis-aligned rectangle anchored at `(x, y)`.
    Rectangle,
    /// Circle centered at `(x, y)`.
    Circle,
    /// Text run anchored at `(x, y)`.
    Text,
}

/// Per-kind geometry, discriminated by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Shape {
    FreehandPath { points: Vec<f64> },
    Line { points: Vec<f64> },
    Arrow { points: Vec<f64> },
    Rectangle { width: f64, height: f64 },
    Circle { radius: f64 },
    Text { text: String, font_size: f64 },
}

impl Shape {
    /// The discriminant of this shape.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Shape::FreehandPath { .. } => ElementKind::FreehandPath,
            Shape::Line { .. } => ElementKind::Line,
            Shape::Arrow { .. } => ElementKind::Arrow,
            Shape::Rectangle { .. } => ElementKind::Rectangle,
            Shape::Circle { .. } => ElementKind::Circle,
            Shape::Text { .. } => ElementKind::Text,
        }
    }

    /// Type-appropriate empty geometry for a freshly created element.
    #[must_use]
    pub fn default_for(kind: ElementKind) -> Self {
        match kind {
            ElementKind::FreehandPath => Shape::FreehandPath { points: Vec::new() },
            ElementKind::Line => Shape::Line { points: Vec::new() },
            ElementKind::Arrow => Shape::Arrow { points: Vec::new() },
            ElementKind::Rectangle => Shape::Rectangle { width: 0.0, height: 0.0 },
            ElementKind::Circle => Shape::Circle { radius: 0.0 },
            ElementKind::Text => Shape::Text { text: String::new(), font_size: DEFAULT_FONT_SIZE },
        }
    }
}

/// Default font size for new text elements.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Stroke/fill attributes applied to new elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub stroke: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    pub stroke_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self { stroke: "#000000".into(), fill: None, stroke_width: 2.0 }
    }
}

fn one() -> f64 {
    1.0
}

/// A drawable board element as stored in every replica and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Opaque unique id, generated by the creating client. The sole merge key.
    pub id: ElementId,
    /// Per-kind geometry, flattened onto the element with a `kind` tag.
    #[serde(flatten)]
    pub shape: Shape,
    pub x: f64,
    pub y: f64,
    pub stroke: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    pub stroke_width: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "one")]
    pub scale_x: f64,
    #[serde(default = "one")]
    pub scale_y: f64,
    #[serde(default = "one")]
    pub opacity: f64,
    /// Paint-order key; ties are broken by `id` for determinism.
    pub z_index: i64,
}

impl Element {
    /// Create a new element with a fresh id and default geometry for `kind`.
    ///
    /// The caller supplies `z_index`, which must be greater than any value it
    /// has already allocated (replicas hand these out from a local monotonic
    /// counter).
    #[must_use]
    pub fn create(kind: ElementKind, origin: Point, style: &Style, z_index: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            shape: Shape::default_for(kind),
            x: origin.x,
            y: origin.y,
            stroke: style.stroke.clone(),
            fill: style.fill.clone(),
            stroke_width: style.stroke_width,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            z_index,
        }
    }

    /// Apply a sparse update. Geometry fields that don't exist for this
    /// element's kind are ignored rather than rejected, so a peer speaking a
    /// newer dialect can't fail the whole apply.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(ref stroke) = patch.stroke {
            self.stroke = stroke.clone();
        }
        if let Some(ref fill) = patch.fill {
            self.fill = Some(fill.clone());
        }
        if let Some(w) = patch.stroke_width {
            self.stroke_width = w;
        }
        if let Some(r) = patch.rotation {
            self.rotation = r;
        }
        if let Some(sx) = patch.scale_x {
            self.scale_x = sx;
        }
        if let Some(sy) = patch.scale_y {
            self.scale_y = sy;
        }
        if let Some(o) = patch.opacity {
            self.opacity = o;
        }
        if let Some(z) = patch.z_index {
            self.z_index = z;
        }

        match &mut self.shape {
            Shape::FreehandPath { points } | Shape::Line { points } | Shape::Arrow { points } => {
                if let Some(ref p) = patch.points {
                    points.clone_from(p);
                }
            }
            Shape::Rectangle { width, height } => {
                if let Some(w) = patch.width {
                    *width = w;
                }
                if let Some(h) = patch.height {
                    *height = h;
                }
            }
            Shape::Circle { radius } => {
                if let Some(r) = patch.radius {
                    *radius = r;
                }
            }
            Shape::Text { text, font_size } => {
                if let Some(ref t) = patch.text {
                    text.clone_from(t);
                }
                if let Some(fs) = patch.font_size {
                    *font_size = fs;
                }
            }
        }
    }
}

/// Sparse update for an element. Only present fields are applied; `kind`
/// deliberately has no slot here, so a patch can never change an element's
/// kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
}
