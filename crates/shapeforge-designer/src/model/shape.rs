//! Shape records and the partial updates gestures produce for them.

use crate::geometry::{point_in_rotated_rect, rotated_bounds, rotated_corners, Bounds, Corner, Point};
use crate::model::group::GroupId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of a shape. Never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

/// Closed set of primitives the canvas can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Ellipse,
    Square,
    Rectangle,
    Triangle,
    Diamond,
    Hexagon,
    Star,
    Heart,
    Arrow,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 10] = [
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Square,
        ShapeKind::Rectangle,
        ShapeKind::Triangle,
        ShapeKind::Diamond,
        ShapeKind::Hexagon,
        ShapeKind::Star,
        ShapeKind::Heart,
        ShapeKind::Arrow,
    ];

    /// Width over height of the drawn figure inside its square box.
    pub fn aspect_ratio(&self) -> f64 {
        match self {
            ShapeKind::Ellipse => 1.5,
            ShapeKind::Rectangle | ShapeKind::Arrow => 2.0,
            ShapeKind::Diamond => 0.75,
            ShapeKind::Hexagon => 2.0 / 3.0_f64.sqrt(),
            _ => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "Circle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Square => "Square",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Diamond => "Diamond",
            ShapeKind::Hexagon => "Hexagon",
            ShapeKind::Star => "Star",
            ShapeKind::Heart => "Heart",
            ShapeKind::Arrow => "Arrow",
        }
    }

    /// Drawn width and height for a square box of side `size`.
    pub fn dimensions(&self, size: f64) -> (f64, f64) {
        let ratio = self.aspect_ratio();
        if ratio >= 1.0 {
            (size, size / ratio)
        } else {
            (size * ratio, size)
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn default_visible() -> bool {
    true
}

/// A placed shape.
///
/// `x`/`y` is the top-left of the untransformed square box of side `size`.
/// Mirroring is applied about the box center before `rotation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
    #[serde(default)]
    pub color_index: u8,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl Shape {
    pub fn new(id: ShapeId, kind: ShapeKind, x: f64, y: f64, size: f64) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            size,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
            color_index: 0,
            z_index: 0,
            group_id: None,
            name: kind.label().to_string(),
            visible: true,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    pub fn dimensions(&self) -> (f64, f64) {
        self.kind.dimensions(self.size)
    }

    /// Corners (nw, ne, se, sw) of the drawn frame after rotation.
    pub fn corners(&self) -> [Point; 4] {
        let (w, h) = self.dimensions();
        rotated_corners(self.center(), w, h, self.rotation)
    }

    pub fn corner(&self, corner: Corner) -> Point {
        self.corners()[corner_index(corner)]
    }

    /// Axis-aligned box enclosing the rotated frame.
    pub fn bounds(&self) -> Bounds {
        let (w, h) = self.dimensions();
        rotated_bounds(self.center(), w, h, self.rotation)
    }

    pub fn contains_point(&self, point: Point) -> bool {
        let (w, h) = self.dimensions();
        point_in_rotated_rect(point, self.center(), w, h, self.rotation)
    }

    pub fn has_odd_flip(&self) -> bool {
        crate::geometry::has_odd_flip(self.flip_x, self.flip_y)
    }

    /// Writes every field the patch carries.
    pub fn apply(&mut self, patch: &ShapePatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(flip_x) = patch.flip_x {
            self.flip_x = flip_x;
        }
        if let Some(flip_y) = patch.flip_y {
            self.flip_y = flip_y;
        }
        if let Some(color_index) = patch.color_index {
            self.color_index = color_index;
        }
    }

    pub fn snapshot(&self) -> ShapeSnapshot {
        ShapeSnapshot {
            x: self.x,
            y: self.y,
            size: self.size,
            rotation: self.rotation,
            flip_x: self.flip_x,
            flip_y: self.flip_y,
            kind: self.kind,
        }
    }
}

pub(crate) fn corner_index(corner: Corner) -> usize {
    match corner {
        Corner::Nw => 0,
        Corner::Ne => 1,
        Corner::Se => 2,
        Corner::Sw => 3,
    }
}

/// Geometry of a shape captured when a gesture starts.
///
/// Gestures compute every frame from these values and never re-read the
/// live shape for them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSnapshot {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotation: f64,
    pub flip_x: bool,
    pub flip_y: bool,
    pub kind: ShapeKind,
}

impl ShapeSnapshot {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    pub fn corner(&self, corner: Corner) -> Point {
        let (w, h) = self.kind.dimensions(self.size);
        rotated_corners(self.center(), w, h, self.rotation)[corner_index(corner)]
    }

    pub fn has_odd_flip(&self) -> bool {
        crate::geometry::has_odd_flip(self.flip_x, self.flip_y)
    }
}

/// Partial update for one shape. Every `Some` field replaces the stored
/// value outright; fields are never accumulated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_x: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_y: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_index: Option<u8>,
}

impl ShapePatch {
    pub fn position(pos: Point) -> Self {
        Self {
            x: Some(pos.x),
            y: Some(pos.y),
            ..Self::default()
        }
    }

    pub fn rotation(rotation: f64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    /// Position, size and rotation together.
    pub fn transform(pos: Point, size: f64, rotation: f64) -> Self {
        Self {
            x: Some(pos.x),
            y: Some(pos.y),
            size: Some(size),
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Batch of patches produced by a single input frame.
pub type ShapeUpdates = BTreeMap<ShapeId, ShapePatch>;
