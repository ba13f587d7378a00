//! Geometry utilities.
//!
//! Pure math over canvas units. Angles cross this API in degrees; radians
//! only appear inside the trigonometric calls.

use serde::{Deserialize, Serialize};
use shapeforge_core::constants::GEOMETRY_EPSILON;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D point or vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (other - *self).length()
    }

    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector in the same direction, or `None` for a near-zero vector.
    pub fn normalized(&self) -> Option<Point> {
        let len = self.length();
        if len < GEOMETRY_EPSILON {
            None
        } else {
            Some(Point::new(self.x / len, self.y / len))
        }
    }

    /// Rotates this vector about the origin.
    pub fn rotated(&self, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Corner of a (possibly rotated) rectangular frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Nw,
    Ne,
    Se,
    Sw,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Nw, Corner::Ne, Corner::Se, Corner::Sw];

    pub fn opposite(&self) -> Corner {
        match self {
            Corner::Nw => Corner::Se,
            Corner::Ne => Corner::Sw,
            Corner::Se => Corner::Nw,
            Corner::Sw => Corner::Ne,
        }
    }

    /// Unit offsets from the frame center (screen axes, y down).
    pub fn signs(&self) -> (f64, f64) {
        match self {
            Corner::Nw => (-1.0, -1.0),
            Corner::Ne => (1.0, -1.0),
            Corner::Se => (1.0, 1.0),
            Corner::Sw => (-1.0, 1.0),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing every point; `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Bounds> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds::new(p.x, p.y, p.x, p.y),
                Some(b) => Bounds::new(
                    b.min_x.min(p.x),
                    b.min_y.min(p.y),
                    b.max_x.max(p.x),
                    b.max_y.max(p.y),
                ),
            })
        })
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn max_dimension(&self) -> f64 {
        self.width().max(self.height())
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::Nw => Point::new(self.min_x, self.min_y),
            Corner::Ne => Point::new(self.max_x, self.min_y),
            Corner::Se => Point::new(self.max_x, self.max_y),
            Corner::Sw => Point::new(self.min_x, self.max_y),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Rotates `point` about `center` by `degrees` (clockwise on a y-down screen).
pub fn rotate_point(point: Point, center: Point, degrees: f64) -> Point {
    center + (point - center).rotated(degrees)
}

/// Corners (nw, ne, se, sw) of a `width` × `height` frame centered on
/// `center` and rotated by `rotation` degrees about that center.
pub fn rotated_corners(center: Point, width: f64, height: f64, rotation: f64) -> [Point; 4] {
    Corner::ALL.map(|corner| {
        let (sx, sy) = corner.signs();
        center + Point::new(sx * width / 2.0, sy * height / 2.0).rotated(rotation)
    })
}

/// Axis-aligned box enclosing a rotated frame.
pub fn rotated_bounds(center: Point, width: f64, height: f64, rotation: f64) -> Bounds {
    let [a, b, c, d] = rotated_corners(center, width, height, rotation);
    Bounds::new(
        a.x.min(b.x).min(c.x).min(d.x),
        a.y.min(b.y).min(c.y).min(d.y),
        a.x.max(b.x).max(c.x).max(d.x),
        a.y.max(b.y).max(c.y).max(d.y),
    )
}

/// Hit test against a rotated frame: inverse-rotate the query point into
/// the frame's axis-aligned space and test containment there.
pub fn point_in_rotated_rect(
    point: Point,
    center: Point,
    width: f64,
    height: f64,
    rotation: f64,
) -> bool {
    let local = rotate_point(point, center, -rotation);
    (local.x - center.x).abs() <= width / 2.0 && (local.y - center.y).abs() <= height / 2.0
}

/// Direction from `from` to `to` in degrees.
pub fn angle_between(from: Point, to: Point) -> f64 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

pub fn distance(a: Point, b: Point) -> f64 {
    a.distance_to(b)
}

/// Wraps an angle difference into (-180, 180].
pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Rounds to the nearest multiple of `increment`.
pub fn snap_angle(degrees: f64, increment: f64) -> f64 {
    if increment <= 0.0 {
        return degrees;
    }
    (degrees / increment).round() * increment
}

/// True when exactly one of the two mirror flags is set.
pub fn has_odd_flip(flip_x: bool, flip_y: bool) -> bool {
    flip_x ^ flip_y
}

/// Rotation delta as it must be applied to a shape's `rotation` field for
/// the shape to visibly turn by `delta` degrees.
pub fn flip_compensated(delta: f64, flip_x: bool, flip_y: bool) -> f64 {
    if has_odd_flip(flip_x, flip_y) {
        -delta
    } else {
        delta
    }
}
