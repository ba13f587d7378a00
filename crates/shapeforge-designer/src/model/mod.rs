//! Canvas data model: shapes, groups and shape patches.

pub mod group;
pub mod shape;

pub use group::{Group, GroupId};
pub use shape::{Shape, ShapeId, ShapeKind, ShapePatch, ShapeSnapshot, ShapeUpdates};
