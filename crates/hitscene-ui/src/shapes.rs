//! Sample drawable objects and ready-made kinds for them.
//!
//! The core treats objects as opaque; these types only show how a caller
//! pairs object data with an instance counting strategy.

use hitscene_engine::coords::Vec3;
use hitscene_engine::scene::{InstanceCount, RenderCommand};

use crate::kind::{make_drawable, DrawableKind, DrawableOptions};

pub type Rgba = [f32; 4];

/// A single posed primitive (cone, sphere, cube...).
#[derive(Debug, Clone, PartialEq)]
pub struct BaseShape {
    pub id: Option<u32>,
    pub position: Vec3,
    pub scale: Vec3,
    pub color: Rgba,
}

impl BaseShape {
    pub fn at(position: impl Into<Vec3>) -> Self {
        Self {
            id: None,
            position: position.into(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }
}

/// A point cloud drawn as one object.
///
/// `colors`, when non-empty, holds one color per point and overrides `color`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Marker {
    pub id: Option<u32>,
    pub points: Vec<Vec3>,
    pub color: Rgba,
    pub colors: Vec<Rgba>,
}

impl Marker {
    pub fn new(points: impl IntoIterator<Item = Vec3>) -> Self {
        Self { points: points.into_iter().collect(), ..Self::default() }
    }

    pub fn with_colors(mut self, colors: Vec<Rgba>) -> Self {
        self.colors = colors;
        self
    }

    /// One instance per point, so each point is hit-testable on its own.
    pub fn per_point() -> InstanceCount<Marker> {
        InstanceCount::from_fn(|m: &Marker| m.points.len() as u32)
    }

    /// One instance per color entry.
    pub fn per_color() -> InstanceCount<Marker> {
        InstanceCount::from_fn(|m: &Marker| m.colors.len() as u32)
    }
}

/// Cones drawn instanced, one instance per shape.
///
/// Hits on cones always carry an instance index.
pub fn cones<C>(command: C) -> DrawableKind<BaseShape, C> {
    make_drawable(
        "Cones",
        RenderCommand::new(command),
        DrawableOptions::instanced(InstanceCount::fixed(1)),
    )
}

/// Spheres drawn one per shape, not instanced.
pub fn spheres<C>(command: C) -> DrawableKind<BaseShape, C> {
    make_drawable("Spheres", RenderCommand::new(command), DrawableOptions::default())
}

/// Point markers with per-point picking.
pub fn points<C>(command: C) -> DrawableKind<Marker, C> {
    make_drawable(
        "Points",
        RenderCommand::new(command),
        DrawableOptions::instanced(Marker::per_point()),
    )
}
