//! Coordinate types shared by the input and hit-testing layers.
//!
//! - `Vec2` is pointer space: logical pixels, origin top-left, +Y down.
//! - `Vec3` / `Ray` are scene space, produced by the camera layer.

mod ray;
mod vec2;

pub use ray::{Ray, Vec3};
pub use vec2::Vec2;
