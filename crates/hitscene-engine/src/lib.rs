//! hitscene engine crate.
//!
//! This crate owns the platform-agnostic runtime pieces of the hit-testing
//! layer: pointer input, the draw-call registry, the hit identity codec and
//! the shared render context used by higher layers.

pub mod coords;
pub mod hit;
pub mod input;
pub mod render;
pub mod scene;

pub mod logging;
