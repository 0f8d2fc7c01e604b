//! Render context.
//!
//! The context owns the draw-call registry shared by all mounted drawable
//! components. A render pass walks the registry in paint order, assigns hit
//! ids, and hands every draw call to a [`DrawExecutor`] supplied by the GPU
//! layer. Command execution and hit-buffer readback happen on that side.

mod ctx;
mod executor;

pub use ctx::{PendingUnmounts, RenderContext, SharedContext};
pub use executor::{DrawCall, DrawExecutor};
