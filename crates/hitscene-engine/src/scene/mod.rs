//! Draw-call registry.
//!
//! Responsibilities:
//! - track mounted drawable components and the draw call each one registers
//! - provide deterministic paint order (layer index + mount order)
//! - keep the per-object instance counting strategy next to each draw call

mod command;
mod entry;
mod instance;
mod key;
mod layer;
mod registry;

pub use command::RenderCommand;
pub use entry::DrawCallEntry;
pub use instance::{resolve_instance_count, InstanceCount};
pub use key::SortKey;
pub use layer::LayerIndex;
pub use registry::{ComponentKey, DrawRegistry};
