//! Hit identity codec.
//!
//! Every render pass assigns each (draw call, object, instance) triple of the
//! interactive draw calls a [`HitId`], stamped with the pass's [`Generation`].
//! The hit buffer stores ids as [`HitColor`] pixels; a decoded id paired with
//! the generation it was rendered in ([`HitSample`]) resolves back through
//! the [`HitMap`] of that pass only.

mod color;
mod id;
mod map;

pub use color::HitColor;
pub use id::{Generation, HitId, HitSample, MAX_HIT_ID};
pub use map::{HitMap, HitResolution, HitSpan};
