//! hitscene UI: drawable components and pointer picking on top of `hitscene-engine`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use hitscene_ui::prelude::*;
//!
//! let cones = shapes::cones(cone_pipeline);
//! let mut stage = Stage::new();
//!
//! stage.mount(
//!     cones.create(),
//!     cones
//!         .props(vec![BaseShape::at([0.0, 0.0, 1.0])])
//!         .layer(1)
//!         .on_mouse_down(|_ev, info| log::info!("cone instance {:?}", info.instance_index)),
//! );
//!
//! // In your frame callback:
//! let generation = stage.render(&mut gpu).unwrap();
//! // After reading back the hit buffer under the cursor:
//! let hit = HitColor::decode_readback(&pixel).map(|id| HitSample::new(generation, id));
//! stage.dispatch(&event, hit, ray);
//! ```
//!
//! # Hosting drawables yourself
//!
//! [`Stage`] is optional. Any component table implementing
//! [`ComponentLookup`] can be passed to [`dispatch_mouse_event`], and a bare
//! [`Drawable`] can resolve hits against its own context with
//! [`Drawable::handle_mouse_event`].

pub mod dispatch;
pub mod drawable;
pub mod handlers;
pub mod kind;
pub mod props;
pub mod shapes;
pub mod stage;

pub use dispatch::{dispatch_mouse_event, ComponentLookup, DispatchOutcome};
pub use drawable::Drawable;
pub use stage::Stage;

/// Everything needed to declare drawables and route pointer events to them.
pub mod prelude {
    pub use crate::dispatch::{dispatch_mouse_event, ComponentLookup, DispatchOutcome};
    pub use crate::drawable::Drawable;
    pub use crate::handlers::{MouseEventInfo, MouseHandler, MouseHandlers};
    pub use crate::kind::{make_drawable, DrawableKind, DrawableOptions};
    pub use crate::props::DrawableProps;
    pub use crate::shapes::{self, BaseShape, Marker};
    pub use crate::stage::Stage;

    // Re-export the engine primitives everyone needs.
    pub use hitscene_engine::coords::{Ray, Vec2, Vec3};
    pub use hitscene_engine::hit::{Generation, HitColor, HitId, HitSample};
    pub use hitscene_engine::input::{MouseButton, MouseEventKind, PointerEvent};
    pub use hitscene_engine::render::{DrawCall, DrawExecutor, RenderContext, SharedContext};
    pub use hitscene_engine::scene::{ComponentKey, InstanceCount, LayerIndex, RenderCommand};
}
