use hitscene_engine::coords::Ray;
use hitscene_engine::hit::{Generation, HitSample};
use hitscene_engine::input::PointerEvent;
use hitscene_engine::render::{DrawExecutor, RenderContext, SharedContext};
use hitscene_engine::scene::ComponentKey;
use slotmap::SecondaryMap;

use crate::dispatch::{dispatch_mouse_event, ComponentLookup, DispatchOutcome};
use crate::drawable::Drawable;
use crate::props::DrawableProps;

/// Host that owns a render context together with every drawable mounted into it.
///
/// Pointer events routed through [`dispatch`](Stage::dispatch) reach the
/// drawable that owns the hit id under the pointer.
///
/// # Example
///
/// ```rust,ignore
/// let mut stage = Stage::new();
/// let cones = stage.mount(kind.create(), kind.props(cone_data).on_mouse_down(on_cone)).unwrap();
///
/// // Per frame:
/// let generation = stage.render(&mut gpu).unwrap();
/// let hit = read_hit_id(cursor).map(|id| HitSample::new(generation, id));
/// stage.dispatch(&event, hit, camera.ray_at(cursor));
/// ```
pub struct Stage<O, C> {
    // Dropped first, so drawables deregister from a live context.
    drawables: SecondaryMap<ComponentKey, Drawable<O, C>>,
    context: SharedContext<O, C>,
}

impl<O, C> Stage<O, C> {
    pub fn new() -> Self {
        Self { drawables: SecondaryMap::new(), context: RenderContext::shared() }
    }

    /// The shared context, e.g. for drawables mounted outside the stage.
    #[inline]
    pub fn context(&self) -> &SharedContext<O, C> {
        &self.context
    }

    /// Mounts `drawable` and takes ownership of it.
    ///
    /// Returns `None` when the context could not accept the mount, or when
    /// `drawable` is already mounted (here or into another context). The
    /// drawable is dropped in that case, which unmounts it from wherever it was.
    pub fn mount(&mut self, mut drawable: Drawable<O, C>, props: DrawableProps<O, C>) -> Option<ComponentKey> {
        if drawable.is_mounted() {
            log::warn!("drawable `{}` is already mounted; refusing to adopt it", drawable.name());
            return None;
        }
        drawable.mount(Some(&self.context), props);
        let key = drawable.key()?;
        self.drawables.insert(key, drawable);
        Some(key)
    }

    /// Applies new props to a mounted drawable. `false` for unknown keys.
    pub fn update(&mut self, key: ComponentKey, props: DrawableProps<O, C>) -> bool {
        match self.drawables.get_mut(key) {
            Some(drawable) => {
                drawable.update(props);
                true
            }
            None => false,
        }
    }

    /// Unmounts and hands back the drawable.
    pub fn unmount(&mut self, key: ComponentKey) -> Option<Drawable<O, C>> {
        let mut drawable = self.drawables.remove(key)?;
        drawable.unmount();
        Some(drawable)
    }

    #[inline]
    pub fn get(&self, key: ComponentKey) -> Option<&Drawable<O, C>> {
        self.drawables.get(key)
    }

    /// Runs one render pass. `None` if the context is borrowed elsewhere.
    pub fn render(&mut self, executor: &mut impl DrawExecutor<O, C>) -> Option<Generation> {
        match self.context.try_borrow_mut() {
            Ok(mut ctx) => Some(ctx.render(executor)),
            Err(_) => {
                log::warn!("render context busy; frame skipped");
                None
            }
        }
    }

    /// Routes a pointer event to the drawable under the pointer.
    pub fn dispatch(&mut self, event: &PointerEvent, hit: Option<HitSample>, ray: Ray) -> DispatchOutcome {
        dispatch_mouse_event(&self.context, &mut self.drawables, event, hit, ray)
    }

    /// Like [`dispatch`](Stage::dispatch) for several candidate samples, e.g.
    /// a small pick radius around the pointer. The front-most sample of the
    /// current pass wins; samples that do not resolve in it are ignored.
    pub fn dispatch_any(
        &mut self,
        event: &PointerEvent,
        samples: impl IntoIterator<Item = HitSample>,
        ray: Ray,
    ) -> DispatchOutcome {
        let hit = match self.context.try_borrow() {
            Ok(ctx) => ctx.hit_map().topmost(samples),
            Err(_) => {
                log::warn!("render context busy; dropping pointer event");
                return DispatchOutcome::ContextBusy;
            }
        };
        self.dispatch(event, hit, ray)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }
}

impl<O, C> Default for Stage<O, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O, C> ComponentLookup<O, C> for Stage<O, C> {
    #[inline]
    fn drawable_mut(&mut self, key: ComponentKey) -> Option<&mut Drawable<O, C>> {
        self.drawables.get_mut(key)
    }
}
