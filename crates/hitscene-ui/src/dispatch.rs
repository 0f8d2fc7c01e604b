use hitscene_engine::coords::Ray;
use hitscene_engine::hit::{HitResolution, HitSample};
use hitscene_engine::input::PointerEvent;
use hitscene_engine::render::SharedContext;
use hitscene_engine::scene::ComponentKey;
use slotmap::SecondaryMap;

use crate::drawable::Drawable;

/// What happened to one pointer event.
///
/// Everything except `Dispatched` is a normal miss, not an error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Exactly one handler ran.
    Dispatched { component: ComponentKey },
    /// The pointer was over no interactive geometry.
    NoHit,
    /// The sample came from an earlier render pass.
    Stale,
    /// The id was not assigned in the current pass.
    Unresolved,
    /// The owning component is not in the component table.
    NoComponent,
    /// The owning component has no handler for this event kind.
    NoHandler,
    /// The render context is gone.
    NoContext,
    /// The render context was borrowed elsewhere.
    ContextBusy,
}

impl DispatchOutcome {
    #[inline]
    pub fn is_dispatched(self) -> bool {
        matches!(self, DispatchOutcome::Dispatched { .. })
    }
}

/// Component table the dispatcher routes resolved hits through.
pub trait ComponentLookup<O, C> {
    fn drawable_mut(&mut self, key: ComponentKey) -> Option<&mut Drawable<O, C>>;
}

impl<O, C> ComponentLookup<O, C> for SecondaryMap<ComponentKey, Drawable<O, C>> {
    #[inline]
    fn drawable_mut(&mut self, key: ComponentKey) -> Option<&mut Drawable<O, C>> {
        self.get_mut(key)
    }
}

/// Decodes `sample` with a short-lived borrow of the context.
pub(crate) fn resolve<O, C>(
    context: &SharedContext<O, C>,
    sample: HitSample,
) -> Result<HitResolution<O>, DispatchOutcome> {
    let Ok(ctx) = context.try_borrow() else {
        log::warn!("render context busy; dropping pointer event for {}", sample.id);
        return Err(DispatchOutcome::ContextBusy);
    };

    match ctx.resolve_hit_id(sample) {
        Some(resolution) => Ok(resolution),
        None if sample.generation != ctx.generation() => {
            log::trace!("stale hit {} from {} (current {})", sample.id, sample.generation, ctx.generation());
            Err(DispatchOutcome::Stale)
        }
        None => Err(DispatchOutcome::Unresolved),
    }
}

/// Routes one pointer event to the handler of the drawable under the pointer.
///
/// `hit` is the id read back from the hit buffer at the pointer position,
/// tagged with the generation it was rendered in. `ray` is handed to the
/// handler untouched. At most one handler runs, and it runs with no borrow
/// of the context outstanding.
pub fn dispatch_mouse_event<O, C>(
    context: &SharedContext<O, C>,
    components: &mut impl ComponentLookup<O, C>,
    event: &PointerEvent,
    hit: Option<HitSample>,
    ray: Ray,
) -> DispatchOutcome {
    let Some(sample) = hit else {
        return DispatchOutcome::NoHit;
    };
    let resolution = match resolve(context, sample) {
        Ok(resolution) => resolution,
        Err(outcome) => return outcome,
    };
    let Some(drawable) = components.drawable_mut(resolution.component) else {
        log::trace!("hit {} resolved to unknown component {:?}", sample.id, resolution.component);
        return DispatchOutcome::NoComponent;
    };
    // Keys of different contexts collide; only the drawable that owns this
    // key in this context may receive the hit.
    if drawable.key() != Some(resolution.component) || !drawable.is_bound_to(context) {
        log::warn!(
            "component table maps {:?} to drawable `{}` of another context",
            resolution.component,
            drawable.name()
        );
        return DispatchOutcome::NoComponent;
    }

    let outcome = drawable.dispatch_resolved(event, &resolution, ray);
    log::trace!("{} on {} -> {:?}", event.kind, sample.id, outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use hitscene_engine::coords::{Vec2, Vec3};
    use hitscene_engine::hit::{Generation, HitId};
    use hitscene_engine::input::MouseEventKind;
    use hitscene_engine::render::{DrawCall, RenderContext};
    use hitscene_engine::scene::{InstanceCount, RenderCommand};

    use super::*;
    use crate::props::DrawableProps;

    type Obj = &'static str;
    type Log = Rc<RefCell<Vec<(MouseEventKind, Obj, Option<u32>, Ray)>>>;

    struct Fixture {
        ctx: SharedContext<Obj, Obj>,
        table: SecondaryMap<ComponentKey, Drawable<Obj, Obj>>,
        log: Log,
    }

    impl Fixture {
        fn new() -> Self {
            Self { ctx: RenderContext::shared(), table: SecondaryMap::new(), log: Log::default() }
        }

        fn mount(&mut self, name: &'static str, props: DrawableProps<Obj, Obj>) -> ComponentKey {
            let mut d = Drawable::new(name);
            d.mount(Some(&self.ctx), props);
            let key = d.key().unwrap();
            self.table.insert(key, d);
            key
        }

        fn recorder(&self) -> impl FnMut(&PointerEvent, &crate::handlers::MouseEventInfo<'_, Obj>) + 'static {
            let log = Rc::clone(&self.log);
            move |ev, info| log.borrow_mut().push((ev.kind, *info.object, info.instance_index, info.ray))
        }

        fn render(&self) -> Generation {
            self.ctx.borrow_mut().render(&mut |_: &DrawCall<'_, Obj, Obj>| {})
        }

        fn dispatch(&mut self, kind: MouseEventKind, hit: Option<HitSample>, ray: Ray) -> DispatchOutcome {
            let ev = PointerEvent::new(kind, Vec2::new(1.0, 1.0));
            dispatch_mouse_event(&self.ctx, &mut self.table, &ev, hit, ray)
        }
    }

    fn sample(generation: Generation, v: u32) -> Option<HitSample> {
        Some(HitSample::new(generation, HitId::new(v).unwrap()))
    }

    /// One plain drawable with a click handler on layer 0, one instanced
    /// (3 per object) drawable with a mouse-down handler on layer 1.
    fn two_drawables(f: &mut Fixture) -> (ComponentKey, ComponentKey) {
        let plain_cmd = RenderCommand::new("spheres");
        let cones_cmd = RenderCommand::new("cones");
        let on_click = f.recorder();
        let on_down = f.recorder();
        let plain = f.mount(
            "Spheres",
            DrawableProps::new(plain_cmd).objects(vec!["sphere"]).on_click(on_click),
        );
        let cones = f.mount(
            "Cones",
            DrawableProps::new(cones_cmd)
                .objects(vec!["cone"])
                .layer(1)
                .instance_count(InstanceCount::fixed(3))
                .on_mouse_down(on_down),
        );
        (plain, cones)
    }

    #[test]
    fn mouse_down_on_instance_reaches_only_its_handler() {
        let mut f = Fixture::new();
        let (plain, cones) = two_drawables(&mut f);
        let generation = f.render();

        {
            let ctx = f.ctx.borrow();
            let hits = ctx.hit_map();
            assert_eq!(hits.spans_for(plain)[0].ids().map(HitId::get).collect::<Vec<_>>(), vec![1]);
            assert_eq!(hits.spans_for(cones)[0].ids().map(HitId::get).collect::<Vec<_>>(), vec![2, 3, 4]);
        }

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let out = f.dispatch(MouseEventKind::MouseDown, sample(generation, 3), ray);

        assert_eq!(out, DispatchOutcome::Dispatched { component: cones });
        assert_eq!(*f.log.borrow(), vec![(MouseEventKind::MouseDown, "cone", Some(1), ray)]);
    }

    #[test]
    fn non_instanced_hit_has_no_instance_index() {
        let mut f = Fixture::new();
        let (plain, _) = two_drawables(&mut f);
        let generation = f.render();

        let out = f.dispatch(MouseEventKind::Click, sample(generation, 1), Ray::default());
        assert_eq!(out, DispatchOutcome::Dispatched { component: plain });
        assert_eq!(f.log.borrow()[0].2, None);
    }

    #[test]
    fn event_without_handler_is_a_miss() {
        let mut f = Fixture::new();
        two_drawables(&mut f);
        let generation = f.render();

        assert_eq!(f.dispatch(MouseEventKind::Click, sample(generation, 3), Ray::default()), DispatchOutcome::NoHandler);
        assert_eq!(f.dispatch(MouseEventKind::MouseUp, sample(generation, 1), Ray::default()), DispatchOutcome::NoHandler);
        assert!(f.log.borrow().is_empty());
    }

    #[test]
    fn no_hit_invokes_nothing() {
        let mut f = Fixture::new();
        two_drawables(&mut f);
        f.render();

        for kind in MouseEventKind::ALL {
            assert_eq!(f.dispatch(kind, None, Ray::default()), DispatchOutcome::NoHit);
        }
        assert!(f.log.borrow().is_empty());
    }

    #[test]
    fn stale_id_after_unmount_is_a_miss() {
        let mut f = Fixture::new();
        let (plain, cones) = two_drawables(&mut f);
        let old = f.render();

        if let Some(mut d) = f.table.remove(cones) {
            d.unmount();
        }
        let new = f.render();

        assert!(f.ctx.borrow().resolve_hit_id(HitSample::new(new, HitId::new(3).unwrap())).is_none());
        assert_eq!(f.dispatch(MouseEventKind::MouseDown, sample(old, 3), Ray::default()), DispatchOutcome::Stale);
        assert_eq!(f.dispatch(MouseEventKind::MouseDown, sample(new, 3), Ray::default()), DispatchOutcome::Unresolved);

        let out = f.dispatch(MouseEventKind::Click, sample(new, 1), Ray::default());
        assert_eq!(out, DispatchOutcome::Dispatched { component: plain });
        assert_eq!(f.log.borrow().len(), 1);
    }

    #[test]
    fn hit_for_component_missing_from_table() {
        let mut f = Fixture::new();
        let (plain, _) = two_drawables(&mut f);
        let generation = f.render();

        // Still registered in the context, but the host forgot it.
        let detached = f.table.remove(plain);
        let out = f.dispatch(MouseEventKind::Click, sample(generation, 1), Ray::default());
        assert_eq!(out, DispatchOutcome::NoComponent);
        drop(detached);
    }

    #[test]
    fn drawable_of_another_context_never_receives_hits() {
        let mut f = Fixture::new();
        let native = f.mount(
            "Native",
            DrawableProps::new(RenderCommand::new("points")).objects(vec!["native"]).interactive(true),
        );
        let generation = f.render();

        // Same slot in a fresh context, so the key collides with `native`.
        let other: SharedContext<Obj, Obj> = RenderContext::shared();
        let mut foreign = Drawable::new("Foreign");
        let on_click = f.recorder();
        foreign.mount(
            Some(&other),
            DrawableProps::new(RenderCommand::new("points")).objects(vec!["foreign"]).on_click(on_click),
        );
        assert_eq!(foreign.key(), Some(native));
        f.table.insert(native, foreign);

        let out = f.dispatch(MouseEventKind::Click, sample(generation, 1), Ray::default());
        assert_eq!(out, DispatchOutcome::NoComponent);
        assert!(f.log.borrow().is_empty());
    }

    #[test]
    fn table_entry_under_wrong_key_is_ignored() {
        let mut f = Fixture::new();
        let (plain, cones) = two_drawables(&mut f);
        let generation = f.render();

        // The sphere drawable ends up filed under the cones' key.
        let sphere = f.table.remove(plain).unwrap();
        let replaced = f.table.insert(cones, sphere);
        assert!(replaced.is_some());

        let out = f.dispatch(MouseEventKind::MouseDown, sample(generation, 3), Ray::default());
        assert_eq!(out, DispatchOutcome::NoComponent);
        assert!(f.log.borrow().is_empty());
    }

    #[test]
    fn busy_context_drops_event() {
        let mut f = Fixture::new();
        two_drawables(&mut f);
        let generation = f.render();

        let ctx = Rc::clone(&f.ctx);
        let _guard = ctx.borrow_mut();
        let out = f.dispatch(MouseEventKind::Click, sample(generation, 1), Ray::default());
        assert_eq!(out, DispatchOutcome::ContextBusy);
    }

    #[test]
    fn handler_may_unmount_during_dispatch() {
        let mut f = Fixture::new();
        let cmd = RenderCommand::new("points");
        let ctx = Rc::clone(&f.ctx);
        let victim = Rc::new(RefCell::new(None::<ComponentKey>));
        let target = Rc::clone(&victim);

        f.mount(
            "Points",
            DrawableProps::new(cmd).objects(vec!["p"]).on_click(move |_, _| {
                if let Some(key) = target.borrow_mut().take() {
                    ctx.borrow_mut().on_unmount(key);
                }
            }),
        );
        let key = f.table.keys().next().unwrap();
        *victim.borrow_mut() = Some(key);
        let generation = f.render();

        let out = f.dispatch(MouseEventKind::Click, sample(generation, 1), Ray::default());
        assert!(out.is_dispatched());
        assert!(!f.ctx.borrow().is_mounted(key));
    }
}
