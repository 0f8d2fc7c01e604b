use std::cell::RefCell;
use std::rc::Rc;

use crate::hit::{Generation, HitMap, HitResolution, HitSample};
use crate::scene::{ComponentKey, DrawCallEntry, DrawRegistry, RenderCommand};

use super::{DrawCall, DrawExecutor};

/// Handle through which drawable components reach the render context.
///
/// Everything runs on one thread; components keep a `Weak` of this.
pub type SharedContext<O, C> = Rc<RefCell<RenderContext<O, C>>>;

/// Unmounts requested while the context itself was borrowed.
///
/// Lives outside the context's `RefCell`, so a component dropped in the
/// middle of a render pass can still queue its removal. The context drains
/// the queue before mutating or drawing anything.
#[derive(Clone, Default)]
pub struct PendingUnmounts {
    keys: Rc<RefCell<Vec<ComponentKey>>>,
}

impl PendingUnmounts {
    pub fn push(&self, key: ComponentKey) {
        self.keys.borrow_mut().push(key);
    }

    #[inline]
    pub fn contains(&self, key: ComponentKey) -> bool {
        self.keys.borrow().contains(&key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.borrow().is_empty()
    }

    fn take(&self) -> Vec<ComponentKey> {
        std::mem::take(&mut *self.keys.borrow_mut())
    }
}

impl std::fmt::Debug for PendingUnmounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.keys.borrow().iter()).finish()
    }
}

/// Shared rendering context: draw-call registry plus the hit map of the latest pass.
///
/// Lifecycle contract for components:
/// - [`on_mount`] once, before anything else
/// - [`register_draw_call`] whenever props change
/// - [`on_unmount`] once at the end, or a push onto [`pending_unmounts`]
///   when the context is borrowed at that moment
///
/// [`on_mount`]: RenderContext::on_mount
/// [`register_draw_call`]: RenderContext::register_draw_call
/// [`on_unmount`]: RenderContext::on_unmount
/// [`pending_unmounts`]: RenderContext::pending_unmounts
pub struct RenderContext<O, C> {
    registry: DrawRegistry<O, C>,
    hit_map: HitMap<O>,
    pending: PendingUnmounts,
}

impl<O, C> RenderContext<O, C> {
    pub fn new() -> Self {
        Self {
            registry: DrawRegistry::new(),
            hit_map: HitMap::empty(Generation::default()),
            pending: PendingUnmounts::default(),
        }
    }

    /// Wraps a new context in a [`SharedContext`].
    pub fn shared() -> SharedContext<O, C> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Registers a mounting component; its command identity is fixed from here on.
    pub fn on_mount(&mut self, command: RenderCommand<C>) -> ComponentKey {
        self.flush_pending_unmounts();
        let key = self.registry.mount(command);
        log::debug!("component {:?} mounted", key);
        key
    }

    /// Drops the component and its draw call. Unknown keys are ignored.
    pub fn on_unmount(&mut self, key: ComponentKey) {
        self.flush_pending_unmounts();
        if self.registry.unmount(key) {
            log::debug!("component {:?} unmounted", key);
        }
    }

    /// Installs or replaces the draw call of `entry.component`.
    pub fn register_draw_call(&mut self, entry: DrawCallEntry<O, C>) {
        self.flush_pending_unmounts();
        let key = entry.component;
        if !self.registry.register(entry) {
            log::debug!("draw call for unmounted component {:?} ignored", key);
        }
    }

    /// Decodes a hit sample against the latest pass. Stale samples resolve to `None`.
    pub fn resolve_hit_id(&self, sample: HitSample) -> Option<HitResolution<O>> {
        self.hit_map.resolve(sample)
    }

    /// Runs one render pass.
    ///
    /// Reassigns every hit id in paint order, then hands each draw call to
    /// `executor` back-to-front. Samples of earlier passes stop resolving.
    pub fn render(&mut self, executor: &mut impl DrawExecutor<O, C>) -> Generation {
        self.flush_pending_unmounts();
        let generation = self.hit_map.generation().next();
        self.hit_map = HitMap::assign(generation, self.registry.iter_in_paint_order());

        for entry in self.registry.iter_in_paint_order() {
            executor.draw(&DrawCall {
                component: entry.component,
                command: &entry.command,
                objects: &entry.draw_props,
                layer: entry.layer,
                hit_spans: self.hit_map.spans_for(entry.component),
            });
        }

        // Components dropped by the executor leave now rather than next frame.
        self.flush_pending_unmounts();
        generation
    }

    /// Handle for queueing unmounts without borrowing the context.
    #[inline]
    pub fn pending_unmounts(&self) -> PendingUnmounts {
        self.pending.clone()
    }

    /// Applies every queued unmount.
    pub fn flush_pending_unmounts(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        for key in self.pending.take() {
            if self.registry.unmount(key) {
                log::debug!("component {:?} unmounted (deferred)", key);
            }
        }
    }

    /// Generation of the latest pass; `Generation::default()` before the first.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.hit_map.generation()
    }

    #[inline]
    pub fn hit_map(&self) -> &HitMap<O> {
        &self.hit_map
    }

    #[inline]
    pub fn registry(&self) -> &DrawRegistry<O, C> {
        &self.registry
    }

    #[inline]
    pub fn is_mounted(&self, key: ComponentKey) -> bool {
        self.registry.contains(key) && !self.pending.contains(key)
    }
}

impl<O, C> Default for RenderContext<O, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::HitId;
    use crate::scene::{InstanceCount, LayerIndex};

    type Ctx = RenderContext<&'static str, &'static str>;

    fn register(
        ctx: &mut Ctx,
        key: ComponentKey,
        objects: Vec<&'static str>,
        layer: i32,
        instance_count: Option<InstanceCount<&'static str>>,
    ) {
        let command = ctx.registry().command(key).cloned().unwrap();
        ctx.register_draw_call(DrawCallEntry {
            component: key,
            command,
            draw_props: objects.into(),
            layer: LayerIndex(layer),
            interactive: true,
            instance_count,
        });
    }

    fn noop(_: &DrawCall<'_, &'static str, &'static str>) {}

    fn sample(generation: Generation, v: u32) -> HitSample {
        HitSample::new(generation, HitId::new(v).unwrap())
    }

    #[test]
    fn render_hands_calls_back_to_front() {
        let mut ctx = Ctx::new();
        let top = ctx.on_mount(RenderCommand::new("top"));
        let bottom = ctx.on_mount(RenderCommand::new("bottom"));
        register(&mut ctx, top, vec!["t"], 3, None);
        register(&mut ctx, bottom, vec!["b"], -1, None);

        let mut seen = Vec::new();
        ctx.render(&mut |call: &DrawCall<'_, &'static str, &'static str>| {
            seen.push((**call.command, call.hit_spans.len()));
        });
        assert_eq!(seen, vec![("bottom", 1), ("top", 1)]);
    }

    #[test]
    fn each_render_advances_generation() {
        let mut ctx = Ctx::new();
        assert_eq!(ctx.generation(), Generation::default());
        let g1 = ctx.render(&mut noop);
        let g2 = ctx.render(&mut noop);
        assert!(g1 < g2);
        assert_eq!(ctx.generation(), g2);
    }

    #[test]
    fn resolve_before_first_render_is_none() {
        let mut ctx = Ctx::new();
        let key = ctx.on_mount(RenderCommand::new("points"));
        register(&mut ctx, key, vec!["p"], 0, None);
        assert!(ctx.resolve_hit_id(sample(Generation::default(), 1)).is_none());
    }

    #[test]
    fn unmount_then_rerender_reassigns_from_one() {
        let mut ctx = Ctx::new();
        let plain = ctx.on_mount(RenderCommand::new("plain"));
        let cones = ctx.on_mount(RenderCommand::new("cones"));
        register(&mut ctx, plain, vec!["sphere"], 0, None);
        register(&mut ctx, cones, vec!["cone"], 1, Some(InstanceCount::fixed(3)));

        let g1 = ctx.render(&mut noop);
        let hit = ctx.resolve_hit_id(sample(g1, 3)).unwrap();
        assert_eq!(hit.component, cones);
        assert_eq!(hit.instance_index, Some(1));

        ctx.on_unmount(cones);
        let g2 = ctx.render(&mut noop);

        assert!(ctx.resolve_hit_id(sample(g1, 3)).is_none());
        assert!(ctx.resolve_hit_id(sample(g2, 3)).is_none());
        let remaining = ctx.resolve_hit_id(sample(g2, 1)).unwrap();
        assert_eq!(remaining.component, plain);
        assert_eq!(*remaining.object(), "sphere");
    }

    #[test]
    fn resolution_keeps_data_of_its_pass() {
        let mut ctx = Ctx::new();
        let key = ctx.on_mount(RenderCommand::new("points"));
        register(&mut ctx, key, vec!["old"], 0, None);
        let g1 = ctx.render(&mut noop);

        // Props change after the pass but before the hit is resolved.
        register(&mut ctx, key, vec!["new"], 0, None);
        let hit = ctx.resolve_hit_id(sample(g1, 1)).unwrap();
        assert_eq!(*hit.object(), "old");
    }

    #[test]
    fn unmount_queued_during_render_is_applied() {
        let mut ctx = Ctx::new();
        let doomed = ctx.on_mount(RenderCommand::new("doomed"));
        let kept = ctx.on_mount(RenderCommand::new("kept"));
        register(&mut ctx, doomed, vec!["d"], 0, None);
        register(&mut ctx, kept, vec!["k"], 0, None);

        let pending = ctx.pending_unmounts();
        ctx.render(&mut |call: &DrawCall<'_, &'static str, &'static str>| {
            if call.component == doomed {
                pending.push(doomed);
            }
        });
        assert!(!ctx.is_mounted(doomed));
        assert_eq!(ctx.registry().len(), 1);

        let mut drawn = Vec::new();
        ctx.render(&mut |call: &DrawCall<'_, &'static str, &'static str>| drawn.push(**call.command));
        assert_eq!(drawn, vec!["kept"]);
    }

    #[test]
    fn queued_unmount_hides_component_before_flush() {
        let mut ctx = Ctx::new();
        let key = ctx.on_mount(RenderCommand::new("points"));
        ctx.pending_unmounts().push(key);
        assert!(!ctx.is_mounted(key));

        ctx.flush_pending_unmounts();
        assert!(ctx.pending_unmounts().is_empty());
        assert_eq!(ctx.registry().len(), 0);
    }
}
