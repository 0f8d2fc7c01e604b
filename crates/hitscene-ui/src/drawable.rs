use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hitscene_engine::coords::Ray;
use hitscene_engine::hit::{HitResolution, HitSample};
use hitscene_engine::input::PointerEvent;
use hitscene_engine::render::{PendingUnmounts, RenderContext, SharedContext};
use hitscene_engine::scene::{ComponentKey, DrawCallEntry, InstanceCount, LayerIndex, RenderCommand};

use crate::dispatch::DispatchOutcome;
use crate::handlers::{MouseEventInfo, MouseHandlers};
use crate::props::DrawableProps;

/// Lifecycle wrapper that binds one render command to the render context.
///
/// The host drives it through `mount` → `update`* → `unmount`. The drawable
/// keeps only a weak handle to the context, so it never keeps the context
/// alive and tolerates it disappearing.
pub struct Drawable<O, C> {
    name: Cow<'static, str>,
    command: Option<RenderCommand<C>>,
    context: Weak<RefCell<RenderContext<O, C>>>,
    key: Option<ComponentKey>,
    pending: Option<PendingUnmounts>,
    handlers: MouseHandlers<O>,
    command_conflicts: u32,
}

impl<O, C> Drawable<O, C> {
    /// `name` is used in diagnostics only.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            command: None,
            context: Weak::new(),
            key: None,
            pending: None,
            handlers: MouseHandlers::new(),
            command_conflicts: 0,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registry key while mounted into a live context.
    #[inline]
    pub fn key(&self) -> Option<ComponentKey> {
        self.key
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.key.is_some()
    }

    /// Whether this drawable is mounted into `context`.
    pub fn is_bound_to(&self, context: &SharedContext<O, C>) -> bool {
        self.key.is_some() && std::ptr::eq(self.context.as_ptr(), Rc::as_ptr(context))
    }

    /// Updates so far that tried to swap the render command.
    #[inline]
    pub fn command_conflicts(&self) -> u32 {
        self.command_conflicts
    }

    /// Mounts into `context` and registers the initial draw call.
    ///
    /// With no context (the drawable lives outside any rendering subtree) the
    /// props are kept but nothing is registered.
    pub fn mount(&mut self, context: Option<&SharedContext<O, C>>, props: DrawableProps<O, C>) {
        if self.key.is_some() {
            log::warn!("drawable `{}` mounted twice; treating as update", self.name);
            self.update(props);
            return;
        }

        let DrawableProps { command, draw_props, layer, interactive, instance_count, handlers } = props;
        self.command = Some(command.clone());
        self.handlers = handlers;

        let Some(context) = context else {
            return;
        };
        let (key, pending) = match context.try_borrow_mut() {
            Ok(mut ctx) => (ctx.on_mount(command), ctx.pending_unmounts()),
            Err(_) => {
                log::warn!("drawable `{}`: render context busy, mount skipped", self.name);
                return;
            }
        };
        self.context = Rc::downgrade(context);
        self.key = Some(key);
        self.pending = Some(pending);

        self.sync(draw_props, layer, interactive, instance_count);
    }

    /// Applies the latest props.
    ///
    /// The render command cannot change after mount: a different command is
    /// reported in debug builds and ignored either way.
    pub fn update(&mut self, props: DrawableProps<O, C>) {
        let DrawableProps { command, draw_props, layer, interactive, instance_count, handlers } = props;

        match &self.command {
            Some(mounted) if !mounted.same(&command) => {
                self.command_conflicts += 1;
                if cfg!(debug_assertions) {
                    log::error!(
                        "changing the render command of drawable `{}` is not supported; keeping the original",
                        self.name
                    );
                }
            }
            Some(_) => {}
            None => self.command = Some(command),
        }

        self.handlers = handlers;
        self.sync(draw_props, layer, interactive, instance_count);
    }

    /// Deregisters from the context. Safe to call repeatedly, and after the
    /// context is gone.
    ///
    /// While the context is borrowed (e.g. the drawable is dropped inside a
    /// render pass) the removal is queued and applied by the context before
    /// its next mutation or draw.
    pub fn unmount(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };
        let pending = self.pending.take();
        if let Some(context) = self.context.upgrade() {
            match context.try_borrow_mut() {
                Ok(mut ctx) => ctx.on_unmount(key),
                Err(_) => match pending {
                    Some(pending) => {
                        log::debug!("drawable `{}`: render context busy, unmount deferred", self.name);
                        pending.push(key);
                    }
                    None => log::warn!("drawable `{}`: render context busy, unmount dropped", self.name),
                },
            }
        }
        self.context = Weak::new();
    }

    fn sync(
        &mut self,
        draw_props: Option<Rc<[O]>>,
        layer: LayerIndex,
        interactive: bool,
        instance_count: Option<InstanceCount<O>>,
    ) {
        let Some(draw_props) = draw_props else {
            return;
        };
        let (Some(key), Some(command)) = (self.key, self.command.clone()) else {
            return;
        };
        let Some(context) = self.context.upgrade() else {
            return;
        };

        let interactive = interactive || instance_count.is_some() || self.handlers.any();
        let entry = DrawCallEntry {
            component: key,
            command,
            draw_props,
            layer,
            interactive,
            instance_count,
        };

        match context.try_borrow_mut() {
            Ok(mut ctx) => ctx.register_draw_call(entry),
            Err(_) => log::warn!("drawable `{}`: render context busy, update dropped", self.name),
        };
    }

    /// Resolves `hit` against this drawable's own context and invokes the
    /// matching handler if the hit belongs to this drawable.
    pub fn handle_mouse_event(&mut self, event: &PointerEvent, hit: Option<HitSample>, ray: Ray) -> DispatchOutcome {
        let Some(sample) = hit else {
            return DispatchOutcome::NoHit;
        };
        let Some(context) = self.context.upgrade() else {
            return DispatchOutcome::NoContext;
        };
        let resolution = match crate::dispatch::resolve(&context, sample) {
            Ok(resolution) => resolution,
            Err(outcome) => return outcome,
        };
        if Some(resolution.component) != self.key {
            return DispatchOutcome::NoComponent;
        }
        self.dispatch_resolved(event, &resolution, ray)
    }

    /// Invokes the handler for `event.kind` with an already resolved hit.
    ///
    /// No context borrow is held while the handler runs.
    pub fn dispatch_resolved(
        &mut self,
        event: &PointerEvent,
        resolution: &HitResolution<O>,
        ray: Ray,
    ) -> DispatchOutcome {
        let Some(handler) = self.handlers.get_mut(event.kind) else {
            return DispatchOutcome::NoHandler;
        };

        let info = MouseEventInfo {
            ray,
            object: resolution.object(),
            object_index: resolution.object_index,
            instance_index: resolution.instance_index,
        };
        handler(event, &info);

        DispatchOutcome::Dispatched { component: resolution.component }
    }
}

impl<O, C> Drop for Drawable<O, C> {
    fn drop(&mut self) {
        self.unmount();
    }
}
