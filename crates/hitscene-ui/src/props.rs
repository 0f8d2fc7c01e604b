use std::rc::Rc;

use hitscene_engine::input::{MouseEventKind, PointerEvent};
use hitscene_engine::scene::{InstanceCount, LayerIndex, RenderCommand};

use crate::handlers::{MouseEventInfo, MouseHandlers};

/// Props of a drawable component for one mount or update.
///
/// # Example
/// ```rust,ignore
/// DrawableProps::new(command)
///     .objects(vec![cone_a, cone_b])
///     .layer(1)
///     .on_mouse_down(|_ev, info| println!("hit instance {:?}", info.instance_index))
/// ```
pub struct DrawableProps<O, C> {
    /// Must stay the same command for the lifetime of a mounted component.
    pub command: RenderCommand<C>,
    /// `None` means "no data yet" and leaves the registered draw call untouched;
    /// an empty slice replaces it with nothing to draw.
    pub draw_props: Option<Rc<[O]>>,
    pub layer: LayerIndex,
    /// Forces hit-testing even without handlers.
    pub interactive: bool,
    pub instance_count: Option<InstanceCount<O>>,
    pub handlers: MouseHandlers<O>,
}

impl<O, C> DrawableProps<O, C> {
    pub fn new(command: RenderCommand<C>) -> Self {
        Self {
            command,
            draw_props: None,
            layer: LayerIndex::default(),
            interactive: false,
            instance_count: None,
            handlers: MouseHandlers::new(),
        }
    }

    pub fn objects(mut self, objects: impl Into<Rc<[O]>>) -> Self {
        self.draw_props = Some(objects.into());
        self
    }

    pub fn layer(mut self, layer: impl Into<LayerIndex>) -> Self {
        self.layer = layer.into();
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Marks the draw call as instanced with the given counting strategy.
    pub fn instance_count(mut self, strategy: InstanceCount<O>) -> Self {
        self.instance_count = Some(strategy);
        self
    }

    /// Handler for `kind`.
    pub fn on(
        mut self,
        kind: MouseEventKind,
        f: impl FnMut(&PointerEvent, &MouseEventInfo<'_, O>) + 'static,
    ) -> Self {
        self.handlers.set(kind, f);
        self
    }

    pub fn on_click(self, f: impl FnMut(&PointerEvent, &MouseEventInfo<'_, O>) + 'static) -> Self {
        self.on(MouseEventKind::Click, f)
    }

    pub fn on_double_click(self, f: impl FnMut(&PointerEvent, &MouseEventInfo<'_, O>) + 'static) -> Self {
        self.on(MouseEventKind::DoubleClick, f)
    }

    pub fn on_mouse_down(self, f: impl FnMut(&PointerEvent, &MouseEventInfo<'_, O>) + 'static) -> Self {
        self.on(MouseEventKind::MouseDown, f)
    }

    pub fn on_mouse_up(self, f: impl FnMut(&PointerEvent, &MouseEventInfo<'_, O>) + 'static) -> Self {
        self.on(MouseEventKind::MouseUp, f)
    }

    pub fn on_mouse_move(self, f: impl FnMut(&PointerEvent, &MouseEventInfo<'_, O>) + 'static) -> Self {
        self.on(MouseEventKind::MouseMove, f)
    }

    /// Whether the draw call takes part in hit testing.
    ///
    /// True when forced, when instanced, or when any supported mouse event
    /// has a handler.
    pub fn is_interactive(&self) -> bool {
        self.interactive || self.instance_count.is_some() || self.handlers.any()
    }
}
