use crate::hit::HitSpan;
use crate::scene::{ComponentKey, LayerIndex, RenderCommand};

/// One draw call handed to the GPU layer during a render pass.
pub struct DrawCall<'a, O, C> {
    pub component: ComponentKey,
    pub command: &'a RenderCommand<C>,
    pub objects: &'a [O],
    pub layer: LayerIndex,
    /// Hit ids to encode into the hit buffer, one span per object.
    /// Empty for non-interactive draw calls.
    pub hit_spans: &'a [HitSpan],
}

impl<O, C> DrawCall<'_, O, C> {
    #[inline]
    pub fn is_interactive(&self) -> bool {
        !self.hit_spans.is_empty()
    }
}

/// GPU-side consumer of a render pass.
///
/// Receives draw calls back-to-front. Implementations execute `command` for
/// `objects` on the color target and, for interactive calls, draw the same
/// geometry into the hit buffer using [`HitColor`](crate::hit::HitColor)
/// per instance.
pub trait DrawExecutor<O, C> {
    fn draw(&mut self, call: &DrawCall<'_, O, C>);
}

impl<O, C, F> DrawExecutor<O, C> for F
where
    F: FnMut(&DrawCall<'_, O, C>),
{
    #[inline]
    fn draw(&mut self, call: &DrawCall<'_, O, C>) {
        self(call)
    }
}
