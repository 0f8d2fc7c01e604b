use std::fmt;
use std::rc::Rc;

use super::{ComponentKey, InstanceCount, LayerIndex, RenderCommand};

/// The record one drawable component contributes to the render context.
///
/// `component` is a non-owning back-reference used to route hits to the
/// owner. `draw_props` is replaced wholesale on every update.
pub struct DrawCallEntry<O, C> {
    pub component: ComponentKey,
    pub command: RenderCommand<C>,
    pub draw_props: Rc<[O]>,
    pub layer: LayerIndex,
    /// Whether the entry takes part in hit-id allocation.
    pub interactive: bool,
    pub instance_count: Option<InstanceCount<O>>,
}

impl<O, C> DrawCallEntry<O, C> {
    /// Entries with an instance-count strategy report instance indices on hit.
    #[inline]
    pub fn is_instanced(&self) -> bool {
        self.instance_count.is_some()
    }
}

impl<O, C> Clone for DrawCallEntry<O, C> {
    fn clone(&self) -> Self {
        Self {
            component: self.component,
            command: self.command.clone(),
            draw_props: Rc::clone(&self.draw_props),
            layer: self.layer,
            interactive: self.interactive,
            instance_count: self.instance_count.clone(),
        }
    }
}

impl<O, C> fmt::Debug for DrawCallEntry<O, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawCallEntry")
            .field("component", &self.component)
            .field("command", &self.command)
            .field("objects", &self.draw_props.len())
            .field("layer", &self.layer)
            .field("interactive", &self.interactive)
            .field("instanced", &self.is_instanced())
            .finish()
    }
}
