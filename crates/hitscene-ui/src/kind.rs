use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use hitscene_engine::scene::{InstanceCount, RenderCommand};

use crate::drawable::Drawable;
use crate::props::DrawableProps;

/// Defaults shared by every drawable a [`DrawableKind`] produces.
pub struct DrawableOptions<O> {
    pub instance_count: Option<InstanceCount<O>>,
}

impl<O> DrawableOptions<O> {
    pub fn instanced(strategy: InstanceCount<O>) -> Self {
        Self { instance_count: Some(strategy) }
    }
}

impl<O> Default for DrawableOptions<O> {
    fn default() -> Self {
        Self { instance_count: None }
    }
}

impl<O> Clone for DrawableOptions<O> {
    fn clone(&self) -> Self {
        Self { instance_count: self.instance_count.clone() }
    }
}

/// A named drawable type bound to one render command.
///
/// Every component made from a kind shares its command, so the command
/// identity stays fixed across updates by construction.
pub struct DrawableKind<O, C> {
    name: Cow<'static, str>,
    command: RenderCommand<C>,
    options: DrawableOptions<O>,
}

/// Builds a drawable kind, e.g. `make_drawable("Cones", cones_cmd, DrawableOptions::default())`.
pub fn make_drawable<O, C>(
    name: impl Into<Cow<'static, str>>,
    command: impl Into<RenderCommand<C>>,
    options: DrawableOptions<O>,
) -> DrawableKind<O, C> {
    DrawableKind { name: name.into(), command: command.into(), options }
}

impl<O, C> DrawableKind<O, C> {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn command(&self) -> &RenderCommand<C> {
        &self.command
    }

    #[inline]
    pub fn options(&self) -> &DrawableOptions<O> {
        &self.options
    }

    /// Props carrying `children` as draw data, preloaded with the kind's
    /// command and option defaults. Builder calls on the result override them.
    pub fn props(&self, children: impl Into<Rc<[O]>>) -> DrawableProps<O, C> {
        self.empty_props().objects(children)
    }

    /// Like [`props`](Self::props) but without draw data yet.
    pub fn empty_props(&self) -> DrawableProps<O, C> {
        let mut props = DrawableProps::new(self.command.clone());
        props.instance_count = self.options.instance_count.clone();
        props
    }

    /// A fresh, unmounted component of this kind.
    pub fn create(&self) -> Drawable<O, C> {
        Drawable::new(self.name.clone())
    }
}

impl<O, C> fmt::Debug for DrawableKind<O, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawableKind")
            .field("name", &self.name)
            .field("instanced", &self.options.instance_count.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use hitscene_engine::render::{DrawCall, RenderContext};

    use super::*;

    type Obj = (&'static str, u32);

    fn cones() -> DrawableKind<Obj, &'static str> {
        make_drawable(
            "Cones",
            RenderCommand::new("cones"),
            DrawableOptions::instanced(InstanceCount::from_fn(|o: &Obj| o.1)),
        )
    }

    #[test]
    fn props_are_preloaded_from_kind() {
        let kind = cones();
        let props = kind.props(vec![("a", 3)]);
        assert!(props.command.same(kind.command()));
        assert_eq!(props.instance_count.as_ref().map(|s| s.count(&("x", 5))), Some(5));
        assert_eq!(props.draw_props.as_deref(), Some(&[("a", 3)][..]));
    }

    #[test]
    fn per_props_strategy_overrides_kind_default() {
        let props = cones().props(vec![("a", 3)]).instance_count(InstanceCount::fixed(2));
        assert_eq!(props.instance_count.map(|s| s.count(&("a", 3))), Some(2));
    }

    #[test]
    fn plain_kind_is_not_instanced() {
        let kind: DrawableKind<Obj, &'static str> =
            make_drawable("Points", Rc::new("points"), DrawableOptions::default());
        assert!(kind.empty_props().instance_count.is_none());
        assert!(kind.empty_props().draw_props.is_none());
    }

    #[test]
    fn created_drawables_mount_with_kind_command() {
        let kind = cones();
        let ctx = RenderContext::shared();
        let mut a = kind.create();
        let mut b = kind.create();
        assert_eq!(a.name(), "Cones");

        a.mount(Some(&ctx), kind.props(vec![("a", 2)]));
        b.mount(Some(&ctx), kind.props(vec![("b", 1)]));

        let mut ids = 0;
        ctx.borrow_mut().render(&mut |call: &DrawCall<'_, Obj, &'static str>| {
            assert!(call.command.same(kind.command()));
            ids += call.hit_spans.iter().map(|s| s.count).sum::<u32>();
        });
        assert_eq!(ids, 3);
    }
}
