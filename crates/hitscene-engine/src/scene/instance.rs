use std::fmt;
use std::rc::Rc;

/// Strategy mapping one drawable object to the number of GPU instances it expands to.
///
/// Supplying one marks the owning draw call as instanced: hit resolution then
/// reports an instance index for it, even when the count is 1.
pub struct InstanceCount<O> {
    f: Rc<dyn Fn(&O) -> u32>,
}

impl<O> InstanceCount<O> {
    pub fn from_fn(f: impl Fn(&O) -> u32 + 'static) -> Self {
        Self { f: Rc::new(f) }
    }

    /// Constant count for every object.
    pub fn fixed(count: u32) -> Self {
        Self::from_fn(move |_| count)
    }

    /// Raw count as returned by the strategy, before clamping.
    #[inline]
    pub fn count(&self, object: &O) -> u32 {
        (self.f)(object)
    }
}

impl<O> Clone for InstanceCount<O> {
    fn clone(&self) -> Self {
        Self { f: Rc::clone(&self.f) }
    }
}

impl<O> fmt::Debug for InstanceCount<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InstanceCount(..)")
    }
}

/// Number of hit ids `object` needs.
///
/// Without a strategy every object is a single instance. A strategy result
/// of 0 is raised to 1 so the object stays addressable. Nothing is inferred
/// from the shape of the object itself.
#[inline]
pub fn resolve_instance_count<O>(object: &O, strategy: Option<&InstanceCount<O>>) -> u32 {
    strategy.map_or(1, |s| s.count(object).max(1))
}
