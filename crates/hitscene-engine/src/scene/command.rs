use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Shared, read-only handle to a GPU draw operation.
///
/// Two handles are the same command only if they point at the same
/// allocation; structural equality of `C` is irrelevant. Cloning is cheap.
pub struct RenderCommand<C> {
    inner: Rc<C>,
}

impl<C> RenderCommand<C> {
    pub fn new(command: C) -> Self {
        Self { inner: Rc::new(command) }
    }

    /// Identity comparison.
    #[inline]
    pub fn same(&self, other: &RenderCommand<C>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<C> Clone for RenderCommand<C> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<C> Deref for RenderCommand<C> {
    type Target = C;

    #[inline]
    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C> From<Rc<C>> for RenderCommand<C> {
    fn from(inner: Rc<C>) -> Self {
        Self { inner }
    }
}

impl<C> fmt::Debug for RenderCommand<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RenderCommand({:p})", Rc::as_ptr(&self.inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_identity() {
        let a = RenderCommand::new("cones");
        let b = a.clone();
        assert!(a.same(&b));
    }

    #[test]
    fn equal_payloads_are_distinct_commands() {
        let a = RenderCommand::new("cones");
        let b = RenderCommand::new("cones");
        assert!(!a.same(&b));
        assert_eq!(*a, *b);
    }
}
