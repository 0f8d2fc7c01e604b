/// Paint and hit-test precedence of a draw call.
///
/// Higher values draw later and therefore end up on top. Defaults to 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct LayerIndex(pub i32);

impl LayerIndex {
    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}

impl From<i32> for LayerIndex {
    #[inline]
    fn from(v: i32) -> Self {
        Self(v)
    }
}
