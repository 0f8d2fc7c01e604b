use core::cmp::Ordering;

use super::LayerIndex;

/// Stable paint-order key for registered draw calls.
///
/// Ordering rules:
/// 1) `layer`: ascending (back-to-front)
/// 2) `order`: ascending (mount order for equal layers)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SortKey {
    pub layer: LayerIndex,
    /// Mount sequence number of the owning component.
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(layer: LayerIndex, order: u32) -> Self {
        Self { layer, order }
    }
}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.layer.cmp(&other.layer).then(self.order.cmp(&other.order))
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
