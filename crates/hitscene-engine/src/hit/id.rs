use std::fmt;
use std::num::NonZeroU32;

/// Largest id the 24-bit RGB hit-buffer encoding can carry.
pub const MAX_HIT_ID: u32 = 0x00FF_FFFF;

/// Identifies one rendered instance for pointer picking.
///
/// Ids start at 1; 0 is reserved for "no geometry" in the hit buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HitId(NonZeroU32);

impl HitId {
    /// Returns `None` for 0.
    #[inline]
    pub const fn new(v: u32) -> Option<Self> {
        match NonZeroU32::new(v) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for HitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Render pass counter. Hit ids are only meaningful within the pass that assigned them.
///
/// `Generation::default()` precedes the first render; no ids belong to it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen {}", self.0)
    }
}

/// A hit id as read back from the hit buffer of one specific render pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct HitSample {
    pub generation: Generation,
    pub id: HitId,
}

impl HitSample {
    #[inline]
    pub const fn new(generation: Generation, id: HitId) -> Self {
        Self { generation, id }
    }
}
