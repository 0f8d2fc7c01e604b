use bytemuck::{Pod, Zeroable};

use super::{HitId, MAX_HIT_ID};

/// RGBA8 hit-buffer pixel encoding one hit id.
///
/// The id is stored big-endian in RGB with alpha 255. The all-zero pixel is
/// the cleared background and decodes to no hit.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Pod, Zeroable)]
pub struct HitColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HitColor {
    /// Cleared hit-buffer value.
    pub const BACKGROUND: HitColor = HitColor { r: 0, g: 0, b: 0, a: 0 };

    /// Encodes `id`. Returns `None` past [`MAX_HIT_ID`].
    pub fn from_hit_id(id: HitId) -> Option<Self> {
        let v = id.get();
        if v > MAX_HIT_ID {
            return None;
        }
        Some(Self {
            r: (v >> 16) as u8,
            g: (v >> 8) as u8,
            b: v as u8,
            a: u8::MAX,
        })
    }

    pub fn to_hit_id(self) -> Option<HitId> {
        if self.a == 0 {
            return None;
        }
        HitId::new(u32::from(self.r) << 16 | u32::from(self.g) << 8 | u32::from(self.b))
    }

    /// Decodes the first pixel of a tightly packed RGBA8 readback.
    pub fn decode_readback(bytes: &[u8]) -> Option<HitId> {
        let pixel = bytes.get(..size_of::<HitColor>())?;
        bytemuck::try_from_bytes::<HitColor>(pixel).ok()?.to_hit_id()
    }

    /// Decodes pixel `(x, y)` of an RGBA8 readback whose rows are `bytes_per_row` apart.
    ///
    /// `bytes_per_row` may include row padding (GPU copy alignment).
    pub fn decode_pixel(bytes: &[u8], bytes_per_row: usize, x: usize, y: usize) -> Option<HitId> {
        let row_start = y.checked_mul(bytes_per_row)?;
        let row = bytes.get(row_start..row_start.checked_add(bytes_per_row)?)?;
        let usable = row.len() - row.len() % size_of::<HitColor>();
        let pixels: &[HitColor] = bytemuck::try_cast_slice(&row[..usable]).ok()?;
        pixels.get(x)?.to_hit_id()
    }
}
