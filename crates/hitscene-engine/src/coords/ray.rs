/// 3D vector in scene space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }
}

impl From<[f32; 3]> for Vec3 {
    #[inline]
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Scene-space ray under the pointer.
///
/// Computed by the camera layer from the pointer position; the hit-testing
/// layer never inspects it and only hands it to mouse handlers.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    #[inline]
    pub const fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// Point reached after travelling `t` units along the ray.
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        Vec3::new(
            self.origin.x + self.dir.x * t,
            self.origin.y + self.dir.y * t,
            self.origin.z + self.dir.z * t,
        )
    }
}
