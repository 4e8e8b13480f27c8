use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// Primary rays leave the camera through a screen point; shadow rays leave a
/// surface toward a light. The direction is normalized by every constructor
/// except [`Ray::new`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray. The direction is stored as given.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray starting at `origin` and passing through `target`.
    ///
    /// `target` must differ from `origin`.
    pub fn through(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, (target - origin).normalize())
    }

    /// Same origin, new direction.
    #[inline]
    pub fn towards(&self, direction: Vec3) -> Self {
        Self::new(self.origin, direction)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
