//! Hittable trait and Hit record for ray-surface intersection.

use lumen_math::{Interval, Ray, Vec3};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Record of a ray-surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal, always facing against the incoming ray
    pub normal: Vec3,
    /// Surface color multiplied into the light contributions
    pub albedo: Color,
}

impl Hit {
    /// Build a hit at parameter `t` along `ray`.
    ///
    /// The stored normal is flipped when needed so that it faces the ray
    /// origin; `outward_normal` must be unit length.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, albedo: Color) -> Self {
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            t,
            point: ray.at(t),
            normal,
            albedo,
        }
    }
}

/// Trait for surfaces that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Return the hit inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit>;
}

/// A list of hittable surfaces. Reports the closest hit.
#[derive(Default)]
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Get the number of surfaces.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        let mut closest: Option<Hit> = None;

        for object in &self.objects {
            let interval = match &closest {
                Some(hit) => ray_t.with_max(hit.t),
                None => ray_t,
            };
            if let Some(hit) = object.hit(ray, interval) {
                closest = Some(hit);
            }
        }

        closest
    }
}
