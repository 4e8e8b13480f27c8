//! Plane and sphere primitives.

use crate::error::{finite_point, positive_radius, unit_vector, SceneResult};
use crate::hittable::{Color, Hit, Hittable};
use lumen_math::{Interval, Ray, Vec3};

/// Below this, a ray is treated as parallel to a plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// An infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    albedo: Color,
}

impl Plane {
    /// Create a new white plane. The normal is normalized here.
    pub fn new(point: Vec3, normal: Vec3) -> SceneResult<Self> {
        Ok(Self {
            point: finite_point(point, "plane point")?,
            normal: unit_vector(normal, "plane normal")?,
            albedo: Color::ONE,
        })
    }

    /// Set the surface color.
    pub fn with_albedo(mut self, albedo: Color) -> Self {
        self.albedo = albedo;
        self
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.point - ray.origin).dot(self.normal) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(Hit::new(ray, t, self.normal, self.albedo))
    }
}

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    albedo: Color,
}

impl Sphere {
    /// Create a new white sphere.
    pub fn new(center: Vec3, radius: f32) -> SceneResult<Self> {
        Ok(Self {
            center: finite_point(center, "sphere center")?,
            radius: positive_radius(radius, "sphere radius")?,
            albedo: Color::ONE,
        })
    }

    /// Set the surface color.
    pub fn with_albedo(mut self, albedo: Color) -> Self {
        self.albedo = albedo;
        self
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(Hit::new(ray, root, outward_normal, self.albedo))
    }
}
