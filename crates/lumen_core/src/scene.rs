//! Scene and the evaluation capability consumed by the renderer.
//!
//! The renderer only needs one thing from a scene: the color seen through a
//! point on the screen plane. [`SceneEvaluator`] captures that, and [`Scene`]
//! implements it by tracing a primary ray, finding the closest surface and
//! summing the light contributions there.

use crate::hittable::{Color, Hit, Hittable, HittableList};
use crate::light::{Light, LightSample};
use lumen_math::{Interval, Ray, Vec3};

/// Hits closer than this to a ray origin are ignored.
pub const HIT_EPSILON: f32 = 1e-4;

/// Offset along the normal applied to shadow ray origins.
const SHADOW_BIAS: f32 = 1e-3;

/// Something that can be sampled by the render workers.
///
/// Implementations are shared by reference across all worker threads.
pub trait SceneEvaluator: Sync {
    /// Color seen through `point` on the screen plane.
    fn evaluate(&self, point: Vec3) -> Color;
}

impl<F> SceneEvaluator for F
where
    F: Fn(Vec3) -> Color + Sync,
{
    fn evaluate(&self, point: Vec3) -> Color {
        self(point)
    }
}

/// Surfaces and lights seen from a fixed camera position.
pub struct Scene {
    camera: Vec3,
    background: Color,
    shadows: bool,
    surfaces: HittableList,
    lights: Vec<Light>,
}

impl Scene {
    /// Create an empty scene with a black background and shadows enabled.
    pub fn new(camera: Vec3) -> Self {
        Self {
            camera,
            background: Color::ZERO,
            shadows: true,
            surfaces: HittableList::new(),
            lights: Vec::new(),
        }
    }

    /// Color returned when a primary ray misses everything.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Enable or disable occlusion tests toward lights.
    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }

    pub fn add_surface(&mut self, surface: impl Hittable + 'static) {
        self.surfaces.add(Box::new(surface));
    }

    pub fn add_light(&mut self, light: impl Into<Light>) {
        self.lights.push(light.into());
    }

    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Closest surface hit along `ray`.
    pub fn trace(&self, ray: &Ray) -> Option<Hit> {
        self.surfaces
            .hit(ray, Interval::new(HIT_EPSILON, f32::INFINITY))
    }

    /// Sum of every light's contribution at `hit`, times the surface albedo.
    pub fn shade(&self, hit: &Hit) -> Color {
        let from_surface = Ray::new(hit.point, hit.normal);
        let mut radiance = Color::ZERO;

        for light in &self.lights {
            let sample = light.calculate(hit, &from_surface);
            if sample.color == Color::ZERO {
                continue;
            }
            if self.shadows && self.occluded(hit, &sample) {
                continue;
            }
            radiance += sample.color;
        }

        hit.albedo * radiance
    }

    fn occluded(&self, hit: &Hit, sample: &LightSample) -> bool {
        let shadow_ray = sample.ray_from(hit.point + hit.normal * SHADOW_BIAS);
        self.surfaces
            .hit(&shadow_ray, Interval::new(HIT_EPSILON, sample.distance))
            .is_some()
    }
}

impl SceneEvaluator for Scene {
    fn evaluate(&self, point: Vec3) -> Color {
        let ray = Ray::through(self.camera, point);
        match self.trace(&ray) {
            Some(hit) => self.shade(&hit),
            None => self.background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::{DirectionalLight, PointLight};
    use crate::surface::{Plane, Sphere};

    fn wall_scene() -> Scene {
        let mut scene = Scene::new(Vec3::ZERO);
        scene.add_surface(Plane::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z).unwrap());
        scene
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = Scene::new(Vec3::ZERO).with_background(Color::new(0.5, 0.7, 1.0));

        assert_eq!(scene.evaluate(Vec3::new(0.0, 0.0, -1.0)), Color::new(0.5, 0.7, 1.0));
    }

    #[test]
    fn test_directional_light_on_facing_wall() {
        let mut scene = wall_scene();
        let color = Color::new(0.75, 0.5, 0.25);
        scene.add_light(DirectionalLight::new(color, Vec3::Z).unwrap());

        for point in [
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(-0.5, 0.5, -1.0),
            Vec3::new(0.9, -0.9, -1.0),
        ] {
            assert_eq!(scene.evaluate(point), color);
        }
    }

    #[test]
    fn test_lights_add_up() {
        let mut scene = wall_scene();
        scene.add_light(DirectionalLight::new(Color::new(0.25, 0.0, 0.0), Vec3::Z).unwrap());
        scene.add_light(DirectionalLight::new(Color::new(0.0, 0.5, 0.0), Vec3::Z).unwrap());

        assert_eq!(scene.evaluate(Vec3::new(0.0, 0.0, -1.0)), Color::new(0.25, 0.5, 0.0));
        assert_eq!(scene.lights().len(), 2);
    }

    #[test]
    fn test_albedo_scales_radiance() {
        let mut scene = Scene::new(Vec3::ZERO);
        scene.add_surface(
            Plane::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z)
                .unwrap()
                .with_albedo(Color::new(0.5, 0.5, 0.5)),
        );
        scene.add_light(DirectionalLight::new(Color::ONE, Vec3::Z).unwrap());

        assert_eq!(scene.evaluate(Vec3::new(0.0, 0.0, -1.0)), Color::splat(0.5));
    }

    #[test]
    fn test_sphere_casts_shadow() {
        let mut scene = wall_scene();
        scene.add_surface(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.25).unwrap());
        scene.add_light(DirectionalLight::new(Color::ONE, Vec3::Z).unwrap());

        // The sphere's far side faces away from the camera, so look past it.
        let lit = scene.evaluate(Vec3::new(0.9, 0.0, -1.0));
        assert_eq!(lit, Color::ONE);

        let wall_hit = scene
            .trace(&Ray::new(Vec3::new(0.0, 0.0, -1.5), Vec3::new(0.0, 0.0, -1.0)))
            .expect("wall should be hit behind the sphere");
        assert_eq!(scene.shade(&wall_hit), Color::ZERO);
    }

    #[test]
    fn test_shadows_can_be_disabled() {
        let mut scene = wall_scene().with_shadows(false);
        scene.add_surface(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.25).unwrap());
        scene.add_light(DirectionalLight::new(Color::ONE, Vec3::Z).unwrap());

        let wall_hit = scene
            .trace(&Ray::new(Vec3::new(0.0, 0.0, -1.5), Vec3::new(0.0, 0.0, -1.0)))
            .expect("wall should be hit");
        assert_eq!(scene.shade(&wall_hit), Color::ONE);
    }

    #[test]
    fn test_occluder_beyond_point_light_does_not_shadow() {
        let mut scene = wall_scene();
        // Light sits between the wall and the sphere.
        scene.add_light(PointLight::new(Color::ONE, Vec3::new(0.0, 0.0, -1.5), 2.0).unwrap());
        scene.add_surface(Sphere::new(Vec3::new(0.0, 0.0, -0.5), 0.1).unwrap());

        let wall_hit = scene
            .trace(&Ray::new(Vec3::new(0.0, 0.0, -1.9), Vec3::new(0.0, 0.0, -1.0)))
            .expect("wall should be hit");
        assert!(scene.shade(&wall_hit).x > 0.0);
    }

    #[test]
    fn test_closure_is_an_evaluator() {
        let evaluator = |point: Vec3| Color::new(point.x, point.y, 0.0);

        assert_eq!(evaluator.evaluate(Vec3::new(0.25, 0.5, -1.0)), Color::new(0.25, 0.5, 0.0));
    }
}
