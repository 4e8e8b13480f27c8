//! Light model.
//!
//! Every light answers the same question for a surface hit: which way is the
//! light, how far away is it, and how much radiance arrives. The answer is a
//! [`LightSample`]; the incoming ray is only read for its origin, which is the
//! surface point the light is evaluated from.
//!
//! Lights form a closed enum so that adding a variant forces every match to
//! handle it.

use crate::error::{finite_point, positive_radius, unit_vector, SceneError, SceneResult};
use crate::hittable::{Color, Hit};
use lumen_math::{Ray, Vec3};

/// Default inner spot cone half-angle in degrees (full intensity inside).
pub const DEFAULT_SPOT_INNER_DEGREES: f32 = 20.0;
/// Default outer spot cone half-angle in degrees (zero intensity outside).
pub const DEFAULT_SPOT_OUTER_DEGREES: f32 = 30.0;

/// Result of evaluating a light at a surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit direction from the ray origin toward the light
    pub direction: Vec3,
    /// Distance to the light along `direction` (infinite for directional lights)
    pub distance: f32,
    /// Radiance reaching the surface, already attenuated
    pub color: Color,
}

impl LightSample {
    /// The ray from `origin` toward the light.
    pub fn ray_from(&self, origin: Vec3) -> Ray {
        Ray::new(origin, self.direction)
    }
}

/// A light infinitely far away, shining along a fixed direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    color: Color,
    /// Unit vector pointing toward the light
    direction: Vec3,
}

impl DirectionalLight {
    /// Create a directional light. `direction` points from the scene toward
    /// the light and is normalized here.
    pub fn new(color: Color, direction: Vec3) -> SceneResult<Self> {
        Ok(Self {
            color,
            direction: unit_vector(direction, "directional light direction")?,
        })
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// `color * max(N·D, 0)`, no distance attenuation.
    pub fn calculate(&self, hit: &Hit, _ray: &Ray) -> LightSample {
        LightSample {
            direction: self.direction,
            distance: f32::INFINITY,
            color: self.color * hit.normal.dot(self.direction).max(0.0),
        }
    }
}

/// A light at a position with a finite range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    color: Color,
    position: Vec3,
    radius: f32,
}

impl PointLight {
    /// Create a point light that reaches at most `radius` units.
    pub fn new(color: Color, position: Vec3, radius: f32) -> SceneResult<Self> {
        Ok(Self {
            color,
            position: finite_point(position, "point light position")?,
            radius: positive_radius(radius, "point light radius")?,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Falloff at `distance`: `max(1 - sqrt(d² / r²), 0)`.
    ///
    /// 1 at the light, 0 at and beyond the radius. Not inverse-square.
    pub fn attenuation(&self, distance: f32) -> f32 {
        radial_attenuation(distance, self.radius)
    }

    pub fn calculate(&self, hit: &Hit, ray: &Ray) -> LightSample {
        let (direction, distance) = toward(self.position, ray.origin, hit.normal);
        let attenuation = self.attenuation(distance);

        LightSample {
            direction,
            distance,
            color: self.color * attenuation * hit.normal.dot(direction).max(0.0),
        }
    }
}

/// A point light restricted to a cone around `direction`.
///
/// The contribution is the point light falloff multiplied by a smoothstep
/// between the outer and inner cone angles, measured between the spot axis
/// and the direction from the light to the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    color: Color,
    position: Vec3,
    /// Unit axis of the cone, pointing away from the light
    direction: Vec3,
    radius: f32,
    cos_inner: f32,
    cos_outer: f32,
}

impl SpotLight {
    /// Create a spot light with the default cone.
    pub fn new(color: Color, position: Vec3, direction: Vec3, radius: f32) -> SceneResult<Self> {
        let spot = Self {
            color,
            position: finite_point(position, "spot light position")?,
            direction: unit_vector(direction, "spot light direction")?,
            radius: positive_radius(radius, "spot light radius")?,
            cos_inner: 0.0,
            cos_outer: 0.0,
        };
        spot.with_cone(DEFAULT_SPOT_INNER_DEGREES, DEFAULT_SPOT_OUTER_DEGREES)
    }

    /// Set the cone half-angles in degrees.
    ///
    /// Requires `0 <= inner < outer <= 90`.
    pub fn with_cone(mut self, inner_degrees: f32, outer_degrees: f32) -> SceneResult<Self> {
        let valid = (0.0..=90.0).contains(&inner_degrees)
            && (0.0..=90.0).contains(&outer_degrees)
            && inner_degrees < outer_degrees;
        if !valid {
            return Err(SceneError::InvalidCone {
                inner: inner_degrees,
                outer: outer_degrees,
            });
        }

        self.cos_inner = inner_degrees.to_radians().cos();
        self.cos_outer = outer_degrees.to_radians().cos();
        Ok(self)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Angular falloff for a unit vector leaving the light.
    ///
    /// 1 inside the inner cone, 0 outside the outer cone.
    pub fn cone_attenuation(&self, from_light: Vec3) -> f32 {
        smoothstep(self.cos_outer, self.cos_inner, self.direction.dot(from_light))
    }

    pub fn calculate(&self, hit: &Hit, ray: &Ray) -> LightSample {
        let (direction, distance) = toward(self.position, ray.origin, hit.normal);

        // A surface sitting on the light is treated as on-axis.
        let cone = if distance > 0.0 {
            self.cone_attenuation(-direction)
        } else {
            1.0
        };
        let attenuation = radial_attenuation(distance, self.radius) * cone;

        LightSample {
            direction,
            distance,
            color: self.color * attenuation * hit.normal.dot(direction).max(0.0),
        }
    }
}

/// A light source. Immutable once built and shared read-only across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl Light {
    /// Evaluate this light for `hit`, seen from `ray.origin`.
    pub fn calculate(&self, hit: &Hit, ray: &Ray) -> LightSample {
        match self {
            Light::Directional(light) => light.calculate(hit, ray),
            Light::Point(light) => light.calculate(hit, ray),
            Light::Spot(light) => light.calculate(hit, ray),
        }
    }

    /// Unattenuated light color.
    pub fn color(&self) -> Color {
        match self {
            Light::Directional(light) => light.color,
            Light::Point(light) => light.color,
            Light::Spot(light) => light.color,
        }
    }

    /// Short name for log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Light::Directional(_) => "directional",
            Light::Point(_) => "point",
            Light::Spot(_) => "spot",
        }
    }
}

impl From<DirectionalLight> for Light {
    fn from(light: DirectionalLight) -> Self {
        Light::Directional(light)
    }
}

impl From<PointLight> for Light {
    fn from(light: PointLight) -> Self {
        Light::Point(light)
    }
}

impl From<SpotLight> for Light {
    fn from(light: SpotLight) -> Self {
        Light::Spot(light)
    }
}

/// Unit direction and distance from `origin` to `position`.
///
/// When the two coincide the direction is undefined; `fallback` (the surface
/// normal) is used so the result stays finite.
fn toward(position: Vec3, origin: Vec3, fallback: Vec3) -> (Vec3, f32) {
    let offset = position - origin;
    let distance = offset.length();
    if distance > 0.0 {
        (offset / distance, distance)
    } else {
        (fallback, 0.0)
    }
}

fn radial_attenuation(distance: f32, radius: f32) -> f32 {
    (1.0 - (distance * distance / (radius * radius)).sqrt()).max(0.0)
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
