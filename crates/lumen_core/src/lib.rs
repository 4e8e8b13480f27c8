//! Lumen Core - scene description, surfaces and the light model.
//!
//! This crate provides:
//!
//! - **Shading primitives**: `Color`, `Hit`, the `Hittable` trait
//! - **Surfaces**: infinite `Plane` and `Sphere`
//! - **Lights**: the closed `Light` enum (directional, point, spot)
//! - **Scene**: `Scene`, which implements `SceneEvaluator` for the renderer
//! - **Description**: JSON scene files loaded through serde
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{Color, DirectionalLight, Plane, Scene, Vec3};
//!
//! let mut scene = Scene::new(Vec3::ZERO);
//! scene.add_surface(Plane::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z)?);
//! scene.add_light(DirectionalLight::new(Color::ONE, Vec3::Z)?);
//! ```

pub mod description;
pub mod error;
pub mod hittable;
pub mod light;
pub mod scene;
pub mod surface;

// Re-export commonly used types
pub use description::{DescriptionError, SceneDescription};
pub use error::{SceneError, SceneResult};
pub use hittable::{Color, Hit, Hittable, HittableList};
pub use light::{DirectionalLight, Light, LightSample, PointLight, SpotLight};
pub use scene::{Scene, SceneEvaluator};
pub use surface::{Plane, Sphere};

pub use lumen_math::{Interval, Ray, Vec2, Vec3};
