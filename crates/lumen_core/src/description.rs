//! JSON scene files.
//!
//! A description is plain data; [`SceneDescription::build`] runs every value
//! through the validating constructors and produces a [`Scene`].
//!
//! ```json
//! {
//!   "camera": [0, 0, 0],
//!   "surfaces": [{ "type": "plane", "point": [0, 0, -2], "normal": [0, 0, 1] }],
//!   "lights": [{ "type": "directional", "color": [1, 1, 1], "direction": [0, 0, 1] }]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SceneError;
use crate::light::{DirectionalLight, PointLight, SpotLight};
use crate::scene::Scene;
use crate::surface::{Plane, Sphere};
use lumen_math::Vec3;

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum DescriptionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),
}

fn white() -> [f32; 3] {
    [1.0; 3]
}

fn enabled() -> bool {
    true
}

/// Top-level scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: [f32; 3],

    #[serde(default)]
    pub background: [f32; 3],

    #[serde(default = "enabled")]
    pub shadows: bool,

    #[serde(default)]
    pub surfaces: Vec<SurfaceDescription>,

    #[serde(default)]
    pub lights: Vec<LightDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceDescription {
    Plane {
        point: [f32; 3],
        normal: [f32; 3],
        #[serde(default = "white")]
        albedo: [f32; 3],
    },
    Sphere {
        center: [f32; 3],
        radius: f32,
        #[serde(default = "white")]
        albedo: [f32; 3],
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightDescription {
    Directional {
        color: [f32; 3],
        direction: [f32; 3],
    },
    Point {
        color: [f32; 3],
        position: [f32; 3],
        radius: f32,
    },
    Spot {
        color: [f32; 3],
        position: [f32; 3],
        direction: [f32; 3],
        radius: f32,
        /// Inner and outer cone half-angles in degrees
        #[serde(default)]
        cone: Option<[f32; 2]>,
    },
}

impl SceneDescription {
    /// Parse a description from JSON text.
    pub fn from_json(text: &str) -> Result<Self, DescriptionError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a description file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DescriptionError> {
        let path = path.as_ref();
        log::info!("Loading scene description from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Read, parse and validate a scene file in one step.
    pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene, DescriptionError> {
        Ok(Self::load(path)?.build()?)
    }

    /// Validate every object and assemble the scene.
    pub fn build(&self) -> Result<Scene, SceneError> {
        let mut scene = Scene::new(Vec3::from(self.camera))
            .with_background(Vec3::from(self.background))
            .with_shadows(self.shadows);

        for surface in &self.surfaces {
            match *surface {
                SurfaceDescription::Plane { point, normal, albedo } => {
                    scene.add_surface(
                        Plane::new(point.into(), normal.into())?.with_albedo(albedo.into()),
                    );
                }
                SurfaceDescription::Sphere { center, radius, albedo } => {
                    scene.add_surface(Sphere::new(center.into(), radius)?.with_albedo(albedo.into()));
                }
            }
        }

        for light in &self.lights {
            match *light {
                LightDescription::Directional { color, direction } => {
                    scene.add_light(DirectionalLight::new(color.into(), direction.into())?);
                }
                LightDescription::Point { color, position, radius } => {
                    scene.add_light(PointLight::new(color.into(), position.into(), radius)?);
                }
                LightDescription::Spot {
                    color,
                    position,
                    direction,
                    radius,
                    cone,
                } => {
                    let mut spot = SpotLight::new(color.into(), position.into(), direction.into(), radius)?;
                    if let Some([inner, outer]) = cone {
                        spot = spot.with_cone(inner, outer)?;
                    }
                    scene.add_light(spot);
                }
            }
        }

        log::debug!(
            "Built scene with {} surfaces and {} lights",
            scene.surface_count(),
            scene.lights().len()
        );

        Ok(scene)
    }

    /// Built-in scene used when no file is given: a floor, a back wall and a
    /// sphere lit by one light of each kind.
    pub fn demo() -> Self {
        Self {
            camera: [0.0, 0.0, 0.0],
            background: [0.05, 0.05, 0.08],
            shadows: true,
            surfaces: vec![
                SurfaceDescription::Plane {
                    point: [0.0, -1.0, 0.0],
                    normal: [0.0, 1.0, 0.0],
                    albedo: [0.8, 0.8, 0.8],
                },
                SurfaceDescription::Plane {
                    point: [0.0, 0.0, -6.0],
                    normal: [0.0, 0.0, 1.0],
                    albedo: [0.6, 0.7, 0.9],
                },
                SurfaceDescription::Sphere {
                    center: [0.0, -0.25, -3.0],
                    radius: 0.75,
                    albedo: [0.9, 0.4, 0.3],
                },
            ],
            lights: vec![
                LightDescription::Directional {
                    color: [0.25, 0.25, 0.3],
                    direction: [-0.5, 1.0, 0.75],
                },
                LightDescription::Point {
                    color: [1.0, 0.9, 0.7],
                    position: [1.5, 1.0, -2.0],
                    radius: 6.0,
                },
                LightDescription::Spot {
                    color: [0.6, 0.8, 1.0],
                    position: [-1.5, 2.0, -2.5],
                    direction: [0.5, -1.0, -0.25],
                    radius: 8.0,
                    cone: Some([15.0, 35.0]),
                },
            ],
        }
    }
}
