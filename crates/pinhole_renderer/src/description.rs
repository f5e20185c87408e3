//! JSON scene description.
//!
//! A description bundles everything needed for one frame: output size,
//! camera, render settings and the list of objects.
//!
//! ```json
//! {
//!   "width": 360,
//!   "height": 240,
//!   "camera": { "focal_length": 50.0, "sensor_size": [36.0, 24.0],
//!               "position": [0.0, 1.0, -6.0], "look_at": 0 },
//!   "render": { "rays_spawned": 4, "spawn_depth": 3 },
//!   "objects": [
//!     { "type": "sphere", "center": [0.0, 1.0, 0.0], "radius": 1.0,
//!       "material": { "type": "lambertian", "albedo": [0.7, 0.3, 0.2] } }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    Camera, Color, Hittable, Lambertian, Metal, Plane, RenderConfig, RenderError,
    RenderResult, Scene, Sphere,
};
use pinhole_math::{DMat3, DVec2, DVec3, EulerRot, UVec2};

/// A complete frame: image size, camera, settings and objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub width: u32,
    pub height: u32,
    pub camera: CameraDescription,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

/// Camera intrinsics and pose.
///
/// Rotation is given as Euler angles in degrees (yaw about Y, pitch about X,
/// roll about Z). When `look_at` names an object index, the camera is aimed
/// at that object after the rotation is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    pub focal_length: f64,
    pub sensor_size: DVec2,
    #[serde(default)]
    pub principal_point: Option<DVec2>,
    #[serde(default)]
    pub position: DVec3,
    #[serde(default)]
    pub rotation_deg: DVec3,
    #[serde(default)]
    pub look_at: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDescription {
    Sphere {
        center: DVec3,
        radius: f64,
        material: MaterialDescription,
    },
    Plane {
        point: DVec3,
        normal: DVec3,
        material: MaterialDescription,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDescription {
    Lambertian {
        albedo: Color,
    },
    Metal {
        albedo: Color,
        #[serde(default)]
        fuzz: f64,
    },
}

impl SceneDescription {
    /// Load a description from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let description = Self::from_json(&text)?;
        log::info!(
            "Loaded scene description {} ({} objects)",
            path.display(),
            description.objects.len()
        );
        Ok(description)
    }

    /// Parse a description from a JSON string.
    pub fn from_json(text: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize the description as pretty-printed JSON.
    pub fn to_json(&self) -> RenderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Built-in scene: a ground plane and three spheres in front of the
    /// camera.
    pub fn demo() -> Self {
        let lambertian = |r, g, b| MaterialDescription::Lambertian {
            albedo: Color::new(r, g, b),
        };

        Self {
            width: 360,
            height: 240,
            camera: CameraDescription {
                focal_length: 35.0,
                sensor_size: DVec2::new(36.0, 24.0),
                principal_point: None,
                position: DVec3::new(0.0, 1.5, -6.0),
                rotation_deg: DVec3::ZERO,
                look_at: Some(1),
            },
            render: RenderConfig::default(),
            objects: vec![
                ObjectDescription::Plane {
                    point: DVec3::ZERO,
                    normal: DVec3::Y,
                    material: lambertian(0.5, 0.5, 0.5),
                },
                ObjectDescription::Sphere {
                    center: DVec3::new(0.0, 1.0, 0.0),
                    radius: 1.0,
                    material: lambertian(0.7, 0.3, 0.2),
                },
                ObjectDescription::Sphere {
                    center: DVec3::new(-2.2, 0.8, 0.6),
                    radius: 0.8,
                    material: MaterialDescription::Metal {
                        albedo: Color::new(0.8, 0.8, 0.9),
                        fuzz: 0.05,
                    },
                },
                ObjectDescription::Sphere {
                    center: DVec3::new(2.0, 0.6, -0.4),
                    radius: 0.6,
                    material: lambertian(0.2, 0.4, 0.8),
                },
            ],
        }
    }

    /// Build the camera and scene.
    ///
    /// Render settings are used as they are from [`SceneDescription::render`].
    pub fn build(&self) -> RenderResult<(Camera, Scene)> {
        let scene = self
            .objects
            .iter()
            .enumerate()
            .map(|(index, object)| object.build(index))
            .collect::<RenderResult<Scene>>()?;
        let camera = self.camera.build(UVec2::new(self.width, self.height), &scene)?;
        Ok((camera, scene))
    }
}

impl CameraDescription {
    fn build(&self, resolution: UVec2, scene: &Scene) -> RenderResult<Camera> {
        let rotation = DMat3::from_euler(
            EulerRot::YXZ,
            self.rotation_deg.y.to_radians(),
            self.rotation_deg.x.to_radians(),
            self.rotation_deg.z.to_radians(),
        );
        let mut camera = match self.principal_point {
            Some(pp) => Camera::new(
                self.focal_length,
                self.sensor_size,
                resolution,
                pp,
                rotation,
                self.position,
            )?,
            None => Camera::centered(
                self.focal_length,
                self.sensor_size,
                resolution,
                rotation,
                self.position,
            )?,
        };

        if let Some(index) = self.look_at {
            let target = scene.iter().nth(index).ok_or_else(|| {
                RenderError::camera(format!(
                    "look_at index {index} out of range for {} objects",
                    scene.len()
                ))
            })?;
            camera.look_at(target.as_ref());
        }

        Ok(camera)
    }
}

impl ObjectDescription {
    fn validate(&self, index: usize) -> RenderResult<()> {
        let invalid = |reason: String| RenderError::InvalidObject { index, reason };
        match self {
            ObjectDescription::Sphere { center, radius, .. } => {
                if !center.is_finite() {
                    return Err(invalid(format!("sphere center must be finite, got {center}")));
                }
                if !(radius.is_finite() && *radius > 0.0) {
                    return Err(invalid(format!("sphere radius must be positive, got {radius}")));
                }
            }
            ObjectDescription::Plane { point, normal, .. } => {
                if !point.is_finite() {
                    return Err(invalid(format!("plane point must be finite, got {point}")));
                }
                if !normal.is_finite() || normal.length_squared() == 0.0 {
                    return Err(invalid(format!("plane normal must be non-zero, got {normal}")));
                }
            }
        }
        Ok(())
    }

    fn build(&self, index: usize) -> RenderResult<Arc<dyn Hittable>> {
        self.validate(index)?;
        let object: Arc<dyn Hittable> = match self {
            ObjectDescription::Sphere {
                center,
                radius,
                material,
            } => match *material {
                MaterialDescription::Lambertian { albedo } => {
                    Arc::new(Sphere::new(*center, *radius, Lambertian::new(albedo)))
                }
                MaterialDescription::Metal { albedo, fuzz } => {
                    Arc::new(Sphere::new(*center, *radius, Metal::new(albedo, fuzz)))
                }
            },
            ObjectDescription::Plane {
                point,
                normal,
                material,
            } => match *material {
                MaterialDescription::Lambertian { albedo } => {
                    Arc::new(Plane::new(*point, *normal, Lambertian::new(albedo)))
                }
                MaterialDescription::Metal { albedo, fuzz } => {
                    Arc::new(Plane::new(*point, *normal, Metal::new(albedo, fuzz)))
                }
            },
        };
        Ok(object)
    }
}
