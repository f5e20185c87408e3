//! Pinhole Renderer - recursive CPU ray tracing
//!
//! Renders one frame by casting rays from a calibrated pinhole camera and
//! tracing them recursively through a scene of hittable objects.
//!
//! - `camera`: pixel to ray mapping from physical intrinsics and pose
//! - `tracer`: closest-hit scan, bounce fan-out, averaging and tone mapping
//! - `renderer`: per-pixel loop writing into an image sink
//!
//! # Example
//!
//! ```ignore
//! use pinhole_renderer::{render, ImageBuffer, SceneDescription};
//!
//! let description = SceneDescription::demo();
//! let (camera, scene) = description.build()?;
//! let mut image = ImageBuffer::new(description.width, description.height)?;
//! render(&mut image, &scene, &camera, &description.render)?;
//! image.save_png("demo.png")?;
//! ```

mod camera;
mod description;
mod error;
mod hittable;
mod material;
mod plane;
mod rays;
mod renderer;
mod sampling;
mod sphere;
mod tracer;

pub use camera::Camera;
pub use description::{CameraDescription, MaterialDescription, ObjectDescription, SceneDescription};
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, Scene};
pub use material::{Color, Lambertian, Material, Metal};
pub use plane::Plane;
pub use rays::{make_primary_rays, make_secondary_rays};
pub use renderer::{
    color_to_rgba, render, render_pixel, render_with, ImageBuffer, ImageSink, RenderConfig,
    MAX_SPAWN_DEPTH,
};
pub use sampling::{
    CenterPixelSampler, JitteredPixelSampler, MaterialSampler, PixelSampler, SecondaryRaySampler,
};
pub use sphere::Sphere;
pub use tracer::{tone_map, Tracer, BACKGROUND};

/// Re-export the math types used in the public API
pub use pinhole_math::{DMat3, DVec2, DVec3, Ray, UVec2};

/// Smallest hit distance accepted by the built-in primitives.
pub const T_MIN: f64 = 1e-9;

/// Distance secondary rays are lifted off the surface along the normal.
pub const SURFACE_OFFSET: f64 = 1e-6;
