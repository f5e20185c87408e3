//! Material trait for surface reflectance and bounce directions.

use crate::{hittable::HitRecord, Ray};
use pinhole_math::DVec3;
use rand::{Rng, RngCore};

/// Color type alias (RGB values typically 0-1)
pub type Color = DVec3;

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Per-channel reflectance (albedo) applied to light gathered at a hit.
    ///
    /// Channels are conventionally in [0, 1]; the tracer does not enforce it.
    fn reflectance(&self) -> Color;

    /// Pick a bounce direction for a ray that hit this material.
    ///
    /// The returned vector lies in the hemisphere of `rec.normal`.
    fn scatter_direction(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> DVec3;
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, Copy)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn reflectance(&self) -> Color {
        self.albedo
    }

    fn scatter_direction(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> DVec3 {
        // Cosine-weighted bounce around the normal
        let direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if direction.length_squared() < 1e-12 {
            rec.normal
        } else {
            direction
        }
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn reflectance(&self) -> Color {
        self.albedo
    }

    fn scatter_direction(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> DVec3 {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        if self.fuzz == 0.0 {
            return reflected;
        }

        let fuzzed = reflected + self.fuzz * random_unit_vector(rng);
        // Fuzz must not push the bounce below the surface
        if fuzzed.dot(rec.normal) > 0.0 {
            fuzzed
        } else {
            reflected
        }
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: DVec3, n: DVec3) -> DVec3 {
    v - 2.0 * v.dot(n) * n
}

/// Generate a random unit vector on the unit sphere.
pub(crate) fn random_unit_vector(rng: &mut dyn RngCore) -> DVec3 {
    // Use rejection sampling for uniform distribution on sphere
    loop {
        let v = DVec3::new(
            rng.gen::<f64>() * 2.0 - 1.0,
            rng.gen::<f64>() * 2.0 - 1.0,
            rng.gen::<f64>() * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-12 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}
