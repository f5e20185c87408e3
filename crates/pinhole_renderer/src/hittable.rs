//! Hittable trait, HitRecord and the Scene that groups hittable objects.

use std::sync::Arc;

use crate::{Color, Material, Ray};
use pinhole_math::DVec3;
use rand::RngCore;

/// A dummy material used for HitRecord::default().
/// Reflects nothing and bounces straight back along the normal.
struct DummyMaterial;

impl Material for DummyMaterial {
    fn reflectance(&self) -> Color {
        Color::ZERO
    }

    fn scatter_direction(&self, _ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> DVec3 {
        rec.normal
    }
}

/// Static dummy material instance for Default impl.
static DUMMY_MATERIAL: DummyMaterial = DummyMaterial;

/// Record of a ray-object intersection.
///
/// Only meaningful when an intersection actually occurred. The default
/// record carries `z = +inf`, which marks "no hit yet" while scanning.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Distance along the ray where the intersection occurs
    pub z: f64,
    /// Point of intersection
    pub p: DVec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: DVec3,
    /// Material of the object that was hit, borrowed from the scene
    pub material: &'a dyn Material,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            z: f64::INFINITY,
            p: DVec3::ZERO,
            normal: DVec3::ZERO,
            material: &DUMMY_MATERIAL,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Set the normal so that it always points against the ray direction.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: DVec3) {
        self.normal = if ray.direction().dot(outward_normal) < 0.0 {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

impl std::fmt::Debug for HitRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRecord")
            .field("z", &self.z)
            .field("p", &self.p)
            .field("normal", &self.normal)
            .field("reflectance", &self.material.reflectance())
            .finish()
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object.
    ///
    /// Returns true if hit, and fills in the hit record. Must not depend on
    /// any state other than `self` and `ray`.
    fn intersect<'a>(&'a self, ray: &Ray, rec: &mut HitRecord<'a>) -> bool;

    /// Representative world-space position, used for aiming the camera.
    fn position(&self) -> DVec3;
}

/// An ordered collection of hittable objects.
///
/// Objects are shared, not owned exclusively: the same object may appear in
/// several scenes and outlives any hit record borrowed from it.
#[derive(Clone, Default)]
pub struct Scene {
    objects: Vec<Arc<dyn Hittable>>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over the objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Hittable>> {
        self.objects.iter()
    }

    /// Find the closest intersection of `ray` with any object.
    ///
    /// Full linear scan. Candidates replace the running best only when
    /// strictly closer, so among exact ties the first object added wins.
    pub fn closest_hit(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        let mut has_hit = false;
        let mut closest = HitRecord::default();
        let mut record = HitRecord::default();

        for object in self.iter() {
            if object.intersect(ray, &mut record) {
                has_hit = true;
                if record.z < closest.z {
                    closest = record;
                }
            }
        }

        has_hit.then_some(closest)
    }
}

impl FromIterator<Arc<dyn Hittable>> for Scene {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Hittable>>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}
