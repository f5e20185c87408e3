//! Infinite plane primitive.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray, T_MIN,
};
use pinhole_math::DVec3;

/// An infinite plane through `point` with the given normal.
pub struct Plane<M: Material> {
    point: DVec3,
    normal: DVec3,
    material: M,
}

impl<M: Material> Plane<M> {
    /// Create a new plane. The normal is normalized on construction.
    pub fn new(point: DVec3, normal: DVec3, material: M) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
            material,
        }
    }
}

impl<M: Material> Hittable for Plane<M> {
    fn intersect<'a>(&'a self, ray: &Ray, rec: &mut HitRecord<'a>) -> bool {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < 1e-12 {
            return false;
        }

        let z = self.normal.dot(self.point - ray.origin()) / denom;
        if z <= T_MIN || !z.is_finite() {
            return false;
        }

        rec.z = z;
        rec.p = ray.at(z);
        rec.set_face_normal(ray, self.normal);
        rec.material = &self.material;

        true
    }

    fn position(&self) -> DVec3 {
        self.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;

    fn ground() -> Plane<Lambertian> {
        Plane::new(
            DVec3::new(0.0, -1.0, 0.0),
            DVec3::new(0.0, 3.0, 0.0),
            Lambertian::new(DVec3::splat(0.5)),
        )
    }

    #[test]
    fn test_plane_hit_from_above() {
        let plane = ground();
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, -1.0, 1.0));
        let mut rec = HitRecord::default();

        assert!(plane.intersect(&ray, &mut rec));
        assert!((rec.z - 1.0).abs() < 1e-9);
        assert!((rec.p - DVec3::new(0.0, -1.0, 1.0)).length() < 1e-9);
        assert_eq!(rec.normal, DVec3::Y);
    }

    #[test]
    fn test_plane_parallel_ray_misses() {
        let plane = ground();
        let ray = Ray::new(DVec3::ZERO, DVec3::Z);
        let mut rec = HitRecord::default();

        assert!(!plane.intersect(&ray, &mut rec));
    }

    #[test]
    fn test_plane_behind_origin_misses() {
        let plane = ground();
        let ray = Ray::new(DVec3::ZERO, DVec3::Y);
        let mut rec = HitRecord::default();

        assert!(!plane.intersect(&ray, &mut rec));
    }

    #[test]
    fn test_plane_hit_from_below_flips_normal() {
        let plane = ground();
        let ray = Ray::new(DVec3::new(0.0, -2.0, 0.0), DVec3::Y);
        let mut rec = HitRecord::default();

        assert!(plane.intersect(&ray, &mut rec));
        assert_eq!(rec.normal, DVec3::NEG_Y);
    }
}
