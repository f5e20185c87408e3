//! Recursive ray tracer.
//!
//! Every hit fans out into `rays_spawned` secondary rays which are traced one
//! level deeper, so a single primary ray costs `O(rays_spawned^depth)` ray
//! casts. Keep both numbers small.

use crate::rays::make_secondary_rays;
use crate::{Color, Ray, RenderError, RenderResult, Scene, SecondaryRaySampler};

/// Color returned by rays that leave the scene (pale blue).
pub const BACKGROUND: Color = Color::new(0.75, 0.86, 1.0);

/// Traces batches of rays against a read-only scene.
pub struct Tracer<'s> {
    scene: &'s Scene,
    sampler: &'s dyn SecondaryRaySampler,
    rays_spawned: usize,
    background: Color,
}

impl<'s> Tracer<'s> {
    pub fn new(
        scene: &'s Scene,
        sampler: &'s dyn SecondaryRaySampler,
        rays_spawned: usize,
    ) -> Self {
        Self {
            scene,
            sampler,
            rays_spawned,
            background: BACKGROUND,
        }
    }

    /// Set background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Average, tone-mapped color gathered by `rays` with `depth` bounces left.
    ///
    /// - `depth == 0` is the only terminator and yields black.
    /// - A miss contributes the background color.
    /// - A hit contributes `albedo * trace(secondary, depth - 1)`.
    ///
    /// The sum is divided by the batch size and square-rooted per channel.
    pub fn trace(&self, rays: &[Ray], depth: u32) -> RenderResult<Color> {
        if rays.is_empty() {
            return Err(RenderError::EmptyRayBatch);
        }
        if depth == 0 {
            return Ok(Color::ZERO);
        }

        let mut color = Color::ZERO;
        for ray in rays {
            match self.scene.closest_hit(ray) {
                Some(hit) => {
                    let secondary = make_secondary_rays(ray, &hit, self.rays_spawned, self.sampler);
                    let albedo = hit.material.reflectance();
                    color += albedo * self.trace(&secondary, depth - 1)?;
                }
                None => color += self.background,
            }
        }

        Ok(tone_map(color / rays.len() as f64))
    }
}

/// Per-channel square root.
#[inline]
pub fn tone_map(color: Color) -> Color {
    Color::new(color.x.sqrt(), color.y.sqrt(), color.z.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HitRecord, Hittable, Lambertian, MaterialSampler, Sphere};
    use pinhole_math::DVec3;
    use std::sync::Arc;

    /// Hits only rays leaving the world origin, at distance 1.
    struct Screen {
        material: Lambertian,
    }

    impl Hittable for Screen {
        fn intersect<'a>(&'a self, ray: &Ray, rec: &mut HitRecord<'a>) -> bool {
            if ray.origin() != DVec3::ZERO {
                return false;
            }
            rec.z = 1.0;
            rec.p = ray.at(1.0);
            rec.set_face_normal(ray, DVec3::NEG_Z);
            rec.material = &self.material;
            true
        }

        fn position(&self) -> DVec3 {
            DVec3::Z
        }
    }

    fn screen(albedo: f64) -> Arc<dyn Hittable> {
        Arc::new(Screen {
            material: Lambertian::new(Color::splat(albedo)),
        })
    }

    fn forward() -> Vec<Ray> {
        vec![Ray::new(DVec3::ZERO, DVec3::Z)]
    }

    fn assert_close(a: Color, b: Color) {
        assert!((a - b).length() < 1e-12, "{a:?} != {b:?}");
    }

    #[test]
    fn test_zero_depth_is_black() {
        let sampler = MaterialSampler::default();
        for scene in [Scene::new(), [screen(0.5)].into_iter().collect()] {
            let tracer = Tracer::new(&scene, &sampler, 4);
            assert_eq!(tracer.trace(&forward(), 0).unwrap(), Color::ZERO);
        }
    }

    #[test]
    fn test_empty_batch_is_an_error() {
        let scene = Scene::new();
        let sampler = MaterialSampler::default();
        let tracer = Tracer::new(&scene, &sampler, 4);

        assert!(matches!(tracer.trace(&[], 3), Err(RenderError::EmptyRayBatch)));
        assert!(matches!(tracer.trace(&[], 0), Err(RenderError::EmptyRayBatch)));
    }

    #[test]
    fn test_empty_scene_is_background() {
        let scene = Scene::new();
        let sampler = MaterialSampler::default();
        let tracer = Tracer::new(&scene, &sampler, 4);
        let rays = vec![
            Ray::new(DVec3::ZERO, DVec3::Z),
            Ray::new(DVec3::ONE, DVec3::NEG_X),
            Ray::new(DVec3::ZERO, DVec3::new(0.3, -0.2, 1.0)),
        ];

        for depth in 1..5 {
            assert_close(tracer.trace(&rays, depth).unwrap(), tone_map(BACKGROUND));
        }
    }

    #[test]
    fn test_one_bounce_into_background() {
        let scene: Scene = [screen(0.5)].into_iter().collect();
        let sampler = MaterialSampler::new(9);
        let tracer = Tracer::new(&scene, &sampler, 3);

        // Depth 1: the bounce has no budget left and comes back black.
        assert_eq!(tracer.trace(&forward(), 1).unwrap(), Color::ZERO);

        // Depth 2: every bounce misses and sees the background.
        let expected = tone_map(0.5 * tone_map(BACKGROUND));
        assert_close(tracer.trace(&forward(), 2).unwrap(), expected);
    }

    #[test]
    fn test_batch_is_averaged_before_tone_mapping() {
        let scene: Scene = [screen(0.0)].into_iter().collect();
        let sampler = MaterialSampler::default();
        let tracer = Tracer::new(&scene, &sampler, 2);
        let rays = vec![
            Ray::new(DVec3::ZERO, DVec3::Z),  // absorbed
            Ray::new(DVec3::NEG_X, DVec3::Z), // misses
        ];

        assert_close(tracer.trace(&rays, 3).unwrap(), tone_map(BACKGROUND / 2.0));
    }

    #[test]
    fn test_coincident_hits_use_first_object() {
        let scene: Scene = [screen(0.25), screen(1.0)].into_iter().collect();
        let sampler = MaterialSampler::default();
        let tracer = Tracer::new(&scene, &sampler, 1);

        let expected = tone_map(0.25 * tone_map(BACKGROUND));
        assert_close(tracer.trace(&forward(), 2).unwrap(), expected);
    }

    #[test]
    fn test_custom_background() {
        let scene = Scene::new();
        let sampler = MaterialSampler::default();
        let tracer = Tracer::new(&scene, &sampler, 1).with_background(Color::new(0.25, 0.0, 1.0));

        assert_close(tracer.trace(&forward(), 1).unwrap(), Color::new(0.5, 0.0, 1.0));
    }

    #[test]
    fn test_zero_fan_out_fails_on_hit() {
        let scene: Scene = [screen(0.5)].into_iter().collect();
        let sampler = MaterialSampler::default();
        let tracer = Tracer::new(&scene, &sampler, 0);

        assert!(matches!(
            tracer.trace(&forward(), 2),
            Err(RenderError::EmptyRayBatch)
        ));
    }

    #[test]
    fn test_trace_is_repeatable() {
        let scene: Scene = [
            Arc::new(Sphere::new(
                DVec3::new(0.0, 0.0, 4.0),
                1.0,
                Lambertian::new(Color::new(0.7, 0.3, 0.2)),
            )) as Arc<dyn Hittable>,
            Arc::new(Sphere::new(
                DVec3::new(0.0, -101.0, 4.0),
                100.0,
                Lambertian::new(Color::splat(0.5)),
            )) as Arc<dyn Hittable>,
        ]
        .into_iter()
        .collect();
        let sampler = MaterialSampler::new(1234);
        let tracer = Tracer::new(&scene, &sampler, 3);
        let rays = vec![
            Ray::new(DVec3::ZERO, DVec3::new(0.1, 0.0, 1.0)),
            Ray::new(DVec3::ZERO, DVec3::new(0.0, -0.4, 1.0)),
        ];

        let first = tracer.trace(&rays, 4).unwrap();
        let second = tracer.trace(&rays, 4).unwrap();
        assert_eq!(first.to_array().map(f64::to_bits), second.to_array().map(f64::to_bits));
        assert!(first.cmpgt(Color::ZERO).all());
    }
}
